//! Inkpost core: pure state machine, routing and draft-content helpers.
mod effect;
mod media;
mod msg;
mod placeholder;
mod progress;
mod route;
mod session;
mod state;
mod theme;
mod update;
mod view_model;

pub use effect::{Effect, Mutation};
pub use media::{
    validate_selection, MediaId, MediaKind, SelectionError, MAX_IMAGE_BYTES, MAX_VIDEO_BYTES,
};
pub use msg::Msg;
pub use placeholder::{
    count_placeholders, media_element, sanitize_file_name, Placeholder, NBSP_ENTITY,
};
pub use progress::{ProgressPlan, COVER_DONE, MEDIA_DONE, PUBLISHED, STARTED};
pub use route::{AllBlogsFilter, BlogFilter, BlogSort, DashboardPage, Requirement, Route};
pub use session::{gate, Access, AuthState, Role};
pub use state::{AppState, Notice, NoticeLevel, PublishState};
pub use theme::Theme;
pub use update::update;
pub use view_model::AppViewModel;
