use crate::effect::Mutation;
use crate::media::{MediaKind, SelectionError};
use crate::route::Route;
use crate::session::AuthState;
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked for a path.
    Navigate(Route),
    /// Identity provider reported a new session state.
    SessionChanged(AuthState),
    ThemeInitialized {
        persisted: Option<Theme>,
        system_prefers_dark: bool,
    },
    ThemeToggled,
    /// A file passed validation and now sits in the upload queue.
    MediaQueued { kind: MediaKind, file_name: String },
    MediaRejected(SelectionError),
    MediaRemoved { kind: MediaKind },
    CoverSelected { file_name: String },
    CoverRemoved,
    /// User clicked Publish.
    PublishClicked,
    /// Engine progress while finalizing.
    PublishProgress(u8),
    /// A cover, image or video upload failed; nothing was submitted.
    MediaUploadFailed { message: String },
    /// All media uploaded but the article submission failed.
    SubmitFailed { message: String },
    Published { slug: String },
    MutationRequested(Mutation),
    MutationSucceeded(Mutation),
    MutationFailed { mutation: Mutation, message: String },
    LoadFailed { route: Route, message: String },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
