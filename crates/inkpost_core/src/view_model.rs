use crate::{Notice, PublishState, Route, Theme};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub route: Route,
    pub waiting_for_session: bool,
    pub signed_in: bool,
    pub is_admin: bool,
    pub theme: Theme,
    pub publish: PublishState,
    pub progress: u8,
    /// The editor is locked while an upload or submission is running.
    pub editor_read_only: bool,
    pub can_publish: bool,
    pub pending_media: usize,
    pub has_cover: bool,
    pub notices: Vec<Notice>,
    pub dirty: bool,
}
