use crate::progress;
use crate::route::Route;
use crate::session::AuthState;
use crate::theme::Theme;
use crate::view_model::AppViewModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoticeLevel {
    #[default]
    Info,
    Success,
    Error,
}

/// A transient user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub detail: Option<String>,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
            detail: None,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
            detail: None,
        }
    }

    pub fn error(text: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
            detail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PublishState {
    #[default]
    Editing,
    InFlight,
    Published { slug: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    route: Route,
    pending_route: Option<Route>,
    auth: AuthState,
    theme: Theme,
    publish: PublishState,
    progress: u8,
    pending_media: usize,
    has_cover: bool,
    notices: Vec<Notice>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            route: Route::Home,
            pending_route: None,
            auth: AuthState::default(),
            theme: Theme::default(),
            publish: PublishState::default(),
            progress: 0,
            pending_media: 0,
            has_cover: false,
            notices: Vec::new(),
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let in_flight = self.publish == PublishState::InFlight;
        AppViewModel {
            route: self.route.clone(),
            waiting_for_session: self.pending_route.is_some(),
            signed_in: self.auth.is_signed_in(),
            is_admin: self.auth.is_admin(),
            theme: self.theme,
            publish: self.publish.clone(),
            progress: self.progress,
            editor_read_only: self.progress > 0 && self.progress < progress::PUBLISHED,
            can_publish: !in_flight,
            pending_media: self.pending_media,
            has_cover: self.has_cover,
            notices: self.notices.clone(),
            dirty: self.dirty,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn publish_state(&self) -> &PublishState {
        &self.publish
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Drains queued notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_route(&mut self, route: Route) {
        self.route = route;
        self.pending_route = None;
        self.mark_dirty();
    }

    pub(crate) fn hold_route(&mut self, route: Route) {
        self.pending_route = Some(route);
        self.mark_dirty();
    }

    pub(crate) fn take_pending_route(&mut self) -> Option<Route> {
        self.pending_route.take()
    }

    pub(crate) fn set_auth(&mut self, auth: AuthState) {
        self.auth = auth;
        self.mark_dirty();
    }

    pub(crate) fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.mark_dirty();
    }

    pub(crate) fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
        self.mark_dirty();
    }

    pub(crate) fn media_queued(&mut self) {
        self.pending_media += 1;
        self.mark_dirty();
    }

    pub(crate) fn media_removed(&mut self) {
        self.pending_media = self.pending_media.saturating_sub(1);
        self.mark_dirty();
    }

    pub(crate) fn set_cover(&mut self, present: bool) {
        self.has_cover = present;
        self.mark_dirty();
    }

    pub(crate) fn has_cover(&self) -> bool {
        self.has_cover
    }

    pub(crate) fn start_publish(&mut self) {
        self.publish = PublishState::InFlight;
        self.progress = progress::STARTED;
        self.mark_dirty();
    }

    pub(crate) fn set_progress(&mut self, value: u8) {
        let value = value.min(progress::PUBLISHED);
        if self.progress != value {
            self.progress = value;
            self.mark_dirty();
        }
    }

    /// Publishing failed; the draft stays editable and queued media is kept.
    pub(crate) fn abort_publish(&mut self) {
        self.publish = PublishState::Editing;
        self.progress = 0;
        self.mark_dirty();
    }

    pub(crate) fn finish_publish(&mut self, slug: String) {
        self.publish = PublishState::Published { slug };
        self.progress = progress::PUBLISHED;
        self.pending_media = 0;
        self.has_cover = false;
        self.mark_dirty();
    }
}
