use std::path::PathBuf;

use inkpost_core::Role;
use inkpost_engine::{ClientSettings, StaticSession};

pub const ENV_API_URL: &str = "INKPOST_API_URL";
pub const ENV_MEDIA_URL_ENDPOINT: &str = "INKPOST_MEDIA_URL_ENDPOINT";
pub const ENV_UPLOAD_URL: &str = "INKPOST_UPLOAD_URL";
pub const ENV_SESSION_TOKEN: &str = "INKPOST_SESSION_TOKEN";
pub const ENV_USER_ID: &str = "INKPOST_USER_ID";
pub const ENV_ROLE: &str = "INKPOST_ROLE";
pub const ENV_STATE_DIR: &str = "INKPOST_STATE_DIR";
pub const ENV_SYSTEM_THEME: &str = "INKPOST_SYSTEM_THEME";

const DEFAULT_STATE_DIR: &str = ".inkpost";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub settings: ClientSettings,
    pub session: StaticSession,
    pub state_dir: PathBuf,
    pub system_prefers_dark: bool,
}

impl AppConfig {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut settings = ClientSettings::default();
        if let Some(api_url) = value(ENV_API_URL) {
            settings = settings.with_api_url(api_url);
        }
        if let Some(endpoint) = value(ENV_MEDIA_URL_ENDPOINT) {
            settings = settings.with_media_url_endpoint(endpoint);
        }
        if let Some(upload_url) = value(ENV_UPLOAD_URL) {
            settings = settings.with_upload_url(upload_url);
        }

        let session = match value(ENV_SESSION_TOKEN) {
            Some(token) => StaticSession::new(
                token,
                value(ENV_USER_ID),
                Role::from_metadata(value(ENV_ROLE).as_deref()),
            ),
            None => StaticSession::signed_out(),
        };

        Self {
            settings,
            session,
            state_dir: value(ENV_STATE_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR)),
            system_prefers_dark: value(ENV_SYSTEM_THEME)
                .is_some_and(|theme| theme.trim().eq_ignore_ascii_case("dark")),
        }
    }
}
