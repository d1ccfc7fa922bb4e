use std::time::Duration;

pub const DEFAULT_UPLOAD_URL: &str = "https://upload.imagekit.io/api/v1/files/upload";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Base URL of the blog REST API, without a trailing slash.
    pub api_url: String,
    /// Public media endpoint that storage paths are appended to.
    pub media_url_endpoint: String,
    /// Direct-upload endpoint of the media service.
    pub upload_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Upload requests carry whole files, so they get a longer ceiling.
    pub upload_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            media_url_endpoint: String::new(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            upload_timeout: Duration::from_secs(300),
        }
    }
}

impl ClientSettings {
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_media_url_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.media_url_endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_upload_url(mut self, upload_url: impl Into<String>) -> Self {
        self.upload_url = upload_url.into();
        self
    }

    /// Public URL for a storage path returned by the upload service.
    pub fn media_url(&self, file_path: &str) -> String {
        if file_path.starts_with('/') || self.media_url_endpoint.is_empty() {
            format!("{}{}", self.media_url_endpoint, file_path)
        } else {
            format!("{}/{}", self.media_url_endpoint, file_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClientSettings;

    #[test]
    fn media_url_joins_with_single_slash() {
        let settings = ClientSettings::default().with_media_url_endpoint("https://ik.imagekit.io/demo/");
        assert_eq!(
            settings.media_url("/img/cat123.png"),
            "https://ik.imagekit.io/demo/img/cat123.png"
        );
        assert_eq!(
            settings.media_url("img/cat123.png"),
            "https://ik.imagekit.io/demo/img/cat123.png"
        );
    }

    #[test]
    fn api_url_trailing_slash_is_trimmed() {
        let settings = ClientSettings::default().with_api_url("http://api.local/");
        assert_eq!(settings.api_url, "http://api.local");
    }
}
