use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use inkpost_logging::{ink_debug, ink_warn};
use reqwest::multipart::{Form, Part};
use thiserror::Error;

use crate::api::map_reqwest_error;
use crate::{ApiClient, ApiError, ClientSettings, FailureKind, UploadCredentials, UploadedFile};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Consulted when the leading bytes carry no binary signature, as with SVG.
const EXTENSION_TO_MIME: [(&str, &str); 13] = [
    ("svg", "image/svg+xml"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("avif", "image/avif"),
    ("bmp", "image/bmp"),
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("webm", "video/webm"),
    ("mov", "video/quicktime"),
    ("ogv", "video/ogg"),
];

/// A local file selected for upload. Contents are shared, so clones are cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    pub mime: String,
    pub bytes: Bytes,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Reads a file from disk and sniffs its MIME type from the leading bytes,
    /// falling back to the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let mime = infer::get(&bytes)
            .filter(|kind| kind.matcher_type() != infer::MatcherType::Text)
            .map(|kind| kind.mime_type())
            .or_else(|| mime_from_extension(path))
            .unwrap_or(FALLBACK_MIME)
            .to_string();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());
        Ok(Self::new(name, mime, bytes))
    }
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    EXTENSION_TO_MIME
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

#[derive(Debug, Clone, Error)]
pub enum UploadError {
    #[error("could not obtain upload credentials: {0}")]
    Credentials(#[source] ApiError),
    #[error("upload of {file_name} failed: {source}")]
    Transfer { file_name: String, source: ApiError },
    #[error("upload of {0} returned no storage path")]
    MissingPath(String),
}

/// Issues short-lived credentials for exactly one direct upload.
#[async_trait::async_trait]
pub trait CredentialSource: Send + Sync {
    async fn credentials(&self) -> Result<UploadCredentials, ApiError>;
}

#[async_trait::async_trait]
impl CredentialSource for ApiClient {
    async fn credentials(&self) -> Result<UploadCredentials, ApiError> {
        self.upload_credentials().await
    }
}

/// Transfers one file to media storage and resolves to its storage path.
#[async_trait::async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, file: &MediaFile) -> Result<String, UploadError>;
}

/// Direct multipart upload to ImageKit. Every call fetches fresh credentials
/// immediately before the transfer.
#[derive(Clone)]
pub struct ImageKitUploader {
    client: reqwest::Client,
    upload_url: String,
    credentials: Arc<dyn CredentialSource>,
}

impl ImageKitUploader {
    pub fn new(
        settings: &ClientSettings,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.upload_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            upload_url: settings.upload_url.clone(),
            credentials,
        })
    }

    fn form(file: &MediaFile, credentials: UploadCredentials) -> Result<Form, ApiError> {
        let part = Part::stream(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        Ok(Form::new()
            .part("file", part)
            .text("fileName", file.name.clone())
            .text("publicKey", credentials.public_key)
            .text("signature", credentials.signature)
            .text("expire", credentials.expire.to_string())
            .text("token", credentials.token))
    }

    async fn transfer(&self, file: &MediaFile, credentials: UploadCredentials) -> Result<UploadedFile, ApiError> {
        let form = Self::form(file, credentials)?;
        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(ApiError::new(FailureKind::HttpStatus(status.as_u16()), text));
        }
        serde_json::from_str(&text).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl MediaUploader for ImageKitUploader {
    async fn upload(&self, file: &MediaFile) -> Result<String, UploadError> {
        let credentials = self
            .credentials
            .credentials()
            .await
            .map_err(UploadError::Credentials)?;

        ink_debug!("Uploading {} ({} bytes)", file.name, file.size());
        let uploaded = self.transfer(file, credentials).await.map_err(|source| {
            ink_warn!("Upload of {} failed: {}", file.name, source);
            UploadError::Transfer {
                file_name: file.name.clone(),
                source,
            }
        })?;

        match uploaded.file_path {
            Some(path) if !path.is_empty() => Ok(path),
            _ => Err(UploadError::MissingPath(file.name.clone())),
        }
    }
}
