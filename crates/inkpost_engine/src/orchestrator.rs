//! Deferred media uploads for a draft article.
//!
//! Selected files are queued and stand in the draft as placeholder blocks.
//! Nothing leaves the machine until [`UploadOrchestrator::finalize`], which
//! uploads the cover, then images, then videos, one at a time, and swaps each
//! placeholder for the uploaded element.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use inkpost_core::{
    media_element, validate_selection, MediaId, MediaKind, Placeholder, ProgressPlan,
    SelectionError, STARTED,
};
use inkpost_logging::{ink_debug, ink_info, ink_warn};
use thiserror::Error;

use crate::preview::preview_data_url;
use crate::{ClientSettings, EngineEvent, MediaFile, MediaUploader, UploadError};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

type UploadFn = dyn Fn() -> BoxFuture<'static, Result<String, UploadError>> + Send + Sync;

/// A zero-argument upload that runs only when invoked. Resolves to the
/// storage path of the uploaded file.
#[derive(Clone)]
pub struct DeferredUpload(Arc<UploadFn>);

impl DeferredUpload {
    pub fn new<F, Fut>(upload: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, UploadError>> + Send + 'static,
    {
        Self(Arc::new(move || upload().boxed()))
    }

    pub fn for_file(uploader: Arc<dyn MediaUploader>, file: MediaFile) -> Self {
        Self::new(move || {
            let uploader = uploader.clone();
            let file = file.clone();
            async move { uploader.upload(&file).await }
        })
    }

    pub async fn run(&self) -> Result<String, UploadError> {
        (self.0)().await
    }
}

impl fmt::Debug for DeferredUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeferredUpload")
    }
}

#[derive(Debug, Clone)]
pub struct PendingMedia {
    pub id: MediaId,
    pub kind: MediaKind,
    pub file_name: String,
    pub file: MediaFile,
    pub placeholder: Placeholder,
    pub preview_url: String,
    pub upload: DeferredUpload,
}

#[derive(Debug, Clone)]
pub struct PendingCover {
    pub file: MediaFile,
    pub preview_url: String,
    pub upload: DeferredUpload,
}

/// Result of a successful finalize run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedArticle {
    pub content: String,
    /// Public URL of the cover image, empty when no cover was queued.
    pub cover_url: String,
}

#[derive(Debug, Clone, Error)]
pub enum FinalizeError {
    #[error("cover upload failed: {0}")]
    Cover(#[source] UploadError),
    #[error("{kind} upload failed for {file_name}: {source}")]
    Media {
        kind: MediaKind,
        file_name: String,
        source: UploadError,
    },
}

impl FinalizeError {
    pub fn upload_error(&self) -> &UploadError {
        match self {
            FinalizeError::Cover(err) => err,
            FinalizeError::Media { source, .. } => source,
        }
    }
}

/// Uploads the cover, then `images`, then `videos`, each strictly after the
/// previous one completes, and substitutes every placeholder in `content`.
///
/// The first failure aborts the run. `content` is borrowed, so the caller's
/// draft is untouched whether the run succeeds or fails.
pub async fn finalize(
    content: &str,
    images: &[PendingMedia],
    videos: &[PendingMedia],
    cover: Option<&PendingCover>,
    settings: &ClientSettings,
    sink: &dyn ProgressSink,
) -> Result<FinalizedArticle, FinalizeError> {
    let plan = ProgressPlan::new(cover.is_some(), images.len(), videos.len());
    ink_info!(
        "Finalizing draft: {} upload(s) ({} image(s), {} video(s), cover: {})",
        plan.upload_count(),
        images.len(),
        videos.len(),
        cover.is_some()
    );
    sink.emit(EngineEvent::PublishProgress(STARTED));

    let cover_url = match cover {
        Some(cover) => {
            let path = cover.upload.run().await.map_err(FinalizeError::Cover)?;
            settings.media_url(&path)
        }
        None => String::new(),
    };
    sink.emit(EngineEvent::PublishProgress(plan.after_cover()));

    let mut content = content.to_string();
    for (done, entry) in images.iter().chain(videos).enumerate() {
        let path = entry
            .upload
            .run()
            .await
            .map_err(|source| FinalizeError::Media {
                kind: entry.kind,
                file_name: entry.file_name.clone(),
                source,
            })?;
        let element = media_element(entry.kind, &settings.media_url(&path));
        let (next, replaced) = entry.placeholder.substitute(&content, &element);
        if replaced == 0 {
            ink_warn!(
                "Placeholder {} is no longer in the draft",
                entry.placeholder.token()
            );
        }
        content = next;
        sink.emit(EngineEvent::PublishProgress(plan.after_media(done + 1)));
    }

    Ok(FinalizedArticle { content, cover_url })
}

/// Owns a draft and the media queued for it.
pub struct UploadOrchestrator {
    uploader: Arc<dyn MediaUploader>,
    content: String,
    images: Vec<PendingMedia>,
    videos: Vec<PendingMedia>,
    cover: Option<PendingCover>,
    next_id: MediaId,
}

impl fmt::Debug for UploadOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadOrchestrator")
            .field("content", &self.content)
            .field("images", &self.images)
            .field("videos", &self.videos)
            .field("cover", &self.cover)
            .finish_non_exhaustive()
    }
}

impl UploadOrchestrator {
    pub fn new(uploader: Arc<dyn MediaUploader>) -> Self {
        Self {
            uploader,
            content: String::new(),
            images: Vec::new(),
            videos: Vec::new(),
            cover: None,
            next_id: 1,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replaces the draft text, e.g. after the user edited it.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn images(&self) -> &[PendingMedia] {
        &self.images
    }

    pub fn videos(&self) -> &[PendingMedia] {
        &self.videos
    }

    pub fn cover(&self) -> Option<&PendingCover> {
        self.cover.as_ref()
    }

    pub fn pending_uploads(&self) -> usize {
        self.images.len() + self.videos.len() + usize::from(self.cover.is_some())
    }

    /// Validates and queues `file`, appending its placeholder block to the draft.
    /// A rejected file leaves the orchestrator unchanged.
    pub fn select_file(
        &mut self,
        kind: MediaKind,
        file: MediaFile,
    ) -> Result<&PendingMedia, SelectionError> {
        validate_selection(kind, &file.mime, file.size())?;

        let id = self.next_id;
        self.next_id += 1;

        let placeholder = Placeholder::unique(kind, &file.name, |candidate| {
            self.images
                .iter()
                .chain(&self.videos)
                .any(|entry| &entry.placeholder == candidate)
                || candidate.occurs_in(&self.content)
        });
        self.content.push_str(&placeholder.block());
        ink_debug!("Queued {} {} as {}", kind, file.name, placeholder.token());

        let entry = PendingMedia {
            id,
            kind,
            file_name: file.name.clone(),
            preview_url: preview_data_url(&file),
            upload: DeferredUpload::for_file(self.uploader.clone(), file.clone()),
            placeholder,
            file,
        };
        let queue = match kind {
            MediaKind::Image => &mut self.images,
            MediaKind::Video => &mut self.videos,
        };
        queue.push(entry);
        Ok(&queue[queue.len() - 1])
    }

    /// The queued entry whose placeholder is called `name`, e.g. `cat_2.png`.
    pub fn queued_id(&self, name: &str) -> Option<MediaId> {
        self.images
            .iter()
            .chain(&self.videos)
            .find(|entry| entry.placeholder.name() == name)
            .map(|entry| entry.id)
    }

    /// Dequeues `id` and strips its placeholder block from the draft. Unknown
    /// ids are ignored.
    pub fn remove(&mut self, id: MediaId) -> Option<PendingMedia> {
        let entry = [&mut self.images, &mut self.videos]
            .into_iter()
            .find_map(|queue| {
                let index = queue.iter().position(|entry| entry.id == id)?;
                Some(queue.remove(index))
            })?;
        self.content = entry.placeholder.strip_block(&self.content);
        ink_debug!("Removed {} from the draft", entry.placeholder.token());
        Some(entry)
    }

    /// Queues an image as the article cover, replacing any previous one.
    pub fn set_cover(&mut self, file: MediaFile) -> Result<&PendingCover, SelectionError> {
        validate_selection(MediaKind::Image, &file.mime, file.size())?;
        let cover = PendingCover {
            preview_url: preview_data_url(&file),
            upload: DeferredUpload::for_file(self.uploader.clone(), file.clone()),
            file,
        };
        Ok(self.cover.insert(cover))
    }

    pub fn clear_cover(&mut self) -> Option<PendingCover> {
        self.cover.take()
    }

    /// Runs every queued upload and returns the publishable content. The
    /// orchestrator itself is left as is; call [`Self::clear`] once the article
    /// has been accepted.
    pub async fn finalize(
        &self,
        settings: &ClientSettings,
        sink: &dyn ProgressSink,
    ) -> Result<FinalizedArticle, FinalizeError> {
        finalize(
            &self.content,
            &self.images,
            &self.videos,
            self.cover.as_ref(),
            settings,
            sink,
        )
        .await
    }

    /// Drops the draft and everything queued for it.
    pub fn clear(&mut self) {
        self.content.clear();
        self.images.clear();
        self.videos.clear();
        self.cover = None;
    }
}
