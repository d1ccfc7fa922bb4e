//! Inkpost engine: remote API, media uploads and effect execution.
mod api;
mod auth;
mod engine;
mod orchestrator;
mod persist;
mod preview;
mod settings;
mod types;
mod upload;
mod view;

pub use api::{ApiClient, ACTIVITY_LIMIT, FEATURED_LIMIT, PAGE_SIZE};
pub use auth::{StaticSession, TokenProvider};
pub use engine::{submit, EngineHandle};
pub use orchestrator::{
    finalize, ChannelProgressSink, DeferredUpload, FinalizeError, FinalizedArticle, PendingCover,
    PendingMedia, ProgressSink, UploadOrchestrator,
};
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use preview::preview_data_url;
pub use settings::{ClientSettings, DEFAULT_UPLOAD_URL};
pub use types::{
    ActivityFeed, AnalyticsSnapshot, ApiError, ApiMessage, ArticleMeta, AuthorRef, Blog,
    BlogAuthor, BlogPage, Category, CategoryCount, Comment, CommentBlog, CommentBlogRef,
    DailyCount, DailyViews, DashboardBlogPage, DashboardStats, EngineEvent, FailureKind, NewBlog,
    PublishError, UploadCredentials, UploadedFile, User, UserPage,
};
pub use upload::{CredentialSource, ImageKitUploader, MediaFile, MediaUploader, UploadError};
pub use view::{load_view, ViewData, ViewRequest};
