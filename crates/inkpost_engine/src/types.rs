use std::fmt;

use inkpost_core::{Mutation, Route};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{FinalizeError, UploadOrchestrator, ViewData};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// An authenticated endpoint was called without a session token.
    Unauthenticated,
    HttpStatus(u16),
    Timeout,
    Network,
    /// The body did not match the expected schema.
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Unauthenticated => write!(f, "not signed in"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "unexpected response shape"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Lifestyle,
    Technology,
    Startup,
    Health,
    Gaming,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::General,
        Category::Lifestyle,
        Category::Technology,
        Category::Startup,
        Category::Health,
        Category::Gaming,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Lifestyle => "lifestyle",
            Category::Technology => "technology",
            Category::Startup => "startup",
            Category::Health => "health",
            Category::Gaming => "gaming",
        }
    }

    pub fn parse(raw: &str) -> Option<Category> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogAuthor {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub img: Option<String>,
}

/// The API populates the author on most endpoints but not all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorRef {
    Populated(BlogAuthor),
    Id(String),
}

impl AuthorRef {
    pub fn username(&self) -> Option<&str> {
        match self {
            AuthorRef::Populated(author) if !author.username.is_empty() => Some(author.username.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user: Option<AuthorRef>,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, alias = "visit")]
    pub views: u64,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Blog {
    pub fn author_name(&self) -> &str {
        self.user
            .as_ref()
            .and_then(AuthorRef::username)
            .unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPage {
    #[serde(default)]
    pub blogs: Vec<Blog>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardBlogPage {
    #[serde(default)]
    pub blogs: Vec<Blog>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentBlog {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentBlogRef {
    Populated(CommentBlog),
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user: Option<AuthorRef>,
    #[serde(default)]
    pub blog: Option<CommentBlogRef>,
    pub desc: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(rename = "_id")]
    pub category: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_blogs: u64,
    #[serde(default)]
    pub total_views: u64,
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub featured_blogs: u64,
    #[serde(default)]
    pub recent_blogs: Option<u64>,
    #[serde(default)]
    pub blogs_by_category: Vec<CategoryCount>,
    /// Only present for admins.
    #[serde(default)]
    pub total_users: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    #[serde(rename = "_id")]
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyViews {
    #[serde(rename = "_id")]
    pub date: String,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    #[serde(default)]
    pub views_over_time: Vec<DailyViews>,
    #[serde(default)]
    pub blogs_over_time: Vec<DailyCount>,
    #[serde(default)]
    pub top_blogs: Vec<Blog>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFeed {
    #[serde(default)]
    pub recent_blogs: Vec<Blog>,
    #[serde(default)]
    pub recent_comments: Vec<Comment>,
}

/// Endpoints answer writes with either a bare string or `{ "message": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiMessage {
    Text(String),
    Object { message: String },
}

impl ApiMessage {
    pub fn text(&self) -> &str {
        match self {
            ApiMessage::Text(text) => text,
            ApiMessage::Object { message } => message,
        }
    }
}

/// Short-lived credentials authorizing one direct upload to the media service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCredentials {
    pub signature: String,
    pub expire: u64,
    pub token: String,
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Storage path relative to the media URL endpoint.
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBlog {
    pub img: String,
    pub title: String,
    pub desc: String,
    pub category: Category,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct NewComment<'a> {
    pub desc: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BlogIdBody<'a> {
    pub blog_id: &'a str,
}

/// Metadata entered alongside the draft content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleMeta {
    pub title: String,
    pub desc: String,
    pub category: Category,
}

#[derive(Debug, Clone, Error)]
pub enum PublishError {
    #[error(transparent)]
    Upload(#[from] FinalizeError),
    #[error("article submission failed: {0}")]
    Submit(#[source] ApiError),
}

#[derive(Debug)]
pub enum EngineEvent {
    Loaded {
        route: Route,
        result: Result<ViewData, ApiError>,
    },
    Mutated {
        mutation: Mutation,
        result: Result<(), ApiError>,
    },
    PublishProgress(u8),
    /// The article was accepted; the orchestrator comes back emptied.
    Published {
        slug: String,
        orchestrator: UploadOrchestrator,
    },
    /// Nothing was published; the orchestrator comes back with its queue intact.
    PublishFailed {
        error: PublishError,
        orchestrator: UploadOrchestrator,
    },
}
