use std::sync::Arc;

use inkpost_core::{AllBlogsFilter, BlogFilter, BlogSort};
use inkpost_logging::{ink_debug, ink_warn};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::TokenProvider;
use crate::types::{BlogIdBody, NewComment};
use crate::{
    ActivityFeed, AnalyticsSnapshot, ApiError, ApiMessage, Blog, BlogPage, ClientSettings,
    Comment, DashboardBlogPage, DashboardStats, FailureKind, NewBlog, UploadCredentials,
    UserPage,
};

pub const PAGE_SIZE: u32 = 10;
pub const FEATURED_LIMIT: u32 = 4;
pub const ACTIVITY_LIMIT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Public,
    Required,
}

/// Typed client for the blog REST API.
#[derive(Clone)]
pub struct ApiClient {
    settings: ClientSettings,
    client: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    pub fn new(settings: ClientSettings, tokens: Arc<dyn TokenProvider>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            client,
            tokens,
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub async fn list_blogs(&self, filter: &BlogFilter) -> Result<BlogPage, ApiError> {
        let mut query = vec![
            ("page", filter.page.max(1).to_string()),
            ("limit", PAGE_SIZE.to_string()),
        ];
        push_opt(&mut query, "cat", filter.category.as_deref());
        push_opt(&mut query, "author", filter.author.as_deref());
        push_opt(&mut query, "search", filter.search.as_deref());
        push_opt(&mut query, "sort", filter.sort.map(BlogSort::as_str));
        push_opt(&mut query, "featured", filter.featured.map(bool_str));
        self.get(&["blogs"], &query, Auth::Public).await
    }

    pub async fn featured_blogs(&self) -> Result<BlogPage, ApiError> {
        let query = [
            ("featured", "true".to_string()),
            ("limit", FEATURED_LIMIT.to_string()),
            ("sort", BlogSort::Trending.as_str().to_string()),
        ];
        self.get(&["blogs"], &query, Auth::Public).await
    }

    pub async fn blog(&self, slug: &str) -> Result<Blog, ApiError> {
        self.get(&["blogs", slug], &[], Auth::Public).await
    }

    pub async fn create_blog(&self, blog: &NewBlog) -> Result<Blog, ApiError> {
        self.send_json(Method::POST, &["blogs"], blog).await
    }

    pub async fn delete_blog(&self, blog_id: &str) -> Result<ApiMessage, ApiError> {
        self.request(Method::DELETE, &["blogs", blog_id], &[], None::<&()>, Auth::Required)
            .await
    }

    pub async fn toggle_featured(&self, blog_id: &str) -> Result<Blog, ApiError> {
        self.send_json(Method::PATCH, &["blogs", "feature"], &BlogIdBody { blog_id })
            .await
    }

    /// Fetches fresh credentials for a single direct upload.
    pub async fn upload_credentials(&self) -> Result<UploadCredentials, ApiError> {
        self.get(&["blogs", "upload-auth"], &[], Auth::Public).await
    }

    pub async fn saved_blogs(&self) -> Result<Vec<Blog>, ApiError> {
        self.get(&["users", "saved"], &[], Auth::Required).await
    }

    pub async fn toggle_saved(&self, blog_id: &str) -> Result<ApiMessage, ApiError> {
        self.send_json(Method::PATCH, &["users", "save"], &BlogIdBody { blog_id })
            .await
    }

    pub async fn comments(&self, blog_id: &str) -> Result<Vec<Comment>, ApiError> {
        self.get(&["comments", blog_id], &[], Auth::Public).await
    }

    pub async fn add_comment(&self, blog_id: &str, desc: &str) -> Result<Comment, ApiError> {
        self.send_json(Method::POST, &["comments", blog_id], &NewComment { desc })
            .await
    }

    pub async fn delete_comment(&self, comment_id: &str) -> Result<ApiMessage, ApiError> {
        self.request(
            Method::DELETE,
            &["comments", comment_id],
            &[],
            None::<&()>,
            Auth::Required,
        )
            .await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get(&["dashboard", "stats"], &[], Auth::Required).await
    }

    pub async fn analytics(&self, days: u32) -> Result<AnalyticsSnapshot, ApiError> {
        self.get(
            &["dashboard", "analytics"],
            &[("days", days.to_string())],
            Auth::Required,
        )
        .await
    }

    pub async fn activity(&self) -> Result<ActivityFeed, ApiError> {
        self.get(
            &["dashboard", "activity"],
            &[("limit", ACTIVITY_LIMIT.to_string())],
            Auth::Required,
        )
        .await
    }

    pub async fn dashboard_users(&self, page: u32) -> Result<UserPage, ApiError> {
        let query = [
            ("page", page.max(1).to_string()),
            ("limit", PAGE_SIZE.to_string()),
        ];
        self.get(&["dashboard", "users"], &query, Auth::Required).await
    }

    pub async fn my_blogs(&self, page: u32, sort: BlogSort) -> Result<DashboardBlogPage, ApiError> {
        let query = [
            ("page", page.max(1).to_string()),
            ("limit", PAGE_SIZE.to_string()),
            ("sort", sort.as_str().to_string()),
        ];
        self.get(&["dashboard", "my-blogs"], &query, Auth::Required).await
    }

    pub async fn all_blogs(&self, filter: &AllBlogsFilter) -> Result<DashboardBlogPage, ApiError> {
        let mut query = vec![
            ("page", filter.page.max(1).to_string()),
            ("limit", PAGE_SIZE.to_string()),
            ("sort", filter.sort.as_str().to_string()),
        ];
        push_opt(&mut query, "category", filter.category.as_deref());
        push_opt(&mut query, "featured", filter.featured.map(bool_str));
        self.get(&["dashboard", "all-blogs"], &query, Auth::Required).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        auth: Auth,
    ) -> Result<T, ApiError> {
        self.request(Method::GET, segments, query, None::<&()>, auth).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(method, segments, &[], Some(body), Auth::Required)
            .await
    }

    async fn request<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<&B>,
        auth: Auth,
    ) -> Result<T, ApiError> {
        let url = self.build_url(segments, query)?;
        let path = url.path();
        let mut request = self.client.request(method.clone(), url.clone());
        if auth == Auth::Required {
            let token = self.tokens.token().await.ok_or_else(|| {
                ApiError::new(FailureKind::Unauthenticated, format!("{method} {path}"))
            })?;
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        ink_debug!("{} {}", method, url);
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            ink_warn!("{} {} failed with {}", method, path, status);
            let message = if text.trim().is_empty() {
                status.to_string()
            } else {
                text
            };
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        serde_json::from_str(&text).map_err(|err| {
            ink_warn!("{} {} returned an unexpected body: {}", method, path, err);
            ApiError::new(FailureKind::Decode, err.to_string())
        })
    }

    /// Appends `segments` to the API base, escaping each one as a path segment.
    fn build_url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.settings.api_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::new(
                    FailureKind::InvalidUrl,
                    format!("{} cannot carry a path", self.settings.api_url),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }
}

fn push_opt(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(value) = value {
        query.push((key, value.to_string()));
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
