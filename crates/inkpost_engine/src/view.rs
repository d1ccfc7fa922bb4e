use inkpost_core::{AllBlogsFilter, BlogFilter, BlogSort, DashboardPage, Route};

use crate::{
    ActivityFeed, AnalyticsSnapshot, ApiClient, ApiError, Blog, BlogPage, Comment,
    DashboardBlogPage, DashboardStats, UserPage,
};

/// Remote data request backing one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRequest {
    Home,
    Blogs(BlogFilter),
    Saved,
    Article { slug: String },
    Overview,
    MyBlogs { page: u32, sort: BlogSort },
    Analytics { days: u32 },
    Activity,
    AllBlogs(AllBlogsFilter),
    Users { page: u32 },
}

impl ViewRequest {
    /// `None` for routes that render without remote data.
    pub fn for_route(route: &Route) -> Option<Self> {
        let request = match route {
            Route::Home => ViewRequest::Home,
            Route::Blogs(filter) => ViewRequest::Blogs(filter.clone()),
            Route::Saved => ViewRequest::Saved,
            Route::Article { slug } => ViewRequest::Article { slug: slug.clone() },
            Route::Dashboard(page) => match page {
                DashboardPage::Overview => ViewRequest::Overview,
                DashboardPage::MyBlogs { page, sort } => ViewRequest::MyBlogs {
                    page: *page,
                    sort: *sort,
                },
                DashboardPage::Analytics { days } => ViewRequest::Analytics { days: *days },
                DashboardPage::Activity => ViewRequest::Activity,
                DashboardPage::AllBlogs(filter) => ViewRequest::AllBlogs(filter.clone()),
                DashboardPage::Users { page } => ViewRequest::Users { page: *page },
            },
            Route::Write | Route::Login | Route::Register | Route::NotFound(_) => return None,
        };
        Some(request)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewData {
    Home { featured: BlogPage, latest: BlogPage },
    Blogs(BlogPage),
    Saved(Vec<Blog>),
    Article { blog: Blog, comments: Vec<Comment> },
    Overview(DashboardStats),
    MyBlogs(DashboardBlogPage),
    Analytics(AnalyticsSnapshot),
    Activity(ActivityFeed),
    AllBlogs(DashboardBlogPage),
    Users(UserPage),
}

/// Issues the API calls for `request`.
pub async fn load_view(api: &ApiClient, request: &ViewRequest) -> Result<ViewData, ApiError> {
    Ok(match request {
        ViewRequest::Home => {
            let featured = api.featured_blogs().await?;
            let latest = api
                .list_blogs(&BlogFilter {
                    page: 1,
                    ..BlogFilter::default()
                })
                .await?;
            ViewData::Home { featured, latest }
        }
        ViewRequest::Blogs(filter) => ViewData::Blogs(api.list_blogs(filter).await?),
        ViewRequest::Saved => ViewData::Saved(api.saved_blogs().await?),
        ViewRequest::Article { slug } => {
            let blog = api.blog(slug).await?;
            let comments = api.comments(&blog.id).await?;
            ViewData::Article { blog, comments }
        }
        ViewRequest::Overview => ViewData::Overview(api.dashboard_stats().await?),
        ViewRequest::MyBlogs { page, sort } => ViewData::MyBlogs(api.my_blogs(*page, *sort).await?),
        ViewRequest::Analytics { days } => ViewData::Analytics(api.analytics(*days).await?),
        ViewRequest::Activity => ViewData::Activity(api.activity().await?),
        ViewRequest::AllBlogs(filter) => ViewData::AllBlogs(api.all_blogs(filter).await?),
        ViewRequest::Users { page } => ViewData::Users(api.dashboard_users(*page).await?),
    })
}
