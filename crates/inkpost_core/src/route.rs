use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use url::form_urlencoded;
use url::Url;

pub const DEFAULT_ANALYTICS_DAYS: u32 = 30;

/// Characters escaped when a slug is written back into a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Blogs(BlogFilter),
    Saved,
    Write,
    Login,
    Register,
    Article { slug: String },
    Dashboard(DashboardPage),
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlogFilter {
    pub page: u32,
    pub category: Option<String>,
    pub author: Option<String>,
    pub search: Option<String>,
    pub sort: Option<BlogSort>,
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardPage {
    Overview,
    MyBlogs { page: u32, sort: BlogSort },
    Analytics { days: u32 },
    Activity,
    AllBlogs(AllBlogsFilter),
    Users { page: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllBlogsFilter {
    pub page: u32,
    pub sort: BlogSort,
    pub category: Option<String>,
    pub featured: Option<bool>,
}

impl Default for AllBlogsFilter {
    fn default() -> Self {
        Self {
            page: 1,
            sort: BlogSort::Newest,
            category: None,
            featured: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlogSort {
    #[default]
    Newest,
    Oldest,
    Popular,
    Trending,
}

impl BlogSort {
    pub fn as_str(self) -> &'static str {
        match self {
            BlogSort::Newest => "newest",
            BlogSort::Oldest => "oldest",
            BlogSort::Popular => "popular",
            BlogSort::Trending => "trending",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "newest" => Some(BlogSort::Newest),
            "oldest" => Some(BlogSort::Oldest),
            "popular" => Some(BlogSort::Popular),
            "trending" => Some(BlogSort::Trending),
            _ => None,
        }
    }
}

/// Who may open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    SignedIn,
    Admin,
}

impl Route {
    /// Parses an application path such as `/blogs?category=health&page=2`.
    pub fn parse(path: &str) -> Route {
        let base = Url::parse("http://inkpost.invalid/").expect("static base url");
        let Ok(url) = base.join(path.trim()) else {
            return Route::NotFound(path.to_string());
        };
        let decoded: Vec<String> = url
            .path_segments()
            .map(|s| {
                s.filter(|seg| !seg.is_empty())
                    .map(|seg| percent_decode_str(seg).decode_utf8_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        let segments: Vec<&str> = decoded.iter().map(String::as_str).collect();
        let query = Query::from_url(&url);

        match segments.as_slice() {
            [] => Route::Home,
            ["blogs"] => Route::Blogs(BlogFilter {
                page: query.page(),
                category: query.text("cat").or_else(|| query.text("category")),
                author: query.text("author"),
                search: query.text("search"),
                sort: query.text("sort").as_deref().and_then(BlogSort::parse),
                featured: query.flag("featured"),
            }),
            ["saved"] => Route::Saved,
            ["write"] => Route::Write,
            ["login", ..] => Route::Login,
            ["register", ..] => Route::Register,
            ["dashboard"] => Route::Dashboard(DashboardPage::Overview),
            ["dashboard", "my-blogs"] => Route::Dashboard(DashboardPage::MyBlogs {
                page: query.page(),
                sort: query
                    .text("sort")
                    .as_deref()
                    .and_then(BlogSort::parse)
                    .unwrap_or_default(),
            }),
            ["dashboard", "analytics"] => Route::Dashboard(DashboardPage::Analytics {
                days: query
                    .number("days")
                    .filter(|d| *d > 0)
                    .unwrap_or(DEFAULT_ANALYTICS_DAYS),
            }),
            ["dashboard", "activity"] => Route::Dashboard(DashboardPage::Activity),
            ["dashboard", "all-blogs"] => Route::Dashboard(DashboardPage::AllBlogs(AllBlogsFilter {
                page: query.page(),
                sort: query
                    .text("sort")
                    .as_deref()
                    .and_then(BlogSort::parse)
                    .unwrap_or_default(),
                category: query.text("category"),
                featured: query.flag("featured"),
            })),
            ["dashboard", "users"] => Route::Dashboard(DashboardPage::Users { page: query.page() }),
            [slug] => Route::Article {
                slug: (*slug).to_string(),
            },
            _ => Route::NotFound(url.path().to_string()),
        }
    }

    /// Renders the route back into an application path.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Blogs(filter) => {
                let mut q = form_urlencoded::Serializer::new(String::new());
                if filter.page > 1 {
                    q.append_pair("page", &filter.page.to_string());
                }
                if let Some(category) = &filter.category {
                    q.append_pair("cat", category);
                }
                if let Some(author) = &filter.author {
                    q.append_pair("author", author);
                }
                if let Some(search) = &filter.search {
                    q.append_pair("search", search);
                }
                if let Some(sort) = filter.sort {
                    q.append_pair("sort", sort.as_str());
                }
                if let Some(featured) = filter.featured {
                    q.append_pair("featured", if featured { "true" } else { "false" });
                }
                with_query("/blogs", q.finish())
            }
            Route::Saved => "/saved".to_string(),
            Route::Write => "/write".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Article { slug } => format!("/{}", utf8_percent_encode(slug, SEGMENT)),
            Route::Dashboard(page) => match page {
                DashboardPage::Overview => "/dashboard".to_string(),
                DashboardPage::MyBlogs { page, sort } => format!(
                    "/dashboard/my-blogs?page={page}&sort={}",
                    sort.as_str()
                ),
                DashboardPage::Analytics { days } => format!("/dashboard/analytics?days={days}"),
                DashboardPage::Activity => "/dashboard/activity".to_string(),
                DashboardPage::AllBlogs(filter) => {
                    let mut q = form_urlencoded::Serializer::new(String::new());
                    q.append_pair("page", &filter.page.to_string());
                    q.append_pair("sort", filter.sort.as_str());
                    if let Some(category) = &filter.category {
                        q.append_pair("category", category);
                    }
                    if let Some(featured) = filter.featured {
                        q.append_pair("featured", if featured { "true" } else { "false" });
                    }
                    with_query("/dashboard/all-blogs", q.finish())
                }
                DashboardPage::Users { page } => format!("/dashboard/users?page={page}"),
            },
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn requirement(&self) -> Requirement {
        match self {
            Route::Write | Route::Saved => Requirement::SignedIn,
            Route::Dashboard(DashboardPage::AllBlogs(_) | DashboardPage::Users { .. }) => {
                Requirement::Admin
            }
            Route::Dashboard(_) => Requirement::SignedIn,
            Route::Home
            | Route::Blogs(_)
            | Route::Login
            | Route::Register
            | Route::Article { .. }
            | Route::NotFound(_) => Requirement::Public,
        }
    }

    /// Whether opening the route needs data from the remote API.
    pub fn has_remote_data(&self) -> bool {
        !matches!(
            self,
            Route::Write | Route::Login | Route::Register | Route::NotFound(_)
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn with_query(path: &str, query: String) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

struct Query(Vec<(String, String)>);

impl Query {
    fn from_url(url: &Url) -> Self {
        Self(url.query_pairs().into_owned().collect())
    }

    fn text(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn number(&self, key: &str) -> Option<u32> {
        self.text(key).and_then(|v| v.parse().ok())
    }

    fn page(&self) -> u32 {
        self.number("page").filter(|p| *p > 0).unwrap_or(1)
    }

    fn flag(&self, key: &str) -> Option<bool> {
        match self.text(key)?.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}
