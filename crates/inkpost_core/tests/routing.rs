use inkpost_core::{
    gate, Access, AllBlogsFilter, AuthState, BlogFilter, BlogSort, DashboardPage, Requirement,
    Role, Route,
};
use pretty_assertions::assert_eq;

fn signed_in(role: Role) -> AuthState {
    AuthState::SignedIn {
        user_id: "user_1".to_string(),
        role,
    }
}

#[test]
fn parses_public_paths() {
    assert_eq!(Route::parse("/"), Route::Home);
    assert_eq!(Route::parse(""), Route::Home);
    assert_eq!(Route::parse("/write"), Route::Write);
    assert_eq!(Route::parse("/saved"), Route::Saved);
    assert_eq!(Route::parse("/login/factor-one"), Route::Login);
    assert_eq!(
        Route::parse("/my-first-post"),
        Route::Article {
            slug: "my-first-post".to_string()
        }
    );
    assert!(matches!(Route::parse("/a/b/c"), Route::NotFound(_)));
}

#[test]
fn article_slugs_are_decoded_once() {
    let spaced = Route::parse("/my post");
    assert_eq!(
        spaced,
        Route::Article {
            slug: "my post".to_string()
        }
    );
    assert_eq!(spaced.path(), "/my%20post");
    assert_eq!(Route::parse(&spaced.path()), spaced);

    assert_eq!(
        Route::parse("/café"),
        Route::Article {
            slug: "café".to_string()
        }
    );
    assert_eq!(
        Route::parse("/caf%C3%A9"),
        Route::Article {
            slug: "café".to_string()
        }
    );
    assert_eq!(
        Route::parse("/c++"),
        Route::Article {
            slug: "c++".to_string()
        }
    );
}

#[test]
fn blog_list_query_is_carried_into_filter() {
    let route = Route::parse("/blogs?cat=health&sort=trending&search=rust%20lang&page=3");
    assert_eq!(
        route,
        Route::Blogs(BlogFilter {
            page: 3,
            category: Some("health".to_string()),
            author: None,
            search: Some("rust lang".to_string()),
            sort: Some(BlogSort::Trending),
            featured: None,
        })
    );
    assert_eq!(
        route.path(),
        "/blogs?page=3&cat=health&search=rust+lang&sort=trending"
    );
}

#[test]
fn dashboard_paths_have_defaults() {
    assert_eq!(
        Route::parse("/dashboard/analytics"),
        Route::Dashboard(DashboardPage::Analytics { days: 30 })
    );
    assert_eq!(
        Route::parse("/dashboard/analytics?days=7"),
        Route::Dashboard(DashboardPage::Analytics { days: 7 })
    );
    assert_eq!(
        Route::parse("/dashboard/my-blogs?page=0&sort=bogus"),
        Route::Dashboard(DashboardPage::MyBlogs {
            page: 1,
            sort: BlogSort::Newest
        })
    );
    assert_eq!(
        Route::parse("/dashboard/all-blogs?featured=true&category=gaming"),
        Route::Dashboard(DashboardPage::AllBlogs(AllBlogsFilter {
            featured: Some(true),
            category: Some("gaming".to_string()),
            ..AllBlogsFilter::default()
        }))
    );
}

#[test]
fn requirements_follow_route_kind() {
    assert_eq!(Route::Home.requirement(), Requirement::Public);
    assert_eq!(Route::Write.requirement(), Requirement::SignedIn);
    assert_eq!(
        Route::parse("/dashboard/users").requirement(),
        Requirement::Admin
    );
    assert_eq!(
        Route::parse("/dashboard/activity").requirement(),
        Requirement::SignedIn
    );
}

#[test]
fn gate_waits_redirects_and_allows() {
    let dashboard = Route::parse("/dashboard");
    let users = Route::parse("/dashboard/users?page=2");

    assert_eq!(gate(&Route::Home, &AuthState::Loading), Access::Allow);
    assert_eq!(gate(&dashboard, &AuthState::Loading), Access::Wait);
    assert_eq!(
        gate(&dashboard, &AuthState::SignedOut),
        Access::Redirect(Route::Login)
    );
    assert_eq!(gate(&dashboard, &signed_in(Role::User)), Access::Allow);
    assert_eq!(
        gate(&users, &signed_in(Role::User)),
        Access::Redirect(Route::Dashboard(DashboardPage::Overview))
    );
    assert_eq!(gate(&users, &signed_in(Role::Admin)), Access::Allow);
}

#[test]
fn role_metadata_defaults_to_user() {
    assert_eq!(Role::from_metadata(Some("admin")), Role::Admin);
    assert_eq!(Role::from_metadata(Some(" Admin ")), Role::Admin);
    assert_eq!(Role::from_metadata(Some("editor")), Role::User);
    assert_eq!(Role::from_metadata(None), Role::User);
}
