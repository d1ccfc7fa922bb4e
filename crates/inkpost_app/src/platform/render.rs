use std::fmt::Write as _;

use inkpost_core::{AppViewModel, Notice, NoticeLevel, PublishState};
use inkpost_engine::{Blog, Comment, CommentBlogRef, ViewData};

const BAR_WIDTH: usize = 20;

pub fn render_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "error",
    };
    match &notice.detail {
        Some(detail) => format!("[{tag}] {} ({detail})", notice.text),
        None => format!("[{tag}] {}", notice.text),
    }
}

pub fn render_progress(progress: u8) -> String {
    let progress = progress.min(100);
    let filled = usize::from(progress) * BAR_WIDTH / 100;
    format!(
        "Publishing [{}{}] {progress}%",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled)
    )
}

pub fn render_status(view: &AppViewModel) -> String {
    let session = match (view.signed_in, view.is_admin) {
        (true, true) => "signed in (admin)",
        (true, false) => "signed in",
        (false, _) if view.waiting_for_session => "waiting for session",
        (false, _) => "signed out",
    };
    let mut line = format!(
        "{} | {session} | theme: {}",
        view.route.path(),
        view.theme.as_str()
    );
    if view.pending_media > 0 || view.has_cover {
        let _ = write!(
            line,
            " | queued media: {}{}",
            view.pending_media,
            if view.has_cover { " + cover" } else { "" }
        );
    }
    if let PublishState::Published { slug } = &view.publish {
        let _ = write!(line, " | published /{slug}");
    }
    line
}

pub fn render_view(data: &ViewData) -> String {
    let mut out = String::new();
    match data {
        ViewData::Home { featured, latest } => {
            section(&mut out, "Featured");
            blog_lines(&mut out, &featured.blogs);
            section(&mut out, "Recent posts");
            blog_lines(&mut out, &latest.blogs);
            more_hint(&mut out, latest.has_more);
        }
        ViewData::Blogs(page) => {
            section(&mut out, "Posts");
            blog_lines(&mut out, &page.blogs);
            more_hint(&mut out, page.has_more);
        }
        ViewData::Saved(blogs) => {
            let plural = if blogs.len() == 1 { "" } else { "s" };
            section(&mut out, &format!("Saved Blogs ({} saved article{plural})", blogs.len()));
            blog_lines(&mut out, blogs);
        }
        ViewData::Article { blog, comments } => {
            let _ = writeln!(out, "{}", blog.title);
            let _ = writeln!(
                out,
                "by {} in {}{}",
                blog.author_name(),
                blog.category.as_deref().unwrap_or("general"),
                blog.created_at
                    .as_deref()
                    .map(|at| format!(" on {at}"))
                    .unwrap_or_default()
            );
            if let Some(desc) = blog.desc.as_deref().filter(|d| !d.is_empty()) {
                let _ = writeln!(out, "\n{desc}");
            }
            if let Some(content) = &blog.content {
                let _ = writeln!(out, "\n{content}");
            }
            section(&mut out, &format!("Comments ({})", comments.len()));
            comment_lines(&mut out, comments);
        }
        ViewData::Overview(stats) => {
            section(&mut out, "Dashboard");
            let _ = writeln!(out, "Blogs:     {}", stats.total_blogs);
            let _ = writeln!(out, "Views:     {}", stats.total_views);
            let _ = writeln!(out, "Comments:  {}", stats.total_comments);
            let _ = writeln!(out, "Featured:  {}", stats.featured_blogs);
            if let Some(users) = stats.total_users {
                let _ = writeln!(out, "Users:     {users}");
            }
            for entry in &stats.blogs_by_category {
                let _ = writeln!(out, "  {:<12} {}", entry.category, entry.count);
            }
        }
        ViewData::MyBlogs(page) | ViewData::AllBlogs(page) => {
            section(&mut out, &format!("Blogs ({} total)", page.total));
            blog_lines(&mut out, &page.blogs);
            more_hint(&mut out, page.has_more);
        }
        ViewData::Analytics(snapshot) => {
            section(&mut out, "Views over time");
            for day in &snapshot.views_over_time {
                let _ = writeln!(out, "  {}  {}", day.date, day.views);
            }
            section(&mut out, "New blogs over time");
            for day in &snapshot.blogs_over_time {
                let _ = writeln!(out, "  {}  {}", day.date, day.count);
            }
            section(&mut out, "Top blogs");
            blog_lines(&mut out, &snapshot.top_blogs);
        }
        ViewData::Activity(feed) => {
            section(&mut out, "Recent blogs");
            blog_lines(&mut out, &feed.recent_blogs);
            section(&mut out, "Recent comments");
            comment_lines(&mut out, &feed.recent_comments);
        }
        ViewData::Users(page) => {
            section(&mut out, &format!("Users ({} total)", page.total));
            for user in &page.users {
                let _ = writeln!(
                    out,
                    "  {} {}",
                    user.username,
                    user.email.as_deref().unwrap_or("")
                );
            }
            more_hint(&mut out, page.has_more);
        }
    }
    out
}

fn section(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "== {title} ==");
}

fn blog_lines(out: &mut String, blogs: &[Blog]) {
    if blogs.is_empty() {
        out.push_str("  (none)\n");
        return;
    }
    for blog in blogs {
        let _ = writeln!(
            out,
            "{} {} | {} | {} views | /{}",
            if blog.is_featured { "*" } else { "-" },
            blog.title,
            blog.author_name(),
            blog.views,
            blog.slug
        );
    }
}

fn comment_lines(out: &mut String, comments: &[Comment]) {
    if comments.is_empty() {
        out.push_str("  (none)\n");
        return;
    }
    for comment in comments {
        let author = comment
            .user
            .as_ref()
            .and_then(|user| user.username())
            .unwrap_or("Unknown");
        let on = match &comment.blog {
            Some(CommentBlogRef::Populated(blog)) if !blog.title.is_empty() => {
                format!(" on \"{}\"", blog.title)
            }
            _ => String::new(),
        };
        let _ = writeln!(out, "  {author}{on}: {} [{}]", comment.desc, comment.id);
    }
}

fn more_hint(out: &mut String, has_more: bool) {
    if has_more {
        out.push_str("  ... more on the next page\n");
    }
}
