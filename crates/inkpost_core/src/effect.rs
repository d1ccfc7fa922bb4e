use crate::route::Route;
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the data backing a route from the remote API.
    Load(Route),
    /// The shell should show `Route` instead of what the user asked for.
    Redirect(Route),
    PersistTheme(Theme),
    /// Upload queued media, then submit the article.
    StartPublish,
    Mutate(Mutation),
}

/// Writes against the remote API that are triggered from list and detail views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    DeleteBlog { blog_id: String },
    ToggleFeatured { blog_id: String },
    ToggleSaved { blog_id: String },
    PostComment { blog_id: String, desc: String },
    DeleteComment { comment_id: String },
}

impl Mutation {
    pub fn requires_admin(&self) -> bool {
        matches!(self, Mutation::ToggleFeatured { .. })
    }

    pub(crate) fn success_text(&self) -> &'static str {
        match self {
            Mutation::DeleteBlog { .. } => "Blog deleted successfully!",
            Mutation::ToggleFeatured { .. } => "Feature status updated.",
            Mutation::ToggleSaved { .. } => "Saved articles updated.",
            Mutation::PostComment { .. } => "Comment posted successfully!",
            Mutation::DeleteComment { .. } => "Comment deleted.",
        }
    }

    pub(crate) fn failure_text(&self) -> &'static str {
        match self {
            Mutation::DeleteBlog { .. } => "Failed to delete blog.",
            Mutation::ToggleFeatured { .. } => "Failed to update feature status.",
            Mutation::ToggleSaved { .. } => "Failed to update saved articles.",
            Mutation::PostComment { .. } => "Failed to post comment.",
            Mutation::DeleteComment { .. } => "Failed to delete comment.",
        }
    }
}
