use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "inkpost", about = "Command-line client for an Inkpost blog")]
pub struct Cli {
    /// Where log output goes
    #[arg(long, value_enum, default_value = "file")]
    pub log_to: LogTarget,
    /// Log level: error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    pub log_level: log::LevelFilter,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open an application path, e.g. `/`, `/blogs?cat=health` or `/dashboard/analytics?days=7`
    Open {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Upload queued media and publish a new article
    Publish(PublishArgs),
    /// Delete an article
    DeleteBlog { blog_id: String },
    /// Toggle the featured flag of an article (admins only)
    Feature { blog_id: String },
    /// Add or remove an article from your saved list
    Save { blog_id: String },
    /// Comment on an article
    Comment { blog_id: String, text: String },
    /// Delete a comment
    DeleteComment { comment_id: String },
    /// Show or switch the colour theme
    Theme {
        #[arg(long)]
        toggle: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub desc: String,
    /// general, lifestyle, technology, startup, health or gaming
    #[arg(long, default_value = "general")]
    pub category: String,
    /// Draft markup given inline
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,
    /// Draft markup read from a file
    #[arg(long)]
    pub content_file: Option<PathBuf>,
    /// Cover image
    #[arg(long)]
    pub cover: Option<PathBuf>,
    /// Image to embed; may be repeated
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,
    /// Video to embed; may be repeated
    #[arg(long = "video")]
    pub videos: Vec<PathBuf>,
    /// Placeholder to take back out of the draft after queuing, e.g. `cat_2.png`; may be repeated
    #[arg(long = "drop")]
    pub drops: Vec<String>,
    /// Publish without the queued cover
    #[arg(long, requires = "cover")]
    pub drop_cover: bool,
}
