use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use clap::Parser;
use inkpost_core::{update, AppState, MediaKind, Msg, Mutation, Route};
use inkpost_engine::{
    ApiClient, ArticleMeta, Category, EngineHandle, ImageKitUploader, MediaFile, MediaUploader,
    UploadOrchestrator,
};
use inkpost_logging::{ink_info, LogDestination, DEFAULT_LOG_FILE};

use super::cli::{Cli, Command, LogTarget, PublishArgs};
use super::config::AppConfig;
use super::effects::{Draft, EffectRunner};
use super::persistence::PreferenceStore;
use super::render::{render_notice, render_progress, render_status, render_view};

/// Upper bound on how long one command waits for the engine.
const WAIT_LIMIT: Duration = Duration::from_secs(15 * 60);

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    inkpost_logging::initialize(log_destination(cli.log_to), cli.log_level);

    let config = AppConfig::from_env();
    ink_info!("Using API at {}", config.settings.api_url);
    let mut app = App::new(config)?;
    app.execute(cli.command)
}

fn log_destination(target: LogTarget) -> LogDestination {
    match target {
        LogTarget::File => LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE)),
        LogTarget::Terminal => LogDestination::Terminal,
        LogTarget::Both => LogDestination::Both(PathBuf::from(DEFAULT_LOG_FILE)),
    }
}

struct App {
    state: AppState,
    runner: EffectRunner,
    uploader: Arc<dyn MediaUploader>,
    last_progress: u8,
}

impl App {
    fn new(config: AppConfig) -> anyhow::Result<Self> {
        let api = ApiClient::new(config.settings.clone(), Arc::new(config.session.clone()))
            .context("building the API client")?;
        let uploader = ImageKitUploader::new(&config.settings, Arc::new(api.clone()))
            .context("building the media uploader")?;
        let store = PreferenceStore::new(config.state_dir.clone());
        let persisted = store.load_theme();

        let mut app = Self {
            state: AppState::new(),
            runner: EffectRunner::new(EngineHandle::new(api), store),
            uploader: Arc::new(uploader),
            last_progress: 0,
        };
        app.dispatch(Msg::ThemeInitialized {
            persisted,
            system_prefers_dark: config.system_prefers_dark,
        });
        app.dispatch(Msg::SessionChanged(config.session.auth_state()));
        Ok(app)
    }

    fn execute(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Open { path } => {
                self.dispatch(Msg::Navigate(Route::parse(&path)));
                println!("{}", render_status(&self.state.view()));
                self.settle()?;
            }
            Command::Publish(args) => self.publish(args)?,
            Command::DeleteBlog { blog_id } => self.mutate(Mutation::DeleteBlog { blog_id })?,
            Command::Feature { blog_id } => self.mutate(Mutation::ToggleFeatured { blog_id })?,
            Command::Save { blog_id } => self.mutate(Mutation::ToggleSaved { blog_id })?,
            Command::Comment { blog_id, text } => self.mutate(Mutation::PostComment {
                blog_id,
                desc: text,
            })?,
            Command::DeleteComment { comment_id } => {
                self.mutate(Mutation::DeleteComment { comment_id })?
            }
            Command::Theme { toggle } => {
                if toggle {
                    self.dispatch(Msg::ThemeToggled);
                }
                println!("theme: {}", self.state.theme().as_str());
            }
        }
        Ok(())
    }

    fn mutate(&mut self, mutation: Mutation) -> anyhow::Result<()> {
        self.dispatch(Msg::MutationRequested(mutation));
        self.settle()
    }

    fn publish(&mut self, args: PublishArgs) -> anyhow::Result<()> {
        self.dispatch(Msg::Navigate(Route::Write));
        if self.state.route() != &Route::Write {
            println!("{}", render_status(&self.state.view()));
            return self.settle();
        }

        let category = Category::parse(&args.category)
            .ok_or_else(|| anyhow!("unknown category {:?}", args.category))?;
        let content = match (&args.content, &args.content_file) {
            (Some(content), _) => content.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("reading draft from {}", path.display()))?,
            (None, None) => String::new(),
        };

        let mut orchestrator = UploadOrchestrator::new(self.uploader.clone());
        orchestrator.set_content(content);
        for msg in queue_media(&mut orchestrator, &args)? {
            self.dispatch(msg);
        }

        self.runner.set_draft(Draft {
            article: ArticleMeta {
                title: args.title,
                desc: args.desc,
                category,
            },
            orchestrator,
        });
        self.dispatch(Msg::PublishClicked);
        self.settle()?;

        if let Some(draft) = self.runner.draft() {
            println!(
                "Draft kept with {} pending upload(s); nothing was published.",
                draft.orchestrator.pending_uploads()
            );
        }
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);

        for route in self.runner.take_redirects() {
            println!("-> {}", route.path());
        }
        if was_dirty {
            self.render_changes();
        }
    }

    fn render_changes(&mut self) {
        let view = self.state.view();
        if view.progress != self.last_progress && view.progress > 0 {
            println!("{}", render_progress(view.progress));
        }
        self.last_progress = view.progress;
        for notice in self.state.take_notices() {
            println!("{}", render_notice(&notice));
        }
    }

    /// Feeds engine events back through `update` until nothing is in flight.
    fn settle(&mut self) -> anyhow::Result<()> {
        let deadline = Instant::now() + WAIT_LIMIT;
        while !self.runner.is_idle() {
            let msg = self
                .runner
                .next_msg(deadline)
                .ok_or_else(|| anyhow!("timed out waiting for the server"))?;
            self.dispatch(msg);
            if let Some((route, data)) = self.runner.take_loaded() {
                if &route == self.state.route() {
                    println!("{}", render_view(&data));
                }
            }
        }
        Ok(())
    }
}

/// Applies the media options of `publish` to a fresh draft. Returns the
/// messages describing each step, in order.
fn queue_media(
    orchestrator: &mut UploadOrchestrator,
    args: &PublishArgs,
) -> anyhow::Result<Vec<Msg>> {
    let mut msgs = Vec::new();
    if let Some(path) = &args.cover {
        let file = read_media(path)?;
        msgs.push(match orchestrator.set_cover(file) {
            Ok(cover) => Msg::CoverSelected {
                file_name: cover.file.name.clone(),
            },
            Err(err) => Msg::MediaRejected(err),
        });
    }
    let selections = args
        .images
        .iter()
        .map(|path| (MediaKind::Image, path))
        .chain(args.videos.iter().map(|path| (MediaKind::Video, path)));
    for (kind, path) in selections {
        let file = read_media(path)?;
        msgs.push(match orchestrator.select_file(kind, file) {
            Ok(entry) => Msg::MediaQueued {
                kind,
                file_name: entry.file_name.clone(),
            },
            Err(err) => Msg::MediaRejected(err),
        });
    }

    for name in &args.drops {
        let removed = orchestrator
            .queued_id(name)
            .and_then(|id| orchestrator.remove(id))
            .ok_or_else(|| anyhow!("nothing is queued as {name:?}"))?;
        msgs.push(Msg::MediaRemoved { kind: removed.kind });
    }
    if args.drop_cover && orchestrator.clear_cover().is_some() {
        msgs.push(Msg::CoverRemoved);
    }
    Ok(msgs)
}

fn read_media(path: &std::path::Path) -> anyhow::Result<MediaFile> {
    MediaFile::from_path(path).with_context(|| format!("reading {}", path.display()))
}
