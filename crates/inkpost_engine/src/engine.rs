use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use inkpost_core::{Mutation, Route, PUBLISHED};
use inkpost_logging::{ink_info, ink_warn};

use crate::orchestrator::{ChannelProgressSink, ProgressSink};
use crate::view::{load_view, ViewRequest};
use crate::{ApiClient, ApiError, ArticleMeta, Blog, EngineEvent, NewBlog, PublishError, UploadOrchestrator};

enum EngineCommand {
    Load(Route),
    Mutate(Mutation),
    Publish {
        article: ArticleMeta,
        orchestrator: UploadOrchestrator,
    },
}

/// Background IO thread. Commands go in over a channel, [`EngineEvent`]s
/// come back over another.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(api: ApiClient) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(&api, command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn load(&self, route: Route) {
        let _ = self.cmd_tx.send(EngineCommand::Load(route));
    }

    pub fn mutate(&self, mutation: Mutation) {
        let _ = self.cmd_tx.send(EngineCommand::Mutate(mutation));
    }

    /// Hands the orchestrator to the engine; it comes back in the final event.
    pub fn publish(&self, article: ArticleMeta, orchestrator: UploadOrchestrator) {
        let _ = self.cmd_tx.send(EngineCommand::Publish {
            article,
            orchestrator,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(api: &ApiClient, command: EngineCommand, event_tx: mpsc::Sender<EngineEvent>) {
    match command {
        EngineCommand::Load(route) => {
            let Some(request) = ViewRequest::for_route(&route) else {
                return;
            };
            let result = load_view(api, &request).await;
            if let Err(err) = &result {
                ink_warn!("Loading {} failed: {}", route, err);
            }
            let _ = event_tx.send(EngineEvent::Loaded { route, result });
        }
        EngineCommand::Mutate(mutation) => {
            let result = run_mutation(api, &mutation).await;
            let _ = event_tx.send(EngineEvent::Mutated { mutation, result });
        }
        EngineCommand::Publish {
            article,
            mut orchestrator,
        } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let event = match submit(api, &article, &orchestrator, &sink).await {
                Ok(blog) => {
                    ink_info!("Published \"{}\" as {}", blog.title, blog.slug);
                    orchestrator.clear();
                    sink.emit(EngineEvent::PublishProgress(PUBLISHED));
                    EngineEvent::Published {
                        slug: blog.slug,
                        orchestrator,
                    }
                }
                Err(error) => {
                    ink_warn!("Publishing \"{}\" failed: {}", article.title, error);
                    EngineEvent::PublishFailed {
                        error,
                        orchestrator,
                    }
                }
            };
            let _ = event_tx.send(event);
        }
    }
}

/// Finalizes the draft and submits it. Nothing is sent to the blog API unless
/// every upload succeeded.
pub async fn submit(
    api: &ApiClient,
    article: &ArticleMeta,
    orchestrator: &UploadOrchestrator,
    sink: &dyn ProgressSink,
) -> Result<Blog, PublishError> {
    let finalized = orchestrator.finalize(api.settings(), sink).await?;
    let blog = NewBlog {
        img: finalized.cover_url,
        title: article.title.clone(),
        desc: article.desc.clone(),
        category: article.category,
        content: finalized.content,
    };
    api.create_blog(&blog).await.map_err(PublishError::Submit)
}

async fn run_mutation(api: &ApiClient, mutation: &Mutation) -> Result<(), ApiError> {
    match mutation {
        Mutation::DeleteBlog { blog_id } => api.delete_blog(blog_id).await.map(|_| ()),
        Mutation::ToggleFeatured { blog_id } => api.toggle_featured(blog_id).await.map(|_| ()),
        Mutation::ToggleSaved { blog_id } => api.toggle_saved(blog_id).await.map(|_| ()),
        Mutation::PostComment { blog_id, desc } => api.add_comment(blog_id, desc).await.map(|_| ()),
        Mutation::DeleteComment { comment_id } => api.delete_comment(comment_id).await.map(|_| ()),
    }
}
