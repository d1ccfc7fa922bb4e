use std::time::{Duration, Instant};

use inkpost_core::{Effect, Msg, Route};
use inkpost_engine::{
    ArticleMeta, EngineEvent, EngineHandle, PublishError, UploadOrchestrator, ViewData, ViewRequest,
};
use inkpost_logging::{ink_info, ink_warn};

use super::persistence::PreferenceStore;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A draft waiting for the publish effect.
pub struct Draft {
    pub article: ArticleMeta,
    pub orchestrator: UploadOrchestrator,
}

/// Runs effects against the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    store: PreferenceStore,
    in_flight: usize,
    draft: Option<Draft>,
    publishing: Option<ArticleMeta>,
    loaded: Option<(Route, ViewData)>,
    redirects: Vec<Route>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, store: PreferenceStore) -> Self {
        Self {
            engine,
            store,
            in_flight: 0,
            draft: None,
            publishing: None,
            loaded: None,
            redirects: Vec::new(),
        }
    }

    pub fn set_draft(&mut self, draft: Draft) {
        self.draft = Some(draft);
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    pub fn take_loaded(&mut self) -> Option<(Route, ViewData)> {
        self.loaded.take()
    }

    pub fn take_redirects(&mut self) -> Vec<Route> {
        std::mem::take(&mut self.redirects)
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Load(route) => {
                    if ViewRequest::for_route(&route).is_some() {
                        ink_info!("Load {}", route);
                        self.in_flight += 1;
                        self.engine.load(route);
                    }
                }
                Effect::Redirect(route) => {
                    ink_info!("Redirect to {}", route);
                    self.redirects.push(route);
                }
                Effect::PersistTheme(theme) => self.store.save_theme(theme),
                Effect::StartPublish => match self.draft.take() {
                    Some(Draft {
                        article,
                        orchestrator,
                    }) => {
                        ink_info!(
                            "Publish \"{}\" with {} pending upload(s)",
                            article.title,
                            orchestrator.pending_uploads()
                        );
                        self.in_flight += 1;
                        self.publishing = Some(article.clone());
                        self.engine.publish(article, orchestrator);
                    }
                    None => ink_warn!("Publish requested without a draft"),
                },
                Effect::Mutate(mutation) => {
                    ink_info!("Mutate {:?}", mutation);
                    self.in_flight += 1;
                    self.engine.mutate(mutation);
                }
            }
        }
    }

    /// Blocks until the engine reports something, or `deadline` passes.
    pub fn next_msg(&mut self, deadline: Instant) -> Option<Msg> {
        while Instant::now() < deadline {
            if let Some(event) = self.engine.recv_timeout(POLL_INTERVAL) {
                return Some(self.handle_event(event));
            }
        }
        None
    }

    fn handle_event(&mut self, event: EngineEvent) -> Msg {
        match event {
            EngineEvent::Loaded { route, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                match result {
                    Ok(data) => {
                        self.loaded = Some((route, data));
                        Msg::Tick
                    }
                    Err(err) => Msg::LoadFailed {
                        route,
                        message: err.to_string(),
                    },
                }
            }
            EngineEvent::Mutated { mutation, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                match result {
                    Ok(()) => Msg::MutationSucceeded(mutation),
                    Err(err) => Msg::MutationFailed {
                        mutation,
                        message: err.to_string(),
                    },
                }
            }
            EngineEvent::PublishProgress(value) => Msg::PublishProgress(value),
            EngineEvent::Published { slug, orchestrator } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.publishing = None;
                ink_info!(
                    "Draft cleared, {} upload(s) left",
                    orchestrator.pending_uploads()
                );
                Msg::Published { slug }
            }
            EngineEvent::PublishFailed {
                error,
                orchestrator,
            } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                let msg = match &error {
                    PublishError::Upload(err) => Msg::MediaUploadFailed {
                        message: err.to_string(),
                    },
                    PublishError::Submit(err) => Msg::SubmitFailed {
                        message: err.to_string(),
                    },
                };
                // The queue stays intact, so a retry starts from the same draft.
                if let Some(article) = self.publishing.take() {
                    self.draft = Some(Draft {
                        article,
                        orchestrator,
                    });
                }
                msg
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use inkpost_core::Theme;
    use inkpost_engine::{ApiClient, ClientSettings, StaticSession};
    use tempfile::TempDir;

    use super::*;

    fn runner(temp: &TempDir) -> EffectRunner {
        let api = ApiClient::new(
            ClientSettings::default(),
            Arc::new(StaticSession::signed_out()),
        )
        .expect("client");
        EffectRunner::new(
            EngineHandle::new(api),
            PreferenceStore::new(temp.path().to_path_buf()),
        )
    }

    #[test]
    fn local_effects_never_reach_the_engine() {
        let temp = TempDir::new().unwrap();
        let mut runner = runner(&temp);

        runner.enqueue(vec![
            Effect::Redirect(Route::Login),
            Effect::PersistTheme(Theme::Dark),
            Effect::Load(Route::Write),
        ]);

        assert!(runner.is_idle());
        assert_eq!(runner.take_redirects(), vec![Route::Login]);
        assert!(runner.take_redirects().is_empty());
        let store = PreferenceStore::new(temp.path().to_path_buf());
        assert_eq!(store.load_theme(), Some(Theme::Dark));
    }

    #[test]
    fn publish_without_draft_is_ignored() {
        let temp = TempDir::new().unwrap();
        let mut runner = runner(&temp);
        runner.enqueue(vec![Effect::StartPublish]);
        assert!(runner.is_idle());
        assert!(runner.draft().is_none());
    }
}
