use crate::session::{gate, Access};
use crate::state::Notice;
use crate::{AppState, Effect, Msg, PublishState, Route, Theme};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Navigate(route) => navigate(&mut state, route),
        Msg::SessionChanged(auth) => {
            state.set_auth(auth);
            // A held navigation resumes first; otherwise re-check where we are.
            let target = state
                .take_pending_route()
                .unwrap_or_else(|| state.route().clone());
            let unchanged = &target == state.route();
            match gate(&target, state.auth()) {
                Access::Allow if unchanged => Vec::new(),
                _ => navigate(&mut state, target),
            }
        }
        Msg::ThemeInitialized {
            persisted,
            system_prefers_dark,
        } => {
            state.set_theme(Theme::resolve(persisted, system_prefers_dark));
            Vec::new()
        }
        Msg::ThemeToggled => {
            let next = state.theme().toggled();
            state.set_theme(next);
            vec![Effect::PersistTheme(next)]
        }
        Msg::MediaQueued { kind, file_name } => {
            state.media_queued();
            state.notify(Notice::success(format!(
                "{} added. Will upload when you publish. ({file_name})",
                kind.label()
            )));
            Vec::new()
        }
        Msg::MediaRejected(err) => {
            state.notify(Notice::error(err.to_string(), None));
            Vec::new()
        }
        Msg::MediaRemoved { kind } => {
            state.media_removed();
            state.notify(Notice::info(format!("{} removed", kind.label())));
            Vec::new()
        }
        Msg::CoverSelected { file_name } => {
            state.set_cover(true);
            state.notify(Notice::success(format!(
                "Cover image added. Will upload when you publish. ({file_name})"
            )));
            Vec::new()
        }
        Msg::CoverRemoved => {
            state.set_cover(false);
            state.set_progress(0);
            Vec::new()
        }
        Msg::PublishClicked => {
            if !state.auth().is_signed_in() {
                state.notify(Notice::error(
                    "You are not logged in to write an article",
                    None,
                ));
                return (state, vec![Effect::Redirect(Route::Login)]);
            }
            if state.publish_state() == &PublishState::InFlight {
                return (state, Vec::new());
            }
            state.start_publish();
            if state.has_cover() {
                state.notify(Notice::info("Uploading cover image..."));
            }
            vec![Effect::StartPublish]
        }
        Msg::PublishProgress(value) => {
            if state.publish_state() == &PublishState::InFlight {
                state.set_progress(value);
            }
            Vec::new()
        }
        Msg::MediaUploadFailed { message } => {
            state.abort_publish();
            state.notify(Notice::error(
                "Failed to upload media. Please try again.",
                Some(message),
            ));
            Vec::new()
        }
        Msg::SubmitFailed { message } => {
            state.abort_publish();
            state.notify(Notice::error(
                "Failed to create blog. Please try again.",
                Some(message),
            ));
            Vec::new()
        }
        Msg::Published { slug } => {
            state.finish_publish(slug.clone());
            state.notify(Notice::success("Blog has been created!"));
            let article = Route::Article { slug };
            state.set_route(article.clone());
            vec![Effect::Redirect(article.clone()), Effect::Load(article)]
        }
        Msg::MutationRequested(mutation) => {
            if !state.auth().is_signed_in() {
                state.notify(Notice::error("Please log in to continue", None));
                return (state, vec![Effect::Redirect(Route::Login)]);
            }
            if mutation.requires_admin() && !state.auth().is_admin() {
                state.notify(Notice::error("Only admins can do that", None));
                return (state, Vec::new());
            }
            vec![Effect::Mutate(mutation)]
        }
        Msg::MutationSucceeded(mutation) => {
            state.notify(Notice::success(mutation.success_text()));
            let deleted_current = matches!(
                (&mutation, state.route()),
                (crate::Mutation::DeleteBlog { .. }, Route::Article { .. })
            );
            if deleted_current {
                state.set_route(Route::Home);
                vec![Effect::Redirect(Route::Home), Effect::Load(Route::Home)]
            } else if state.route().has_remote_data() {
                vec![Effect::Load(state.route().clone())]
            } else {
                Vec::new()
            }
        }
        Msg::MutationFailed { mutation, message } => {
            state.notify(Notice::error(mutation.failure_text(), Some(message)));
            Vec::new()
        }
        Msg::LoadFailed { route, message } => {
            state.notify(Notice::error(format!("Failed to load {route}"), Some(message)));
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn navigate(state: &mut AppState, route: Route) -> Vec<Effect> {
    match gate(&route, state.auth()) {
        Access::Allow => {
            state.set_route(route.clone());
            load_effects(route)
        }
        Access::Wait => {
            state.hold_route(route);
            Vec::new()
        }
        Access::Redirect(target) => {
            state.set_route(target.clone());
            let mut effects = vec![Effect::Redirect(target.clone())];
            effects.extend(load_effects(target));
            effects
        }
    }
}

fn load_effects(route: Route) -> Vec<Effect> {
    if route.has_remote_data() {
        vec![Effect::Load(route)]
    } else {
        Vec::new()
    }
}
