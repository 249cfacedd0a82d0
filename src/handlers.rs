use crate::models::ConfigForm;
use crate::state::AppState;
use crate::ui::render_page;
use crate::view::ViewSnapshot;
use crate::workflows::{self, WorkflowOutcome};
use axum::{
    extract::{Form, State},
    response::{Html, Redirect},
    Json,
};
use std::collections::BTreeMap;
use tracing::debug;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let refreshed = std::mem::take(&mut state.view.lock().await.refreshed_by_action);
    if !refreshed {
        state.summary.refresh().await;
    }

    let config = state.config.current().await;
    let mut view = state.view.lock().await;
    let notice = view.notice.take();
    Html(render_page(&view, notice.as_ref(), &config))
}

pub async fn view_snapshot(State(state): State<AppState>) -> Json<ViewSnapshot> {
    Json(state.view.lock().await.snapshot())
}

pub async fn submit_entry(
    State(state): State<AppState>,
    Form(form): Form<BTreeMap<String, String>>,
) -> Redirect {
    let outcome = workflows::submit_entry(
        &state.client,
        &state.config,
        &state.view,
        &state.summary,
        &form,
    )
    .await;
    log_ignored("submit", &outcome);
    Redirect::to("/")
}

pub async fn sync(State(state): State<AppState>) -> Redirect {
    let outcome =
        workflows::sync_source(&state.client, &state.config, &state.view, &state.summary).await;
    log_ignored("sync", &outcome);
    Redirect::to("/")
}

pub async fn save_config(
    State(state): State<AppState>,
    Form(form): Form<ConfigForm>,
) -> Redirect {
    let outcome = workflows::save_config(&state.config, &state.view, &state.summary, &form).await;
    log_ignored("save configuration", &outcome);
    Redirect::to("/")
}

fn log_ignored(action: &str, outcome: &WorkflowOutcome) {
    if *outcome == WorkflowOutcome::Ignored {
        debug!("{action} ignored while a previous request is in flight");
    }
}
