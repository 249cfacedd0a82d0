use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/entries", post(handlers::submit_entry))
        .route("/sync", post(handlers::sync))
        .route("/config", post(handlers::save_config))
        .route("/api/view", get(handlers::view_snapshot))
        .with_state(state)
}
