#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use health_dashboard::SharedView;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned reply for one endpoint.
#[derive(Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub body: String,
}

impl Canned {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn text(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    fn respond(&self) -> Response {
        (
            self.status,
            [("content-type", "application/json")],
            self.body.clone(),
        )
            .into_response()
    }
}

pub struct MockState {
    pub summary: Canned,
    pub create: Canned,
    pub sync: Canned,
    /// Per-request summary replies, consumed in arrival order before `summary` is used.
    pub summary_script: VecDeque<(Duration, Canned)>,
    pub reply_delay: Duration,
    pub summary_hits: usize,
    pub created: Vec<Value>,
    pub authorization: Vec<Option<String>>,
    /// Dashboard to inspect while a request is in flight.
    pub probe: Option<SharedView>,
    pub submit_enabled_in_flight: Vec<bool>,
    pub sync_control_in_flight: Vec<(bool, String)>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            summary: Canned::json(StatusCode::OK, json!({ "latest": null })),
            create: Canned::json(StatusCode::OK, json!({ "id": 1 })),
            sync: Canned::json(StatusCode::OK, json!({ "data": { "calories_burned": 0 } })),
            summary_script: VecDeque::new(),
            reply_delay: Duration::ZERO,
            summary_hits: 0,
            created: Vec::new(),
            authorization: Vec::new(),
            probe: None,
            submit_enabled_in_flight: Vec::new(),
            sync_control_in_flight: Vec::new(),
        }
    }
}

#[derive(Clone, Default)]
pub struct MockBackend {
    pub state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/v1/health-data/summary", get(summary))
            .route("/api/v1/health-data/", post(create))
            .route("/api/v1/health-data/sync-zepp", post(sync))
            .with_state(self.clone())
    }

    /// Serves the mock on an ephemeral port of the current runtime.
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = self.router();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn record_auth(&self, headers: &HeaderMap) {
        let auth = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.with(|state| state.authorization.push(auth));
    }
}

async fn summary(State(mock): State<MockBackend>, headers: HeaderMap) -> Response {
    mock.record_auth(&headers);
    let (delay, reply) = mock.with(|state| {
        state.summary_hits += 1;
        state
            .summary_script
            .pop_front()
            .unwrap_or((Duration::ZERO, state.summary.clone()))
    });
    tokio::time::sleep(delay).await;
    reply.respond()
}

async fn create(
    State(mock): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.record_auth(&headers);
    let probe = mock.with(|state| state.probe.clone());
    if let Some(view) = probe {
        let enabled = view.lock().await.submit.enabled;
        mock.with(|state| state.submit_enabled_in_flight.push(enabled));
    }
    let delay = mock.with(|state| {
        state.created.push(body);
        state.reply_delay
    });
    tokio::time::sleep(delay).await;
    mock.with(|state| state.create.respond())
}

async fn sync(State(mock): State<MockBackend>, headers: HeaderMap) -> Response {
    mock.record_auth(&headers);
    let probe = mock.with(|state| state.probe.clone());
    if let Some(view) = probe {
        let control = {
            let view = view.lock().await;
            (view.sync.enabled, view.sync.label.clone())
        };
        mock.with(|state| state.sync_control_in_flight.push(control));
    }
    tokio::time::sleep(mock.with(|state| state.reply_delay)).await;
    mock.with(|state| state.sync.respond())
}

/// A port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

pub fn unique_settings_path(tag: &str) -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "health_dashboard_{tag}_{}_{}.json",
        std::process::id(),
        nanos
    ));
    path
}
