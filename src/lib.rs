pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod heart;
pub mod models;
pub mod request;
pub mod ring;
pub mod sleep;
pub mod state;
pub mod storage;
pub mod summary;
pub mod ui;
pub mod view;
pub mod workflows;

pub use app::router;
pub use client::HealthClient;
pub use config::{Config, ConfigStore};
pub use errors::DashboardError;
pub use state::AppState;
pub use storage::resolve_settings_path;
pub use summary::SummaryOrchestrator;
pub use view::{Dashboard, SharedView};
