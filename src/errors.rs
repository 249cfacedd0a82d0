use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid sleep stages: {0}")]
    SleepStages(String),

    #[error("settings storage failed: {0}")]
    Persist(#[from] std::io::Error),
}
