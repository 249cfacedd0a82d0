use crate::config::Config;
use crate::errors::DashboardError;
use crate::models::{HealthSummary, SyncResult};
use crate::request;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;

pub const SUMMARY_PATH: &str = "/api/v1/health-data/summary";
pub const ENTRIES_PATH: &str = "/api/v1/health-data/";
pub const SYNC_PATH: &str = "/api/v1/health-data/sync-zepp";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Outcome of a request that reached the backend.
///
/// A non-2xx status is an ordinary reply, not an error; the raw body is kept for display.
#[derive(Debug)]
pub enum Reply<T> {
    Accepted(T),
    Rejected { status: StatusCode, body: String },
}

#[derive(Clone, Debug)]
pub struct HealthClient {
    http: reqwest::Client,
}

impl HealthClient {
    pub fn new() -> Result<Self, DashboardError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http })
    }

    pub async fn summary(&self, config: &Config) -> Result<Reply<HealthSummary>, DashboardError> {
        let response = self
            .http
            .get(config.endpoint(SUMMARY_PATH))
            .headers(request::headers(config, HeaderMap::new()))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn create_entry(
        &self,
        config: &Config,
        body: &Map<String, Value>,
    ) -> Result<Reply<()>, DashboardError> {
        let response = self
            .http
            .post(config.endpoint(ENTRIES_PATH))
            .headers(request::headers(config, json_content()))
            .body(serde_json::to_vec(body)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Ok(Reply::Rejected { status, body });
        }
        Ok(Reply::Accepted(()))
    }

    pub async fn sync_source(&self, config: &Config) -> Result<Reply<SyncResult>, DashboardError> {
        let response = self
            .http
            .post(config.endpoint(SYNC_PATH))
            .headers(request::headers(config, json_content()))
            .send()
            .await?;
        decode(response).await
    }
}

fn json_content() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<Reply<T>, DashboardError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        return Ok(Reply::Rejected { status, body });
    }
    let bytes = response.bytes().await?;
    Ok(Reply::Accepted(serde_json::from_slice(&bytes)?))
}
