use crate::client::{HealthClient, Reply};
use crate::config::ConfigStore;
use crate::models::{ConfigForm, SyncFailure, SyncResult};
use crate::summary::SummaryOrchestrator;
use crate::view::{ControlLease, ControlSlot, Notice, SharedView};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use tracing::{error, info, warn};

pub const NUMERIC_FIELDS: [&str; 7] = [
    "calories_burned",
    "exercise_minutes",
    "stand_hours",
    "resting_heart_rate",
    "respiratory_rate",
    "sleep_duration",
    "sleep_quality",
];

pub const SYNCING_LABEL: &str = "Syncing...";

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    Ignored,
    Completed,
    Rejected(String),
    Failed(String),
}

pub fn build_entry_body(form: &BTreeMap<String, String>) -> Map<String, Value> {
    form.iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| {
            let value = if NUMERIC_FIELDS.contains(&key.as_str()) {
                coerce_number(value)
            } else {
                Value::String(value.clone())
            };
            (key.clone(), value)
        })
        .collect()
}

/// Integral values become JSON integers; anything unparseable becomes `null`.
pub fn coerce_number(raw: &str) -> Value {
    let trimmed = raw.trim();
    let parsed = if trimmed.is_empty() {
        Some(0.0)
    } else {
        trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
    };

    match parsed {
        Some(value) if value.fract() == 0.0 && value.abs() < 9.0e15 => Value::from(value as i64),
        Some(value) => Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null),
        None => Value::Null,
    }
}

pub fn sync_failure_message(body: &str) -> String {
    let detail = serde_json::from_str::<SyncFailure>(body)
        .ok()
        .and_then(|failure| failure.detail);
    format!("Sync failed: {}", detail.as_deref().unwrap_or("Unknown error"))
}

pub fn sync_success_message(result: &SyncResult) -> String {
    let calories = result.data.calories_burned.unwrap_or(0.0);
    format!(
        "Successfully synced from Zepp! Calories: {}",
        crate::view::format_decimal(calories)
    )
}

pub async fn submit_entry(
    client: &HealthClient,
    config: &ConfigStore,
    view: &SharedView,
    summary: &SummaryOrchestrator,
    form: &BTreeMap<String, String>,
) -> WorkflowOutcome {
    let body = build_entry_body(form);
    let Some(lease) = ControlLease::acquire(view, ControlSlot::Submit, None).await else {
        return WorkflowOutcome::Ignored;
    };

    let config = config.current().await;
    let reply = client.create_entry(&config, &body).await;

    let (notice, outcome) = match reply {
        Ok(Reply::Accepted(())) => {
            info!(fields = body.len(), "health entry created");
            (Notice::success("Entry created"), WorkflowOutcome::Completed)
        }
        Ok(Reply::Rejected { status, body }) => {
            warn!(%status, "health entry rejected");
            let message = format!("Failed: {body}");
            (Notice::error(message.clone()), WorkflowOutcome::Rejected(message))
        }
        Err(err) => {
            error!("failed to submit health entry: {err}");
            let message = format!("Error: {err}");
            (Notice::error(message.clone()), WorkflowOutcome::Failed(message))
        }
    };

    {
        let mut dashboard = view.lock().await;
        lease.release(&mut dashboard);
        dashboard.notice = Some(notice);
    }

    if outcome == WorkflowOutcome::Completed {
        refresh_after_action(view, summary).await;
    }
    outcome
}

pub async fn sync_source(
    client: &HealthClient,
    config: &ConfigStore,
    view: &SharedView,
    summary: &SummaryOrchestrator,
) -> WorkflowOutcome {
    let Some(lease) = ControlLease::acquire(view, ControlSlot::Sync, Some(SYNCING_LABEL)).await else {
        return WorkflowOutcome::Ignored;
    };

    let config = config.current().await;
    let reply = client.sync_source(&config).await;

    let (notice, outcome) = match reply {
        Ok(Reply::Accepted(result)) => {
            info!(source = ?result.source, "synced from external source");
            (
                Notice::success(sync_success_message(&result)),
                WorkflowOutcome::Completed,
            )
        }
        Ok(Reply::Rejected { status, body }) => {
            warn!(%status, "sync rejected");
            let message = sync_failure_message(&body);
            (Notice::error(message.clone()), WorkflowOutcome::Rejected(message))
        }
        Err(err) => {
            error!("failed to sync: {err}");
            let message = format!("Error syncing: {err}");
            (Notice::error(message.clone()), WorkflowOutcome::Failed(message))
        }
    };

    {
        let mut dashboard = view.lock().await;
        lease.release(&mut dashboard);
        dashboard.notice = Some(notice);
    }

    if outcome == WorkflowOutcome::Completed {
        refresh_after_action(view, summary).await;
    }
    outcome
}

pub async fn save_config(
    config: &ConfigStore,
    view: &SharedView,
    summary: &SummaryOrchestrator,
    form: &ConfigForm,
) -> WorkflowOutcome {
    let Some(lease) = ControlLease::acquire(view, ControlSlot::SaveConfig, None).await else {
        return WorkflowOutcome::Ignored;
    };

    let saved = config.save(&form.api_base, &form.token).await;

    let outcome = match saved {
        Ok(_) => WorkflowOutcome::Completed,
        Err(err) => {
            error!("failed to save configuration: {err}");
            WorkflowOutcome::Failed(format!("Error: {err}"))
        }
    };

    {
        let mut dashboard = view.lock().await;
        lease.release(&mut dashboard);
        if let WorkflowOutcome::Failed(message) = &outcome {
            dashboard.notice = Some(Notice::error(message.clone()));
        }
    }

    refresh_after_action(view, summary).await;
    outcome
}

async fn refresh_after_action(view: &SharedView, summary: &SummaryOrchestrator) {
    summary.refresh().await;
    view.lock().await.refreshed_by_action = true;
}
