use crate::errors::DashboardError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HealthEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_burned: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stand_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resting_heart_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respiratory_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_stages: Option<RawSleepStages>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HealthSummary {
    #[serde(default)]
    pub latest: Option<HealthEntry>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct SleepStages {
    #[serde(default)]
    pub rem: Option<f64>,
    #[serde(default)]
    pub core: Option<f64>,
    #[serde(default)]
    pub deep: Option<f64>,
}

impl SleepStages {
    pub fn new(rem: f64, core: f64, deep: f64) -> Self {
        Self {
            rem: Some(rem),
            core: Some(core),
            deep: Some(deep),
        }
    }

    /// Durations in rem/core/deep order; missing or negative stages count as zero.
    pub fn durations(&self) -> [f64; 3] {
        [self.rem, self.core, self.deep].map(|stage| match stage {
            Some(value) if value.is_finite() && value > 0.0 => value,
            _ => 0.0,
        })
    }

    pub fn total(&self) -> f64 {
        self.durations().iter().sum()
    }
}

/// Sleep stages as the backend sends them: either an object or a JSON-encoded string.
///
/// Narrowing is deferred to the sleep chart so a malformed value only affects that widget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RawSleepStages(pub Value);

impl RawSleepStages {
    pub fn parse(&self) -> Result<SleepStages, DashboardError> {
        match &self.0 {
            Value::String(text) => {
                let value: Value = serde_json::from_str(text)
                    .map_err(|err| DashboardError::SleepStages(err.to_string()))?;
                narrow_stages(value)
            }
            other => narrow_stages(other.clone()),
        }
    }
}

fn narrow_stages(value: Value) -> Result<SleepStages, DashboardError> {
    if !value.is_object() {
        return Err(DashboardError::SleepStages(format!(
            "expected an object, found {value}"
        )));
    }
    serde_json::from_value(value).map_err(|err| DashboardError::SleepStages(err.to_string()))
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SyncResult {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: HealthEntry,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SyncFailure {
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigForm {
    #[serde(default)]
    pub api_base: String,
    #[serde(default)]
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_without_latest_is_empty_state() {
        let summary: HealthSummary = serde_json::from_value(json!({ "latest": null })).unwrap();
        assert!(summary.latest.is_none());

        let summary: HealthSummary = serde_json::from_value(json!({})).unwrap();
        assert!(summary.latest.is_none());
    }

    #[test]
    fn entry_keeps_absent_fields_distinct_from_zero() {
        let entry: HealthEntry = serde_json::from_value(json!({
            "id": 7,
            "user_id": 1,
            "calories_burned": 0,
            "recorded_date": "2026-01-05T08:30:00"
        }))
        .unwrap();

        assert_eq!(entry.calories_burned, Some(0.0));
        assert_eq!(entry.exercise_minutes, None);
        assert_eq!(entry.recorded_date.as_deref(), Some("2026-01-05T08:30:00"));
    }

    #[test]
    fn sleep_stages_parse_from_object_and_string() {
        let structured = RawSleepStages(json!({ "rem": 90, "core": 200, "deep": 70 }));
        assert_eq!(structured.parse().unwrap(), SleepStages::new(90.0, 200.0, 70.0));

        let serialized = RawSleepStages(json!("{\"rem\": 30, \"deep\": 10}"));
        let stages = serialized.parse().unwrap();
        assert_eq!(stages.durations(), [30.0, 0.0, 10.0]);
    }

    #[test]
    fn sleep_stages_reject_non_objects() {
        assert!(RawSleepStages(json!("not json")).parse().is_err());
        assert!(RawSleepStages(json!("null")).parse().is_err());
        assert!(RawSleepStages(json!(42)).parse().is_err());
        assert!(RawSleepStages(json!({ "rem": "long" })).parse().is_err());
    }

    #[test]
    fn negative_stages_count_as_zero() {
        let stages = SleepStages::new(-20.0, 60.0, 20.0);
        assert_eq!(stages.durations(), [0.0, 60.0, 20.0]);
        assert_eq!(stages.total(), 80.0);
    }
}
