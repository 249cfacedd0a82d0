use crate::errors::DashboardError;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, String>);

impl Settings {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) {
        self.0.remove(key);
    }
}

pub fn resolve_settings_path() -> PathBuf {
    if let Ok(path) = env::var("DASHBOARD_SETTINGS_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/settings.json")
}

pub async fn load_settings(path: &Path) -> Settings {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(settings) => settings,
            Err(err) => {
                error!("failed to parse settings file: {err}");
                Settings::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Settings::default(),
        Err(err) => {
            error!("failed to read settings file: {err}");
            Settings::default()
        }
    }
}

pub async fn persist_settings(path: &Path, settings: &Settings) -> Result<(), DashboardError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    let payload = serde_json::to_vec_pretty(settings)?;
    fs::write(path, payload).await?;
    Ok(())
}
