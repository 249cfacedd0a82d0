use crate::errors::DashboardError;
use crate::storage::{Settings, load_settings, persist_settings};
use std::{env, path::PathBuf, sync::Arc};
use tokio::sync::Mutex;
use tracing::info;

pub const API_BASE_KEY: &str = "apiBase";
pub const TOKEN_KEY: &str = "accessToken";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base: String,
    pub token: String,
}

impl Config {
    /// Persisted values win over the computed default; an absent token means no auth.
    pub fn from_settings(settings: &Settings, default_api_base: &str) -> Self {
        let api_base = settings.get(API_BASE_KEY).unwrap_or(default_api_base);
        Self {
            api_base: strip_trailing_slash(api_base).to_string(),
            token: settings.get(TOKEN_KEY).unwrap_or_default().to_string(),
        }
    }

    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

pub fn strip_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

/// Default API base: `DASHBOARD_API_BASE`, or the dashboard's own origin.
pub fn default_api_base(port: u16) -> String {
    env::var("DASHBOARD_API_BASE").unwrap_or_else(|_| format!("http://127.0.0.1:{port}"))
}

#[derive(Debug)]
struct StoreInner {
    settings: Settings,
    config: Config,
}

#[derive(Clone, Debug)]
pub struct ConfigStore {
    path: PathBuf,
    inner: Arc<Mutex<StoreInner>>,
}

impl ConfigStore {
    pub async fn load(path: PathBuf, default_api_base: &str) -> Self {
        let settings = load_settings(&path).await;
        Self::from_settings(path, settings, default_api_base)
    }

    pub fn from_settings(path: PathBuf, settings: Settings, default_api_base: &str) -> Self {
        let config = Config::from_settings(&settings, default_api_base);
        Self {
            path,
            inner: Arc::new(Mutex::new(StoreInner { settings, config })),
        }
    }

    pub async fn current(&self) -> Config {
        self.inner.lock().await.config.clone()
    }

    /// Applies a "save configuration" action and persists it.
    ///
    /// A blank `api_base` keeps the current one. An empty token removes the stored entry.
    pub async fn save(&self, api_base: &str, token: &str) -> Result<Config, DashboardError> {
        let mut inner = self.inner.lock().await;

        if !api_base.is_empty() {
            let api_base = strip_trailing_slash(api_base).to_string();
            inner.settings.set(API_BASE_KEY, api_base.clone());
            inner.config.api_base = api_base;
        }

        let token = token.trim().to_string();
        if token.is_empty() {
            inner.settings.remove(TOKEN_KEY);
        } else {
            inner.settings.set(TOKEN_KEY, token.clone());
        }
        inner.config.token = token;

        persist_settings(&self.path, &inner.settings).await?;
        info!(
            api_base = %inner.config.api_base,
            authenticated = inner.config.has_token(),
            "saved dashboard configuration"
        );

        Ok(inner.config.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_settings_path() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("health_dashboard_config_{}_{}", std::process::id(), nanos));
        path.push("settings.json");
        path
    }

    #[test]
    fn defaults_apply_when_nothing_is_persisted() {
        let config = Config::from_settings(&Settings::default(), "http://localhost:8080/");
        assert_eq!(config.api_base, "http://localhost:8080");
        assert_eq!(config.token, "");
        assert!(!config.has_token());
    }

    #[test]
    fn persisted_values_win_over_default() {
        let mut settings = Settings::default();
        settings.set(API_BASE_KEY, "https://health.example.com/");
        settings.set(TOKEN_KEY, "abc");

        let config = Config::from_settings(&settings, "http://localhost:8080");
        assert_eq!(config.api_base, "https://health.example.com");
        assert_eq!(config.token, "abc");
        assert_eq!(
            config.endpoint("/api/v1/health-data/summary"),
            "https://health.example.com/api/v1/health-data/summary"
        );
    }

    #[test]
    fn only_one_trailing_slash_is_stripped() {
        assert_eq!(strip_trailing_slash("http://a//"), "http://a/");
        assert_eq!(strip_trailing_slash("http://a"), "http://a");
    }

    #[tokio::test]
    async fn save_normalizes_and_persists() {
        let path = unique_settings_path();
        let store = ConfigStore::from_settings(path.clone(), Settings::default(), "http://localhost:8080");

        let config = store.save("https://api.example.com/", "  secret \n").await.unwrap();
        assert_eq!(config.api_base, "https://api.example.com");
        assert_eq!(config.token, "secret");

        let persisted = load_settings(&path).await;
        assert_eq!(persisted.get(API_BASE_KEY), Some("https://api.example.com"));
        assert_eq!(persisted.get(TOKEN_KEY), Some("secret"));

        let reloaded = ConfigStore::load(path.clone(), "http://unused").await;
        assert_eq!(reloaded.current().await, config);
    }

    #[tokio::test]
    async fn empty_token_removes_persisted_entry() {
        let path = unique_settings_path();
        let store = ConfigStore::from_settings(path.clone(), Settings::default(), "http://localhost:8080");
        store.save("", "secret").await.unwrap();

        let config = store.save("", "   ").await.unwrap();
        assert_eq!(config.api_base, "http://localhost:8080");
        assert!(!config.has_token());

        let persisted = load_settings(&path).await;
        assert_eq!(persisted.get(TOKEN_KEY), None);
        assert_eq!(persisted.get(API_BASE_KEY), None);
    }
}
