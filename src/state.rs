use crate::client::HealthClient;
use crate::config::ConfigStore;
use crate::summary::SummaryOrchestrator;
use crate::view::{Dashboard, SharedView};

#[derive(Clone)]
pub struct AppState {
    pub config: ConfigStore,
    pub client: HealthClient,
    pub view: SharedView,
    pub summary: SummaryOrchestrator,
}

impl AppState {
    pub fn new(config: ConfigStore, client: HealthClient) -> Self {
        let view = Dashboard::shared();
        let summary = SummaryOrchestrator::new(client.clone(), config.clone(), view.clone());
        Self {
            config,
            client,
            view,
            summary,
        }
    }
}
