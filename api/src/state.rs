use std::sync::Arc;

use common::config::Settings;
use common::db::repositories::ReportStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReportStore>,
    pub config: Arc<Settings>,
}

impl AppState {
    /// Create a new AppState instance
    pub fn new(store: Arc<dyn ReportStore>, config: Settings) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
