//! Application state shared across handlers

use crate::aggregator::Aggregator;
use crate::config::Settings;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Aggregation engine
    pub aggregator: Arc<Aggregator>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, aggregator: Aggregator) -> Self {
        Self {
            settings: Arc::new(settings),
            aggregator: Arc::new(aggregator),
        }
    }

    /// Upper bound on one search request
    pub fn handler_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.server.handler_timeout_secs.max(1))
    }
}
