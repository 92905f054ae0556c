//! Source loader for initializing sources from configuration

use super::mock::MockSource;
use super::registry::SourceRegistry;
use super::traits::{Source, SourceError};
use crate::config::Settings;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Loader for initializing sources from configuration
pub struct SourceLoader;

impl SourceLoader {
    /// Load all configured sources
    ///
    /// Falls back to the mock source when no configured name resolves, so the
    /// service always has something to aggregate.
    pub fn load(settings: &Settings) -> Result<SourceRegistry> {
        let registry = SourceRegistry::new();

        for name in &settings.aggregator.sources {
            match Self::create_source(name) {
                Ok(source) => {
                    info!("Loaded source: {}", name);
                    registry.register(source);
                }
                Err(e) => {
                    warn!(
                        "Failed to load source {}: {} (available: {:?})",
                        name,
                        e,
                        Self::available_sources()
                    );
                }
            }
        }

        if registry.is_empty() {
            warn!("No configured source could be loaded, falling back to mock");
            registry.register(Arc::new(MockSource::new()));
        }

        info!("Loaded {} sources", registry.len());
        Ok(registry)
    }

    /// Create a source instance by type name
    fn create_source(source_type: &str) -> Result<Arc<dyn Source>, SourceError> {
        let source: Arc<dyn Source> = match source_type.trim() {
            "mock" => Arc::new(MockSource::new()),
            other => return Err(SourceError::NotConfigured(other.to_string())),
        };
        Ok(source)
    }

    /// Get list of available source types
    pub fn available_sources() -> Vec<&'static str> {
        vec!["mock"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_configured() {
        let settings = Settings::default();
        let registry = SourceLoader::load(&settings).unwrap();
        assert_eq!(registry.names(), vec!["mock"]);
    }

    #[test]
    fn test_unknown_sources_fall_back_to_mock() {
        let mut settings = Settings::default();
        settings.aggregator.sources = vec!["weibo".to_string(), "douyin".to_string()];

        let registry = SourceLoader::load(&settings).unwrap();
        assert_eq!(registry.names(), vec!["mock"]);
    }

    #[test]
    fn test_create_source() {
        for name in SourceLoader::available_sources() {
            let source = SourceLoader::create_source(name).unwrap();
            assert_eq!(source.name(), name);
        }

        let err = SourceLoader::create_source("weibo").err().unwrap();
        assert_eq!(err, SourceError::NotConfigured("weibo".to_string()));
        assert_eq!(err.to_string(), "weibo source is not configured");
    }
}
