//! Aggregation request and response models

use crate::config::AggregatorSettings;
use crate::models::{duration_ms, ContentItem, Summary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Item limit used when zero is requested
pub const DEFAULT_LIMIT: usize = 10;

/// Per-call aggregation options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Requested source names; empty means every registered source
    #[serde(default)]
    pub sources: Vec<String>,
    /// Maximum items requested from each source; zero means [`DEFAULT_LIMIT`]
    #[serde(default)]
    pub limit: usize,
    /// Skip the cache read but still store the fresh response
    #[serde(default)]
    pub force_refresh: bool,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the search to the given sources
    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Set the per-source item limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Bypass the cache read
    pub fn with_force_refresh(mut self, force_refresh: bool) -> Self {
        self.force_refresh = force_refresh;
        self
    }

    /// Limit with the default applied
    pub fn effective_limit(&self) -> usize {
        if self.limit == 0 {
            DEFAULT_LIMIT
        } else {
            self.limit
        }
    }
}

/// Result of querying one source (or the summarizer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOutcome {
    pub name: String,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Whether this outcome was served from cache
    pub cached: bool,
}

impl SourceOutcome {
    pub fn success(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
            error: None,
            cached: false,
        }
    }

    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: 0,
            error: Some(error.into()),
            cached: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Bookkeeping attached to every response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// True only on copies served from cache
    pub cached: bool,
    pub generated_at: DateTime<Utc>,
    #[serde(with = "duration_ms")]
    pub took: Duration,
    pub source_outcomes: Vec<SourceOutcome>,
}

/// Full result of one aggregation, also the unit stored in the cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResponse {
    pub query: String,
    /// Merged items, most recent first
    pub results: Vec<ContentItem>,
    pub summary: Summary,
    pub metadata: Metadata,
}

/// Engine configuration, resolved elsewhere and passed in as plain values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    pub cache_ttl: Duration,
    /// Deadline shared by all source calls of one round
    pub request_timeout: Duration,
    pub history_size: usize,
}

impl AggregatorConfig {
    pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(180);
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);
    pub const DEFAULT_HISTORY_SIZE: usize = 50;

    /// Replace zero values with their defaults
    pub fn normalized(self) -> Self {
        Self {
            cache_ttl: if self.cache_ttl.is_zero() {
                Self::DEFAULT_CACHE_TTL
            } else {
                self.cache_ttl
            },
            request_timeout: if self.request_timeout.is_zero() {
                Self::DEFAULT_REQUEST_TIMEOUT
            } else {
                self.request_timeout
            },
            history_size: if self.history_size == 0 {
                Self::DEFAULT_HISTORY_SIZE
            } else {
                self.history_size
            },
        }
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Self::DEFAULT_CACHE_TTL,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            history_size: Self::DEFAULT_HISTORY_SIZE,
        }
    }
}

impl From<&AggregatorSettings> for AggregatorConfig {
    fn from(settings: &AggregatorSettings) -> Self {
        Self {
            cache_ttl: Duration::from_secs(settings.cache_ttl_secs),
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
            history_size: settings.history_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = SearchOptions::new()
            .with_sources(["zhihu", "wechat"])
            .with_limit(3)
            .with_force_refresh(true);

        assert_eq!(options.sources, vec!["zhihu", "wechat"]);
        assert_eq!(options.effective_limit(), 3);
        assert!(options.force_refresh);
    }

    #[test]
    fn test_default_limit() {
        assert_eq!(SearchOptions::new().effective_limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_config_normalized() {
        let config = AggregatorConfig {
            cache_ttl: Duration::ZERO,
            request_timeout: Duration::ZERO,
            history_size: 0,
        }
        .normalized();

        assert_eq!(config, AggregatorConfig::default());
    }

    #[test]
    fn test_outcome_serialization() {
        let ok = serde_json::to_value(SourceOutcome::success("zhihu", 2)).unwrap();
        assert!(ok.get("error").is_none());

        let failed = SourceOutcome::failure("wechat", "boom");
        assert!(!failed.is_success());
        assert_eq!(failed.count, 0);
    }
}
