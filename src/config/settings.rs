//! Settings structures for the aggregation service

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub aggregator: AggregatorSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with process environment variables
    pub fn merge_env(&mut self) {
        self.merge_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`; unparseable values are ignored
    pub fn merge_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        };

        if let Some(port) = get("APP_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(addr) = get("APP_BIND_ADDRESS") {
            self.server.bind_address = addr;
        }
        if let Some(ttl) = get("CACHE_TTL_SECS").and_then(|val| val.parse().ok()) {
            self.aggregator.cache_ttl_secs = ttl;
        }
        if let Some(timeout) = get("REQUEST_TIMEOUT_SECS").and_then(|val| val.parse().ok()) {
            self.aggregator.request_timeout_secs = timeout;
        }
        if let Some(size) = get("HISTORY_SIZE").and_then(|val| val.parse().ok()) {
            self.aggregator.history_size = size;
        }
        if let Some(raw) = get("PROVIDERS") {
            let sources = parse_list(&raw);
            if !sources.is_empty() {
                self.aggregator.sources = sources;
            }
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Upper bound on a single search request handled over HTTP
    pub handler_timeout_secs: u64,
    /// Time allowed for in-flight requests to finish on shutdown
    pub shutdown_grace_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "0.0.0.0".to_string(),
            handler_timeout_secs: 20,
            shutdown_grace_secs: 10,
        }
    }
}

/// Aggregation engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorSettings {
    /// Lifetime of a cached response in seconds
    pub cache_ttl_secs: u64,
    /// Deadline shared by all source calls of one search, in seconds
    pub request_timeout_secs: u64,
    /// Number of history records kept
    pub history_size: usize,
    /// Sources to load at startup
    pub sources: Vec<String>,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 300,
            request_timeout_secs: 8,
            history_size: 50,
            sources: vec!["mock".to_string()],
        }
    }
}

/// Split a comma separated list, dropping blanks
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
