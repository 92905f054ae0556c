//! Source traits and types

use crate::models::ContentItem;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Parameters passed to every source call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOptions {
    /// Maximum number of items to return
    pub limit: usize,
}

impl SourceOptions {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

/// Failure of a single source call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("{0} source is not configured")]
    NotConfigured(String),

    #[error("source {0} not found")]
    NotFound(String),

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("source task failed: {0}")]
    Panicked(String),

    #[error("{0}")]
    Failed(String),
}

/// Main trait that all content sources must implement
///
/// Implementations must not block the executor. A call may be dropped at any
/// await point when the aggregation deadline passes or the caller goes away.
#[async_trait]
pub trait Source: Send + Sync {
    /// Stable identifier, used as registry key and in cache keys
    fn name(&self) -> &str;

    /// Return items matching `query`, most relevant first
    async fn search(
        &self,
        query: &str,
        options: &SourceOptions,
    ) -> Result<Vec<ContentItem>, SourceError>;
}
