//! Summarizer traits and types

use crate::models::{ContentItem, Summary};
use async_trait::async_trait;

/// Failure of the summarization step
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummaryError {
    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("{0}")]
    Failed(String),
}

/// Produces a [`Summary`] for a query and its merged items
///
/// Must be a pure function of its inputs.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Name reported in outcome entries when summarization fails
    fn name(&self) -> &str {
        "summary"
    }

    async fn summarize(&self, query: &str, items: &[ContentItem]) -> Result<Summary, SummaryError>;
}
