//! Content item and summary definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single piece of content returned by a source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Title of the content
    pub title: String,
    /// Canonical URL
    pub url: String,
    /// Short text excerpt
    #[serde(default)]
    pub snippet: String,
    /// Author or publisher name
    #[serde(default)]
    pub author: String,
    /// Identifier of the platform the item came from
    pub source: String,
    /// Publication time, used for recency ordering
    pub published_at: DateTime<Utc>,
    /// Engagement counters (likes, reads, ...)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metrics: HashMap<String, i64>,
    /// Free-form tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Source-specific extra fields
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extras: HashMap<String, String>,
}

impl ContentItem {
    /// Create a new item
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: String::new(),
            author: String::new(),
            source: source.into(),
            published_at,
            metrics: HashMap::new(),
            tags: Vec::new(),
            extras: HashMap::new(),
        }
    }

    /// Add a snippet
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// Add an author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Add a metric counter
    pub fn with_metric(mut self, name: impl Into<String>, value: i64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    /// Add tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Add an extra field
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }
}

/// Derived overview of a set of merged items
///
/// `Summary::default()` is the neutral value returned when summarization fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub query: String,
    pub overview: String,
    pub highlights: Vec<String>,
    pub keywords: Vec<String>,
    pub sentiment: String,
    /// Item count per source identifier
    pub source_breakdown: HashMap<String, usize>,
    pub generated_at: Option<DateTime<Utc>>,
}

/// Serialize a `Duration` as whole milliseconds
pub mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
