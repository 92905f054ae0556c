//! Query history
//!
//! Keeps a bounded, most-recent-first log of completed aggregations.

use crate::models::duration_ms;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Capacity used when zero is supplied
pub const DEFAULT_CAPACITY: usize = 50;

/// Metadata of one completed aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub query: String,
    /// Sources consulted for this query
    pub sources: Vec<String>,
    /// Number of merged items returned
    pub results: usize,
    #[serde(with = "duration_ms")]
    pub took: Duration,
    pub time: DateTime<Utc>,
}

/// Bounded store of recent [`HistoryRecord`]s
pub struct HistoryLog {
    capacity: usize,
    records: RwLock<VecDeque<HistoryRecord>>,
}

impl HistoryLog {
    /// Create a log holding at most `capacity` records
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 { DEFAULT_CAPACITY } else { capacity };
        Self {
            capacity,
            records: RwLock::new(VecDeque::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Prepend a record, dropping the oldest ones beyond capacity
    pub fn add(&self, record: HistoryRecord) {
        let mut records = self.records.write();
        records.push_front(record);
        records.truncate(self.capacity);
    }

    /// Up to `limit` most recent records, newest first. Zero means all.
    pub fn list(&self, limit: usize) -> Vec<HistoryRecord> {
        let records = self.records.read();
        let limit = if limit == 0 || limit > records.len() {
            records.len()
        } else {
            limit
        };

        let mut result: Vec<HistoryRecord> = records.iter().take(limit).cloned().collect();
        result.sort_by(|a, b| b.time.cmp(&a.time));
        result
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
