//! Metrics collection module
//!
//! Tracks source performance, error rates and cache effectiveness.

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of response times kept per source
const RESPONSE_TIME_WINDOW: usize = 100;

#[derive(Default)]
struct SourceCounters {
    calls: u64,
    successes: u64,
    errors: u64,
    response_times: VecDeque<u64>,
}

/// Aggregation metrics collector
pub struct Metrics {
    total_searches: AtomicU64,
    cache_hits: AtomicU64,
    sources: RwLock<HashMap<String, SourceCounters>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            sources: RwLock::new(HashMap::new()),
        }
    }

    /// Increment total search count
    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment cache hit count
    pub fn inc_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of one source call
    pub fn record_source_call(&self, source: &str, success: bool, time_ms: u64) {
        let mut sources = self.sources.write();
        let counters = sources.entry(source.to_string()).or_default();

        counters.calls += 1;
        if success {
            counters.successes += 1;
        } else {
            counters.errors += 1;
        }

        if counters.response_times.len() >= RESPONSE_TIME_WINDOW {
            counters.response_times.pop_front();
        }
        counters.response_times.push_back(time_ms);
    }

    /// Get total searches
    pub fn total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    /// Get cache hits
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let sources = self.sources.read();
        let sources = sources
            .iter()
            .map(|(name, counters)| {
                let avg_response_time = if counters.response_times.is_empty() {
                    None
                } else {
                    Some(
                        counters.response_times.iter().sum::<u64>()
                            / counters.response_times.len() as u64,
                    )
                };
                let reliability = if counters.calls == 0 {
                    100.0
                } else {
                    (counters.successes as f64 / counters.calls as f64) * 100.0
                };

                (
                    name.clone(),
                    SourceStats {
                        calls: counters.calls,
                        errors: counters.errors,
                        avg_response_time,
                        reliability,
                    },
                )
            })
            .collect();

        MetricsSnapshot {
            total_searches: self.total_searches(),
            cache_hits: self.cache_hits(),
            sources,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for a single source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceStats {
    pub calls: u64,
    pub errors: u64,
    /// Average over the last 100 calls, in milliseconds
    pub avg_response_time: Option<u64>,
    /// Percentage of successful calls
    pub reliability: f64,
}

/// Point-in-time view of the collector
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_searches: u64,
    pub cache_hits: u64,
    pub sources: BTreeMap<String, SourceStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.inc_search();
        metrics.inc_cache_hit();
        metrics.record_source_call("zhihu", true, 100);
        metrics.record_source_call("zhihu", false, 300);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_searches, 1);
        assert_eq!(snapshot.cache_hits, 1);

        let zhihu = &snapshot.sources["zhihu"];
        assert_eq!(zhihu.calls, 2);
        assert_eq!(zhihu.errors, 1);
        assert_eq!(zhihu.avg_response_time, Some(200));
        assert_eq!(zhihu.reliability, 50.0);
    }

    #[test]
    fn test_response_time_window() {
        let metrics = Metrics::new();
        for _ in 0..RESPONSE_TIME_WINDOW {
            metrics.record_source_call("wechat", true, 10);
        }
        metrics.record_source_call("wechat", true, 110);

        let snapshot = metrics.snapshot();
        // one 10ms sample was pushed out
        assert_eq!(snapshot.sources["wechat"].avg_response_time, Some(11));
        assert_eq!(snapshot.sources["wechat"].calls, 101);
    }
}
