//! Aggregation execution and orchestration

use super::models::*;
use crate::cache::{query_cache_key, TtlCache};
use crate::error::{AggregatorError, Result};
use crate::history::{HistoryLog, HistoryRecord};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::models::{ContentItem, Summary};
use crate::sources::{Source, SourceError, SourceOptions, SourceRegistry};
use crate::summary::{Summarizer, SummaryError};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio::time::timeout_at;
use tracing::{debug, info, warn};

type SourceResult = (std::result::Result<Vec<ContentItem>, SourceError>, Duration);

/// Deadline used when `now + timeout` is not representable
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Aggregator that fans a query out to every selected source
///
/// Owns its response cache, history log and metrics; the source registry is
/// shared so that sources can be registered while searches are running.
pub struct Aggregator {
    registry: Arc<SourceRegistry>,
    summarizer: Arc<dyn Summarizer>,
    cache: TtlCache<String, AggregationResponse>,
    history: HistoryLog,
    metrics: Metrics,
    timeout: Duration,
}

impl Aggregator {
    /// Create a new aggregator
    pub fn new(
        registry: Arc<SourceRegistry>,
        summarizer: Arc<dyn Summarizer>,
        config: AggregatorConfig,
    ) -> Self {
        let config = config.normalized();
        Self {
            registry,
            summarizer,
            cache: TtlCache::new(config.cache_ttl),
            history: HistoryLog::new(config.history_size),
            metrics: Metrics::new(),
            timeout: config.request_timeout,
        }
    }

    /// Register or replace a source
    pub fn register_source(&self, source: Arc<dyn Source>) {
        info!("Registering source: {}", source.name());
        self.registry.register(source);
    }

    /// Registered source names in lexicographic order
    pub fn source_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Most recent history records, newest first. Zero returns all.
    pub fn history(&self, limit: usize) -> Vec<HistoryRecord> {
        self.history.list(limit)
    }

    /// Drop every cached response
    pub fn purge_cache(&self) {
        self.cache.purge();
    }

    /// Metrics snapshot
    pub fn stats(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Answer `query` from the cache or by querying every selected source
    ///
    /// Fails only on an empty query or when no requested source is
    /// registered. Source and summarizer failures are reported in
    /// `metadata.source_outcomes`. Dropping the returned future aborts all
    /// outstanding source calls.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<AggregationResponse> {
        let start = Instant::now();

        let query = query.trim();
        if query.is_empty() {
            return Err(AggregatorError::InvalidRequest("query is required".to_string()));
        }

        let sources = self.registry.resolve(&options.sources);
        if sources.is_empty() {
            return Err(AggregatorError::Unavailable("no sources available".to_string()));
        }

        let limit = options.effective_limit();
        let cache_key = query_cache_key(query, &sources, limit);
        self.metrics.inc_search();

        if !options.force_refresh {
            if let Some(mut response) = self.cache.get(&cache_key) {
                response.metadata.cached = true;
                response.metadata.took = start.elapsed();
                for outcome in &mut response.metadata.source_outcomes {
                    outcome.cached = true;
                }

                debug!("Cache hit for '{}' on {:?}", query, sources);
                self.metrics.inc_cache_hit();
                self.record_history(query, &sources, response.results.len(), response.metadata.took);
                return Ok(response);
            }
        }

        let deadline = self.deadline();

        info!(
            "Aggregating '{}' across {} sources (limit {})",
            query,
            sources.len(),
            limit
        );

        let slots = self.fan_out(query, &sources, limit, deadline).await;

        let mut results = Vec::new();
        let mut outcomes = Vec::with_capacity(sources.len() + 1);
        for (name, (result, took)) in sources.iter().zip(slots) {
            self.metrics
                .record_source_call(name, result.is_ok(), took.as_millis() as u64);

            match result {
                Ok(items) => {
                    debug!("Source {} returned {} items in {:?}", name, items.len(), took);
                    outcomes.push(SourceOutcome::success(name, items.len()));
                    results.extend(items);
                }
                Err(e) => {
                    warn!("Source {} failed: {}", name, e);
                    outcomes.push(SourceOutcome::failure(name, e.to_string()));
                }
            }
        }

        results.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        let summary = match timeout_at(deadline, self.summarizer.summarize(query, &results)).await {
            Ok(Ok(summary)) => summary,
            Ok(Err(e)) => self.summary_failure(e, &mut outcomes),
            Err(_) => self.summary_failure(SummaryError::DeadlineExceeded, &mut outcomes),
        };

        let response = AggregationResponse {
            query: query.to_string(),
            results,
            summary,
            metadata: Metadata {
                cached: false,
                generated_at: Utc::now(),
                took: start.elapsed(),
                source_outcomes: outcomes,
            },
        };

        self.cache.set(cache_key, response.clone());
        self.history.add(HistoryRecord {
            query: response.query.clone(),
            sources: sources.clone(),
            results: response.results.len(),
            took: response.metadata.took,
            time: response.metadata.generated_at,
        });

        info!(
            "Aggregated '{}': {} items in {:?}",
            query,
            response.results.len(),
            response.metadata.took
        );

        Ok(response)
    }

    /// Query every source concurrently under a shared deadline
    ///
    /// Returns one slot per entry of `sources`, in the same order.
    async fn fan_out(
        &self,
        query: &str,
        sources: &[String],
        limit: usize,
        deadline: tokio::time::Instant,
    ) -> Vec<SourceResult> {
        let mut slots: Vec<Option<SourceResult>> = (0..sources.len()).map(|_| None).collect();
        let mut tasks = JoinSet::new();
        let mut task_slots = HashMap::with_capacity(sources.len());
        let options = SourceOptions::new(limit);

        for (index, name) in sources.iter().enumerate() {
            // The source may have been replaced or removed since resolution
            let Some(source) = self.registry.get(name) else {
                slots[index] = Some((Err(SourceError::NotFound(name.clone())), Duration::ZERO));
                continue;
            };

            let query = query.to_string();
            let handle = tasks.spawn(async move {
                let started = Instant::now();
                let result = match timeout_at(deadline, source.search(&query, &options)).await {
                    Ok(result) => result,
                    Err(_) => Err(SourceError::DeadlineExceeded),
                };
                (result, started.elapsed())
            });
            task_slots.insert(handle.id(), index);
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, slot) = match joined {
                Ok((id, slot)) => (id, slot),
                Err(e) => {
                    warn!("Source task failed: {}", e);
                    (e.id(), (Err(SourceError::Panicked(e.to_string())), Duration::ZERO))
                }
            };
            if let Some(index) = task_slots.remove(&id) {
                slots[index] = Some(slot);
            }
        }

        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    (Err(SourceError::Panicked("task aborted".to_string())), Duration::ZERO)
                })
            })
            .collect()
    }

    fn deadline(&self) -> tokio::time::Instant {
        let now = tokio::time::Instant::now();
        now.checked_add(self.timeout)
            .unwrap_or_else(|| now + FAR_FUTURE)
    }

    fn summary_failure(&self, error: SummaryError, outcomes: &mut Vec<SourceOutcome>) -> Summary {
        warn!("Summarizer {} failed: {}", self.summarizer.name(), error);
        outcomes.push(SourceOutcome::failure(self.summarizer.name(), error.to_string()));
        Summary::default()
    }

    fn record_history(&self, query: &str, sources: &[String], results: usize, took: Duration) {
        self.history.add(HistoryRecord {
            query: query.to_string(),
            sources: sources.to_vec(),
            results,
            took,
            time: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::MockSource;
    use crate::summary::SimpleSummarizer;

    fn aggregator_with(sources: Vec<Arc<dyn Source>>) -> Aggregator {
        configured(sources, AggregatorConfig::default())
    }

    fn configured(sources: Vec<Arc<dyn Source>>, config: AggregatorConfig) -> Aggregator {
        let registry = Arc::new(SourceRegistry::new());
        for source in sources {
            registry.register(source);
        }
        Aggregator::new(registry, Arc::new(SimpleSummarizer::new()), config)
    }

    #[tokio::test]
    async fn test_search_and_cache() {
        let mock = Arc::new(MockSource::new());
        let aggregator = aggregator_with(vec![mock.clone() as Arc<dyn Source>]);
        let options = SearchOptions::new().with_limit(3);

        let first = aggregator.search("operations", &options).await.unwrap();
        assert!(!first.results.is_empty());
        assert!(!first.metadata.cached);
        assert_eq!(mock.call_count(), 1);

        let history = aggregator.history(5);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].query, "operations");

        let second = aggregator.search("operations", &options).await.unwrap();
        assert!(second.metadata.cached);
        assert!(second.metadata.source_outcomes.iter().all(|o| o.cached));
        assert_eq!(second.results, first.results);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(aggregator.history(0).len(), 2);
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let aggregator = aggregator_with(vec![Arc::new(MockSource::new()) as Arc<dyn Source>]);

        let err = aggregator.search("   ", &SearchOptions::new()).await.unwrap_err();
        assert!(matches!(err, AggregatorError::InvalidRequest(_)));
        assert!(aggregator.history(0).is_empty());
    }

    #[tokio::test]
    async fn test_no_sources() {
        let aggregator = aggregator_with(vec![]);

        let err = aggregator.search("rust", &SearchOptions::new()).await.unwrap_err();
        assert!(matches!(err, AggregatorError::Unavailable(_)));
        assert_eq!(aggregator.stats().total_searches, 0);
    }

    #[tokio::test]
    async fn test_purge_cache() {
        let mock = Arc::new(MockSource::new());
        let aggregator = aggregator_with(vec![mock.clone() as Arc<dyn Source>]);

        aggregator.search("brand", &SearchOptions::new()).await.unwrap();
        aggregator.purge_cache();
        let again = aggregator.search("brand", &SearchOptions::new()).await.unwrap();

        assert!(!again.metadata.cached);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_register_source_at_runtime() {
        let aggregator = aggregator_with(vec![]);
        aggregator.register_source(Arc::new(MockSource::with_items("zhihu", vec![])));

        assert_eq!(aggregator.source_names(), vec!["zhihu"]);
        let response = aggregator.search("anything", &SearchOptions::new()).await.unwrap();
        assert!(response.results.is_empty());
        assert_eq!(response.metadata.source_outcomes, vec![SourceOutcome::success("zhihu", 0)]);
    }

    #[tokio::test]
    async fn test_unbounded_timeout() {
        let config = AggregatorConfig {
            request_timeout: Duration::from_secs(u64::MAX),
            ..AggregatorConfig::default()
        };
        let aggregator = configured(vec![Arc::new(MockSource::new()) as Arc<dyn Source>], config);

        let response = aggregator.search("brand", &SearchOptions::new()).await.unwrap();
        assert_eq!(response.results.len(), 2);
    }

    #[tokio::test]
    async fn test_unbounded_cache_ttl() {
        let mock = Arc::new(MockSource::new());
        let config = AggregatorConfig {
            cache_ttl: Duration::from_secs(u64::MAX),
            ..AggregatorConfig::default()
        };
        let aggregator = configured(vec![mock.clone() as Arc<dyn Source>], config);

        aggregator.search("brand", &SearchOptions::new()).await.unwrap();
        let hit = aggregator.search("brand", &SearchOptions::new()).await.unwrap();

        assert!(hit.metadata.cached);
        assert_eq!(mock.call_count(), 1);
    }
}
