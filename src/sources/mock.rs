//! Mock source backed by canned content
//!
//! Stands in for the real platform integrations (zhihu, wechat, xiaohongshu)
//! in development and tests.

use super::traits::*;
use crate::models::ContentItem;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Source that matches queries against a fixed item set
pub struct MockSource {
    name: String,
    items: Vec<ContentItem>,
    latency: Option<Duration>,
    calls: AtomicUsize,
}

impl MockSource {
    /// Create the default mock source with sample content
    pub fn new() -> Self {
        let now = Utc::now();
        let items = vec![
            ContentItem::new(
                "Zhihu users debate AI in content operations",
                "https://www.zhihu.com/question/ai-content-ops",
                "zhihu",
                now - ChronoDuration::hours(2),
            )
            .with_snippet("How automated generation tools help operations teams work faster, with recent case studies.")
            .with_author("zhihu user")
            .with_metric("likes", 1200)
            .with_metric("comments", 132)
            .with_tags(["AI", "content operations"])
            .with_extra("content_type", "question"),
            ContentItem::new(
                "WeChat official accounts: brand growth in private traffic",
                "https://mp.weixin.qq.com/s/brand-growth-2025",
                "wechat",
                now - ChronoDuration::hours(3),
            )
            .with_snippet("Three key steps for building a private traffic pool, backed by case data.")
            .with_author("New Media Watch")
            .with_metric("reads", 5800)
            .with_metric("likes", 280)
            .with_tags(["brand", "private traffic"]),
            ContentItem::new(
                "Xiaohongshu operations in practice: winning young users' attention",
                "https://www.xiaohongshu.com/explore/ops-tips",
                "xiaohongshu",
                now - ChronoDuration::minutes(90),
            )
            .with_snippet("Breaks down growth strategy by community tone, content style and interaction design.")
            .with_author("ops notes")
            .with_metric("likes", 860)
            .with_metric("saves", 210)
            .with_tags(["growth", "community operations"]),
            ContentItem::new(
                "Zhihu roundtable: how brands should monitor reputation",
                "https://www.zhihu.com/roundtable/brand-monitor",
                "zhihu",
                now - ChronoDuration::hours(6),
            )
            .with_snippet("Guests share an end-to-end approach from data collection to sentiment analysis.")
            .with_author("Data Bloom")
            .with_metric("likes", 420)
            .with_metric("comments", 65)
            .with_tags(["brand", "reputation"])
            .with_extra("content_type", "roundtable"),
            ContentItem::new(
                "WeChat data: 2025 content consumption trends",
                "https://mp.weixin.qq.com/s/data-trend-2025",
                "wechat",
                now - ChronoDuration::hours(5),
            )
            .with_snippet("How users across cities shifted between short video and long-form articles.")
            .with_author("Data Insights")
            .with_metric("reads", 8700)
            .with_metric("likes", 490)
            .with_tags(["data", "trends"]),
        ];

        Self::with_items("mock", items)
    }

    /// Create a named source over the given items
    pub fn with_items(name: impl Into<String>, items: Vec<ContentItem>) -> Self {
        Self {
            name: name.into(),
            items,
            latency: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Delay every search by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of times `search` has been invoked
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(
        &self,
        query: &str,
        options: &SourceOptions,
    ) -> Result<Vec<ContentItem>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let query = query.trim().to_lowercase();
        let mut matched: Vec<ContentItem> = self
            .items
            .iter()
            .filter(|item| {
                query.is_empty()
                    || item.title.to_lowercase().contains(&query)
                    || item.snippet.to_lowercase().contains(&query)
            })
            .cloned()
            .collect();

        matched.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        if options.limit > 0 {
            matched.truncate(options.limit);
        }
        Ok(matched)
    }
}
