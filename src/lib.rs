//! Pulse Aggregator: concurrent content aggregation with response caching
//!
//! A query is fanned out to every selected content source under one shared
//! deadline. The items that come back are merged newest first and summarized.
//! The combined response is cached for a bounded time and each completed
//! query is logged to a bounded history.

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod error;
pub mod history;
pub mod metrics;
pub mod models;
pub mod sources;
pub mod summary;
pub mod web;

pub use aggregator::{AggregationResponse, Aggregator, AggregatorConfig, SearchOptions};
pub use config::Settings;
pub use error::AggregatorError;
pub use models::{ContentItem, Summary};
pub use sources::{Source, SourceRegistry};
pub use summary::Summarizer;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
