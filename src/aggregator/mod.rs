//! Aggregation orchestration module
//!
//! Coordinates concurrent source queries under a shared deadline, merges
//! their items, summarizes them and caches the combined response.

mod executor;
mod models;

pub use executor::Aggregator;
pub use models::*;
