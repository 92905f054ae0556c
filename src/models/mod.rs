//! Content and summary types shared by sources, summarizers and the aggregator
//!
//! Everything here is produced once and never mutated afterwards.

mod types;

pub use types::*;
