//! Summarization module
//!
//! Turns a merged item list into an overview with highlights, keywords and a
//! rough sentiment label.

mod simple;
mod traits;

pub use simple::SimpleSummarizer;
pub use traits::*;
