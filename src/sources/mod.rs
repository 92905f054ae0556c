//! Content source module
//!
//! Defines the Source trait and provides a registry for all content sources.

mod loader;
mod registry;
mod traits;

// Source implementations
pub mod mock;

pub use loader::SourceLoader;
pub use registry::SourceRegistry;
pub use traits::*;
