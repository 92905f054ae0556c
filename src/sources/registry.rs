//! Source registry for managing available content sources

use super::traits::Source;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of all available content sources
///
/// Registration and lookup may interleave with in-flight aggregations, so the
/// map sits behind a reader-writer lock.
pub struct SourceRegistry {
    sources: RwLock<HashMap<String, Arc<dyn Source>>>,
}

impl SourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            sources: RwLock::new(HashMap::new()),
        }
    }

    /// Register a source under its own name, replacing any previous one
    pub fn register(&self, source: Arc<dyn Source>) {
        let name = source.name().to_string();
        self.sources.write().insert(name, source);
    }

    /// Get a source by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Source>> {
        self.sources.read().get(name).cloned()
    }

    /// All registered names in lexicographic order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sources.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolve a requested subset to registered names
    ///
    /// Unknown names are dropped; an empty request selects everything. The
    /// result is sorted and free of duplicates.
    pub fn resolve(&self, requested: &[String]) -> Vec<String> {
        if requested.is_empty() {
            return self.names();
        }

        let sources = self.sources.read();
        let mut names: Vec<String> = requested
            .iter()
            .map(|name| name.trim())
            .filter(|name| sources.contains_key(*name))
            .map(str::to_string)
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Check if a source exists
    pub fn contains(&self, name: &str) -> bool {
        self.sources.read().contains_key(name)
    }

    /// Get number of registered sources
    pub fn len(&self) -> usize {
        self.sources.read().len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.sources.read().is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::MockSource;

    fn named(name: &str) -> Arc<dyn Source> {
        Arc::new(MockSource::with_items(name, vec![]))
    }

    #[test]
    fn test_registry() {
        let registry = SourceRegistry::new();
        registry.register(Arc::new(MockSource::new()));

        assert!(registry.contains("mock"));
        assert!(registry.get("mock").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_names_sorted() {
        let registry = SourceRegistry::new();
        registry.register(named("wechat"));
        registry.register(named("bilibili"));
        registry.register(named("zhihu"));

        assert_eq!(registry.names(), vec!["bilibili", "wechat", "zhihu"]);
    }

    #[test]
    fn test_last_registration_wins() {
        let registry = SourceRegistry::new();
        let first = named("zhihu");
        let second = named("zhihu");
        registry.register(first);
        registry.register(second.clone());

        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&registry.get("zhihu").unwrap(), &second));
    }

    #[test]
    fn test_resolve() {
        let registry = SourceRegistry::new();
        registry.register(named("wechat"));
        registry.register(named("zhihu"));

        assert_eq!(registry.resolve(&[]), vec!["wechat", "zhihu"]);
        assert_eq!(
            registry.resolve(&[" zhihu ".into(), "unknown".into(), "wechat".into(), "zhihu".into()]),
            vec!["wechat", "zhihu"]
        );
        assert!(registry.resolve(&["unknown".into()]).is_empty());
    }
}
