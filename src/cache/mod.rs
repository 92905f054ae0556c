//! Caching module for aggregated responses
//!
//! A small in-memory store with a fixed time-to-live per entry. Expired entries
//! are never swept; they are ignored on read and replaced on the next write.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// TTL applied when a zero duration is supplied
pub const DEFAULT_TTL: Duration = Duration::from_secs(120);

struct CacheEntry<V> {
    value: V,
    /// `None` when the TTL reaches past the representable clock range
    expires_at: Option<Instant>,
}

/// Key-value store with per-entry absolute expiration
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a new cache. A zero TTL falls back to [`DEFAULT_TTL`].
    pub fn new(ttl: Duration) -> Self {
        let ttl = if ttl.is_zero() { DEFAULT_TTL } else { ttl };
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// TTL stamped on every write
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a copy of the value for `key` if present and not yet expired
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| entry.expires_at.map_or(true, |at| at > Instant::now()))
            .map(|entry| entry.value.clone())
    }

    /// Insert or replace the entry for `key`
    pub fn set(&self, key: K, value: V) {
        let expires_at = Instant::now().checked_add(self.ttl);
        self.entries
            .write()
            .insert(key, CacheEntry { value, expires_at });
    }

    /// Discard all entries
    pub fn purge(&self) {
        self.entries.write().clear();
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Generate a cache key for an aggregation request
///
/// The query is trimmed and lower-cased and the source names are sorted, so
/// requests that differ only in casing, whitespace or source order share a key.
pub fn query_cache_key(query: &str, sources: &[String], limit: usize) -> String {
    use sha2::{Digest, Sha256};

    let mut sorted: Vec<&str> = sources.iter().map(String::as_str).collect();
    sorted.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(query.trim().to_lowercase().as_bytes());
    hasher.update(b"|");
    hasher.update(sorted.join(",").as_bytes());
    hasher.update(b"|");
    hasher.update(limit.to_string().as_bytes());

    format!("{:x}", hasher.finalize())
}
