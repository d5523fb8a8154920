//! Result cache boundary.
//!
//! Cached results are keyed by a hash of the literal-substituted query, so
//! the same statement with the same values hits the same entry. A hit is
//! replayed through [`QueryResult`](crate::result::QueryResult) exactly like
//! a live result.

use crate::result::BufferedRows;
use dashmap::DashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Storage for materialized results.
pub trait ResultCache: Send + Sync {
    fn get(&self, key: u64) -> Option<BufferedRows>;
    fn put(&self, key: u64, rows: BufferedRows);
}

/// Cache key for a literal-substituted query.
pub fn cache_key(prepared: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    prepared.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            ttl: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    rows: BufferedRows,
    created_at: Instant,
}

/// In-process cache with a TTL and an entry cap.
pub struct MemoryCache {
    entries: DashMap<u64, CacheEntry>,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::with_capacity(config.max_entries),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self::new(CacheConfig {
            ttl,
            ..CacheConfig::default()
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    fn evict_expired(&self) {
        let now = Instant::now();
        let ttl = self.config.ttl;
        self.entries
            .retain(|_, entry| now.duration_since(entry.created_at) < ttl);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl ResultCache for MemoryCache {
    fn get(&self, key: u64) -> Option<BufferedRows> {
        if let Some(entry) = self.entries.get(&key) {
            if entry.created_at.elapsed() < self.config.ttl {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.rows.clone());
            }
            drop(entry);
            self.entries.remove(&key);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn put(&self, key: u64, rows: BufferedRows) {
        if self.entries.len() >= self.config.max_entries {
            self.evict_expired();
            if self.entries.len() >= self.config.max_entries {
                tracing::debug!(key, "result cache full, entry not stored");
                return;
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                rows,
                created_at: Instant::now(),
            },
        );
    }
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn rows() -> BufferedRows {
        BufferedRows::new(vec!["a".into()], vec![vec![Value::Int(1)]])
    }

    #[test]
    fn test_cache_hit_miss() {
        let cache = MemoryCache::default();
        let key = cache_key("SELECT 1");

        assert!(cache.get(key).is_none());
        cache.put(key, rows());
        assert_eq!(cache.get(key), Some(rows()));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate(), 50.0);
    }

    #[test]
    fn test_key_depends_on_values() {
        assert_ne!(cache_key("a = 1"), cache_key("a = 2"));
        assert_eq!(cache_key("a = 1"), cache_key("a = 1"));
    }

    #[test]
    fn test_expired_entry_is_dropped() {
        let cache = MemoryCache::with_ttl(Duration::ZERO);
        cache.put(1, rows());
        assert!(cache.get(1).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_full_cache_skips_insert() {
        let cache = MemoryCache::new(CacheConfig {
            max_entries: 1,
            ttl: Duration::from_secs(60),
        });
        cache.put(1, rows());
        cache.put(2, rows());
        assert_eq!(cache.len(), 1);
        assert!(cache.get(2).is_none());
    }
}
