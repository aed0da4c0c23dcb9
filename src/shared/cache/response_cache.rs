use crate::shared::errors::AppResult;
use crate::{log_debug, log_info};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cached entry with TTL support
#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Value,
    tag: String,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn new(payload: Value, tag: String, ttl: Duration) -> Self {
        Self {
            payload,
            tag,
            created_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries_count: usize,
    pub tag_evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

/// Tagged response cache: read endpoints park their serialized payloads here,
/// write endpoints evict an entire tag group after commit.
pub trait ResponseCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn insert(&self, key: &str, tag: &str, payload: Value) -> AppResult<()>;

    /// Remove every entry carrying `tag`, unconditionally. Returns the number
    /// of entries evicted.
    fn evict_tag(&self, tag: &str) -> usize;

    fn stats(&self) -> CacheStats;
}

/// In-process implementation over a concurrent map with TTL support
#[derive(Debug)]
pub struct MemoryResponseCache {
    cache: Arc<DashMap<String, CacheEntry>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    tag_evictions: Arc<AtomicU64>,
    default_ttl: Duration,
    max_entries: usize,
}

impl MemoryResponseCache {
    pub fn new(default_ttl_minutes: u64, max_entries: usize) -> Self {
        Self {
            cache: Arc::new(DashMap::new()),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            tag_evictions: Arc::new(AtomicU64::new(0)),
            default_ttl: Duration::from_secs(default_ttl_minutes * 60),
            max_entries,
        }
    }

    /// Drop expired entries; called opportunistically before inserts
    fn cleanup_expired(&self) {
        let expired_keys: Vec<String> = self
            .cache
            .iter()
            .filter(|entry| entry.value().is_expired())
            .map(|entry| entry.key().clone())
            .collect();

        for key in expired_keys {
            self.cache.remove(&key);
        }
    }

    pub fn clear(&self) {
        self.cache.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.tag_evictions.store(0, Ordering::Relaxed);
        log_info!("Response cache cleared");
    }
}

impl Default for MemoryResponseCache {
    /// 5 minute TTL, 1000 entries
    fn default() -> Self {
        Self::new(5, 1000)
    }
}

impl ResponseCache for MemoryResponseCache {
    fn get(&self, key: &str) -> Option<Value> {
        if let Some(entry) = self.cache.get(key) {
            if !entry.is_expired() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                log_debug!("Cache hit for key: {}", key);
                return Some(entry.payload.clone());
            }
        }

        // Expired entries are removed lazily on read
        self.cache.remove_if(key, |_, entry| entry.is_expired());

        self.misses.fetch_add(1, Ordering::Relaxed);
        log_debug!("Cache miss for key: {}", key);
        None
    }

    fn insert(&self, key: &str, tag: &str, payload: Value) -> AppResult<()> {
        if self.cache.len() >= self.max_entries {
            self.cleanup_expired();
        }
        if self.cache.len() >= self.max_entries {
            // Still full of live entries; skip caching rather than evict hot data
            log_debug!("Cache full ({} entries), skipping key: {}", self.cache.len(), key);
            return Ok(());
        }

        let entry = CacheEntry::new(payload, tag.to_string(), self.default_ttl);
        self.cache.insert(key.to_string(), entry);
        log_debug!("Cached response for key: {} (tag: {})", key, tag);
        Ok(())
    }

    fn evict_tag(&self, tag: &str) -> usize {
        let keys: Vec<String> = self
            .cache
            .iter()
            .filter(|entry| entry.value().tag == tag)
            .map(|entry| entry.key().clone())
            .collect();

        let evicted = keys.len();
        for key in keys {
            self.cache.remove(&key);
        }

        self.tag_evictions.fetch_add(1, Ordering::Relaxed);
        log_debug!("Evicted {} cache entries for tag: {}", evicted, tag);
        evicted
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries_count: self.cache.len(),
            tag_evictions: self.tag_evictions.load(Ordering::Relaxed),
        }
    }
}
