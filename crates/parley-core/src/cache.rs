//! TTL response cache.
//!
//! Memoizes agent replies keyed by a SHA-256 digest of
//! `"{agent}:{task}:{content}"` so identical requests skip the pipeline.
//! Expired entries are removed lazily on lookup and in bulk by
//! [`ResponseCache::clear_expired`]. When full, the entry with the oldest
//! creation time is evicted before a new key is inserted.
//!
//! Process-lifetime only: the cache starts empty on every restart.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::time::Instant;

use parley_types::config::CacheConfig;

struct CacheEntry {
    response: String,
    created_at: Instant,
}

/// Bounded, TTL-based cache of agent responses.
///
/// All operations serialize through one mutex. Eviction is a linear scan,
/// which is fine for the bounded sizes this cache is configured with.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    max_size: usize,
    ttl: Duration,
}

/// Derive the cache key for a request.
///
/// Digest collisions are treated as hits; with SHA-256 they are not a
/// practical concern.
pub fn cache_key(agent: &str, task: &str, content: &str) -> String {
    let digest = Sha256::digest(format!("{agent}:{task}:{content}").as_bytes());
    format!("{digest:x}")
}

impl ResponseCache {
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_size,
            ttl,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_size, config.ttl())
    }

    /// Look up a cached response.
    ///
    /// An entry whose age has reached the TTL is deleted and reported absent.
    pub fn get(&self, agent: &str, task: &str, content: &str) -> Option<String> {
        let key = cache_key(agent, task, content);
        let mut entries = self.entries.lock().expect("response cache lock poisoned");

        let expired = match entries.get(&key) {
            Some(entry) if entry.created_at.elapsed() < self.ttl => {
                tracing::debug!(agent, task, "cache hit");
                return Some(entry.response.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.remove(&key);
            tracing::debug!(agent, task, "cache entry expired");
        }
        None
    }

    /// Store a response, evicting the oldest entry if a new key would
    /// overflow the cache.
    pub fn set(&self, agent: &str, task: &str, content: &str, response: &str) {
        if self.max_size == 0 {
            return;
        }

        let key = cache_key(agent, task, content);
        let mut entries = self.entries.lock().expect("response cache lock poisoned");

        if entries.len() >= self.max_size && !entries.contains_key(&key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.created_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
                tracing::debug!("evicted oldest cache entry");
            }
        }

        entries.insert(
            key,
            CacheEntry {
                response: response.to_string(),
                created_at: Instant::now(),
            },
        );
        tracing::debug!(agent, task, "cached response");
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().expect("response cache lock poisoned").clear();
        tracing::debug!("cache cleared");
    }

    /// Drop only entries whose age has reached the TTL. Returns how many were removed.
    pub fn clear_expired(&self) -> usize {
        let mut entries = self.entries.lock().expect("response cache lock poisoned");
        let before = entries.len();
        entries.retain(|_, entry| entry.created_at.elapsed() < self.ttl);
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, "cleared expired cache entries");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("response cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrent_writers_respect_capacity() {
        let cache = ResponseCache::new(10, HOUR);
        std::thread::scope(|scope| {
            for t in 0..8 {
                let cache = &cache;
                scope.spawn(move || {
                    for i in 0..25 {
                        let content = format!("{t}-{i}");
                        cache.set("bot", "greet", &content, "reply");
                        cache.get("bot", "greet", &content);
                    }
                });
            }
        });
        assert_eq!(cache.len(), 10);
    }

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_cache_key_is_stable_sha256_hex() {
        let a = cache_key("bot", "greet", "hi");
        let b = cache_key("bot", "greet", "hi");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, cache_key("bot", "greet", "yo"));
        // Empty input digests to the well-known SHA-256 of "::".
        assert_eq!(cache_key("", "", ""), format!("{:x}", Sha256::digest(b"::")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_returns_stored_response() {
        let cache = ResponseCache::new(10, HOUR);
        assert!(cache.get("bot", "greet", "hi").is_none());
        cache.set("bot", "greet", "hi", "hello!");
        assert_eq!(cache.get("bot", "greet", "hi").as_deref(), Some("hello!"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_oldest_entry_evicted_at_capacity() {
        let cache = ResponseCache::new(2, HOUR);
        cache.set("bot", "greet", "hi", "r1");
        tokio::time::advance(Duration::from_millis(5)).await;
        cache.set("bot", "greet", "yo", "r2");
        tokio::time::advance(Duration::from_millis(5)).await;
        cache.set("bot", "greet", "sup", "r3");

        assert_eq!(cache.len(), 2);
        assert!(cache.get("bot", "greet", "hi").is_none());
        assert_eq!(cache.get("bot", "greet", "yo").as_deref(), Some("r2"));
        assert_eq!(cache.get("bot", "greet", "sup").as_deref(), Some("r3"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_at_capacity_keeps_other_entries() {
        let cache = ResponseCache::new(2, HOUR);
        cache.set("bot", "greet", "hi", "r1");
        tokio::time::advance(Duration::from_millis(5)).await;
        cache.set("bot", "greet", "yo", "r2");
        tokio::time::advance(Duration::from_millis(5)).await;
        cache.set("bot", "greet", "yo", "r2b");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("bot", "greet", "hi").as_deref(), Some("r1"));
        assert_eq!(cache.get("bot", "greet", "yo").as_deref(), Some("r2b"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_absent_once_ttl_reached_and_removed() {
        let cache = ResponseCache::new(10, Duration::from_secs(60));
        cache.set("bot", "greet", "hi", "hello");

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get("bot", "greet", "hi").is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("bot", "greet", "hi").is_none());
        assert_eq!(cache.len(), 0, "expired entry should be deleted by the read");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_expired_only_removes_stale() {
        let cache = ResponseCache::new(10, Duration::from_secs(60));
        cache.set("bot", "greet", "old", "1");
        tokio::time::advance(Duration::from_secs(45)).await;
        cache.set("bot", "greet", "new", "2");
        tokio::time::advance(Duration::from_secs(20)).await;

        assert_eq!(cache.clear_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("bot", "greet", "new").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_empties_cache() {
        let cache = ResponseCache::new(10, HOUR);
        cache.set("bot", "a", "x", "1");
        cache.set("bot", "b", "x", "2");
        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_capacity_stores_nothing() {
        let cache = ResponseCache::new(0, HOUR);
        cache.set("bot", "greet", "hi", "hello");
        assert!(cache.is_empty());
    }
}
