use moka::future::Cache;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CachedEntry {
    value: Arc<Value>,
    stored_at: Instant,
}

impl CachedEntry {
    fn new(value: Value) -> Self {
        Self {
            value: Arc::new(value),
            stored_at: Instant::now(),
        }
    }
}

/// In-memory result cache with TTL and request coalescing
///
/// Holds computed endpoint payloads as JSON. Entries expire `ttl` after they
/// were stored. Concurrent `get_or_compute` calls for the same key share one
/// in-flight computation; a failed computation is not cached.
pub struct ResultCache {
    entries: Cache<String, CachedEntry>,
    ttl: Duration,
}

impl ResultCache {
    /// Create a new result cache
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        tracing::info!(
            "Result cache initialized (TTL: {}s, capacity: {} entries)",
            ttl.as_secs(),
            max_entries
        );

        Self { entries, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a fresh value, `None` if missing or expired
    pub async fn get(&self, key: &str) -> Option<Arc<Value>> {
        match self.entries.get(key).await {
            Some(entry) => {
                tracing::debug!(
                    "Cache HIT: '{}' (age: {:.1}s)",
                    key,
                    entry.stored_at.elapsed().as_secs_f64()
                );
                Some(entry.value)
            }
            None => {
                tracing::debug!("Cache MISS: '{}'", key);
                None
            }
        }
    }

    /// Store a value, replacing any previous entry
    pub async fn set(&self, key: &str, value: Value) {
        self.entries
            .insert(key.to_string(), CachedEntry::new(value))
            .await;
        tracing::debug!("Cache SET: '{}' cached for {}s", key, self.ttl.as_secs());
    }

    /// Get a value or compute it, with at most one computation in flight per key
    pub async fn get_or_compute<F, Fut, E>(&self, key: &str, compute: F) -> Result<Arc<Value>, Arc<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
        E: Send + Sync + 'static,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        let entry = self
            .entries
            .try_get_with(key.to_string(), async move {
                tracing::info!("Computing value for '{}'", key);
                compute().await.map(CachedEntry::new)
            })
            .await?;

        Ok(entry.value)
    }

    /// Remove one entry, or every entry when `key` is `None`
    pub async fn clear(&self, key: Option<&str>) {
        match key {
            Some(key) => {
                self.entries.invalidate(key).await;
                tracing::info!("Cache CLEARED: '{}' removed", key);
            }
            None => {
                self.entries.invalidate_all();
                self.entries.run_pending_tasks().await;
                tracing::info!("Cache CLEARED: all entries removed");
            }
        }
    }

    /// Evict expired entries now; returns how many were removed
    ///
    /// Writes not yet applied by a previous maintenance pass are not counted.
    pub async fn cleanup_expired(&self) -> u64 {
        let before = self.entries.entry_count();
        self.entries.run_pending_tasks().await;
        let removed = before.saturating_sub(self.entries.entry_count());

        if removed > 0 {
            tracing::info!("Cache CLEANUP: removed {} expired entries", removed);
        }
        removed
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        self.entries.run_pending_tasks().await;

        let ttl = self.ttl.as_secs_f64();
        let mut entries: Vec<CacheEntryStats> = self
            .entries
            .iter()
            .map(|(key, entry)| {
                let age = entry.stored_at.elapsed().as_secs_f64();
                CacheEntryStats {
                    key: key.as_ref().clone(),
                    age_seconds: round_tenths(age),
                    ttl_remaining: round_tenths((ttl - age).max(0.0)),
                }
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        CacheStats {
            total_entries: entries.len(),
            ttl_seconds: self.ttl.as_secs(),
            entries,
        }
    }
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub ttl_seconds: u64,
    pub entries: Vec<CacheEntryStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntryStats {
    pub key: String,
    pub age_seconds: f64,
    pub ttl_remaining: f64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    pub const STRENGTH: &'static str = "strength";
    pub const SCHEDULE_STRENGTH: &'static str = "schedule_strength";
    pub const FOR_AGAINST: &'static str = "for_against";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_cache_set_get() {
        let cache = ResultCache::new(16, Duration::from_secs(60));

        cache.set("key", json!({"teams": ["A"]})).await;
        let value = cache.get("key").await.unwrap();
        assert_eq!(value["teams"][0], "A");

        cache.clear(Some("key")).await;
        assert!(cache.get("key").await.is_none());
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache = ResultCache::new(16, Duration::from_millis(100));

        cache.set("key", json!(1)).await;
        assert!(cache.get("key").await.is_some());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(cache.get("key").await.is_none());
    }

    #[tokio::test]
    async fn test_get_or_compute_coalesces_concurrent_calls() {
        let cache = ResultCache::new(16, Duration::from_secs(60));
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let compute = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, std::io::Error>(json!({"computed": true}))
        };

        let (a, b, c, d) = tokio::join!(
            cache.get_or_compute("strength", compute),
            cache.get_or_compute("strength", compute),
            cache.get_or_compute("strength", compute),
            cache.get_or_compute("strength", compute),
        );

        for result in [a, b, c, d] {
            assert_eq!(result.unwrap()["computed"], true);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Served from cache afterwards
        cache.get_or_compute("strength", compute).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_computation_is_not_cached() {
        let cache = ResultCache::new(16, Duration::from_secs(60));

        let failed = cache
            .get_or_compute("key", || async {
                Err::<Value, _>(std::io::Error::new(std::io::ErrorKind::Other, "feed down"))
            })
            .await;
        assert_eq!(failed.unwrap_err().to_string(), "feed down");

        let value = cache
            .get_or_compute("key", || async { Ok::<_, std::io::Error>(json!(42)) })
            .await
            .unwrap();
        assert_eq!(*value, json!(42));
    }

    #[tokio::test]
    async fn test_stats_and_clear_all() {
        let cache = ResultCache::new(16, Duration::from_secs(120));
        cache.set(CacheKey::STRENGTH, json!(1)).await;
        cache.set(CacheKey::FOR_AGAINST, json!(2)).await;

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.ttl_seconds, 120);
        assert_eq!(stats.entries[0].key, "for_against");
        assert!(stats.entries[0].ttl_remaining <= 120.0);

        cache.clear(None).await;
        assert!(cache.get(CacheKey::STRENGTH).await.is_none());
        assert_eq!(cache.stats().await.total_entries, 0);
    }
    #[tokio::test]
    async fn test_cleanup_expired_counts_evictions() {
        let cache = ResultCache::new(16, Duration::from_millis(100));
        cache.set(CacheKey::STRENGTH, json!(1)).await;
        cache.set(CacheKey::SCHEDULE_STRENGTH, json!(2)).await;
        assert_eq!(cache.stats().await.total_entries, 2);

        // Nothing has expired yet
        assert_eq!(cache.cleanup_expired().await, 0);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(cache.cleanup_expired().await, 2);
        assert_eq!(cache.cleanup_expired().await, 0);
        assert_eq!(cache.stats().await.total_entries, 0);
    }
}
