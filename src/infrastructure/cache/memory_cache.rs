//! Sharded in-memory cache with per-record expiry.

use super::service::{Expiration, LinkCache};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// A cached destination with its expiry metadata.
#[derive(Debug, Clone)]
struct CacheRecord {
    value: String,
    inserted_at: Instant,
    expires_at: Option<Instant>,
}

impl CacheRecord {
    fn new(value: String, now: Instant, lifetime: Option<Duration>) -> Self {
        Self {
            value,
            inserted_at: now,
            expires_at: lifetime.map(|d| now + d),
        }
    }

    /// A record is expired once `now` reaches its expiry instant.
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// In-memory cache for resolved link destinations.
///
/// Records live in a [`DashMap`], so reads and writes on unrelated keys only
/// contend on their own shard. A separate gate is held shared by every per-key
/// operation and exclusively by [`LinkCache::flush`], which makes a flush
/// atomic for readers.
///
/// Expiry is checked on every read, so an expired record is never returned even
/// if the sweeper has not reached it yet. The sweep itself only takes shard
/// locks: the records it removes are already invisible to `get`.
pub struct MemoryCache {
    records: DashMap<String, CacheRecord>,
    gate: RwLock<()>,
    default_expiration: Option<Duration>,
}

impl MemoryCache {
    /// Creates a cache whose records expire `default_expiration` after being
    /// set. A zero duration disables expiry for [`Expiration::Default`].
    pub fn new(default_expiration: Duration) -> Self {
        debug!(
            "Using MemoryCache (default expiration: {:?})",
            default_expiration
        );
        Self {
            records: DashMap::new(),
            gate: RwLock::new(()),
            default_expiration: (!default_expiration.is_zero()).then_some(default_expiration),
        }
    }

    fn lifetime(&self, expiration: Expiration) -> Option<Duration> {
        match expiration {
            Expiration::Default => self.default_expiration,
            Expiration::Never => None,
            Expiration::After(d) => Some(d),
        }
    }
}

#[async_trait]
impl LinkCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let _shared = self.gate.read().await;
        let now = Instant::now();

        let record = self.records.get(key)?;
        if !record.is_expired(now) {
            return Some(record.value.clone());
        }
        drop(record);

        // A concurrent set may have replaced the record since the read above.
        self.records.remove_if(key, |_, r| r.is_expired(now));
        None
    }

    async fn set(&self, key: &str, value: &str, expiration: Expiration) {
        let _shared = self.gate.read().await;
        let record = CacheRecord::new(
            value.to_string(),
            Instant::now(),
            self.lifetime(expiration),
        );
        debug!(
            "Cache SET: {} -> {} (expires in {:?})",
            key,
            value,
            record.expires_at.map(|at| at - record.inserted_at)
        );
        self.records.insert(key.to_string(), record);
    }

    async fn delete(&self, key: &str) {
        let _shared = self.gate.read().await;
        if self.records.remove(key).is_some() {
            debug!("Cache DELETE: {}", key);
        }
    }

    async fn flush(&self) {
        let _exclusive = self.gate.write().await;
        let dropped = self.records.len();
        self.records.clear();
        debug!("Cache FLUSH: dropped {} records", dropped);
    }

    async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        self.records.retain(|_, record| {
            let keep = !record.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });

        removed
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::timeout;

    #[tokio::test(start_paused = true)]
    async fn test_set_and_get() {
        let cache = MemoryCache::new(Duration::from_secs(60));

        cache.set("a", "https://x.example/", Expiration::Default).await;

        assert_eq!(cache.get("a").await, Some("https://x.example/".to_string()));
        assert_eq!(cache.get("b").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_resets_expiry() {
        let cache = MemoryCache::new(Duration::from_secs(10));

        cache.set("a", "old", Expiration::Default).await;
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.set("a", "new", Expiration::Default).await;
        tokio::time::advance(Duration::from_secs(8)).await;

        assert_eq!(cache.get("a").await, Some("new".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_record_is_not_returned() {
        let cache = MemoryCache::new(Duration::from_secs(10));

        cache.set("a", "value", Expiration::Default).await;
        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(cache.get("a").await.is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("a").await, None);
        assert_eq!(cache.len(), 0, "expired record should be removed on read");
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_default_expiration_never_expires() {
        let cache = MemoryCache::new(Duration::ZERO);

        cache.set("a", "value", Expiration::Default).await;
        tokio::time::advance(Duration::from_secs(365 * 24 * 3600)).await;

        assert_eq!(cache.get("a").await, Some("value".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_expiration_overrides_default() {
        let cache = MemoryCache::new(Duration::from_secs(3600));

        cache
            .set("short", "v", Expiration::After(Duration::from_secs(1)))
            .await;
        cache.set("pinned", "v", Expiration::Never).await;
        tokio::time::advance(Duration::from_secs(7200)).await;

        assert_eq!(cache.get("short").await, None);
        assert_eq!(cache.get("pinned").await, Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_noop() {
        let cache = MemoryCache::new(Duration::from_secs(60));

        cache.delete("missing").await;
        cache.set("a", "1", Expiration::Default).await;
        cache.delete("a").await;

        assert_eq!(cache.get("a").await, None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_flush_clears_everything() {
        let cache = MemoryCache::new(Duration::from_secs(60));

        for i in 0..100 {
            cache.set(&format!("k{i}"), "v", Expiration::Default).await;
        }
        cache.flush().await;

        assert!(cache.is_empty());
        assert_eq!(cache.get("k0").await, None);
        assert_eq!(cache.get("k99").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired_only_removes_expired() {
        let cache = MemoryCache::new(Duration::from_secs(10));

        cache.set("old1", "v", Expiration::Default).await;
        cache.set("old2", "v", Expiration::Default).await;
        cache.set("pinned", "v", Expiration::Never).await;
        tokio::time::advance(Duration::from_secs(5)).await;
        cache.set("fresh", "v", Expiration::Default).await;
        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(cache.purge_expired().await, 2);
        assert_eq!(cache.len(), 2);
        assert!(cache.get("fresh").await.is_some());
        assert!(cache.get("pinned").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_gate_holds_back_reads_and_writes() {
        let cache = Arc::new(MemoryCache::new(Duration::from_secs(60)));
        cache.set("seeded", "v", Expiration::Default).await;

        let exclusive = cache.gate.write().await;

        let mut reader = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get("seeded").await })
        };
        let mut writer = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.set("added", "v", Expiration::Default).await })
        };

        assert!(timeout(Duration::from_secs(1), &mut reader).await.is_err());
        assert!(timeout(Duration::from_secs(1), &mut writer).await.is_err());
        assert!(!cache.records.contains_key("added"));

        // Clear while holding the gate, the way flush does.
        cache.records.clear();
        drop(exclusive);

        assert_eq!(reader.await.unwrap(), None);
        writer.await.unwrap();
        assert_eq!(cache.get("added").await, Some("v".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_access_with_flush() {
        let cache = Arc::new(MemoryCache::new(Duration::from_secs(60)));
        let mut handles = Vec::new();

        for task in 0..8 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..200 {
                    let key = format!("{task}-{i}");
                    cache.set(&key, "v", Expiration::Default).await;
                    let _ = cache.get(&key).await;
                    if i % 50 == 0 {
                        cache.flush().await;
                    }
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        cache.flush().await;
        assert!(cache.is_empty());
    }
}
