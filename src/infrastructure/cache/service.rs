//! Cache trait and expiry policy.

use async_trait::async_trait;
use std::time::Duration;

/// Lifetime requested for a record on [`LinkCache::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiration {
    /// Use the cache's configured default expiration.
    #[default]
    Default,
    /// Keep the record until it is deleted, flushed or overwritten.
    Never,
    /// Expire the record this long after it was set.
    After(Duration),
}

impl Expiration {
    /// Converts a configured duration, treating zero as "never expire".
    pub fn from_duration(duration: Duration) -> Self {
        if duration.is_zero() {
            Self::Never
        } else {
            Self::After(duration)
        }
    }
}

/// Trait for caching short link destinations in front of the durable store.
///
/// # Invariant
///
/// Cache operations never fail. A miss, an expired record and a key that was
/// never cached all look the same to callers (`None`), and every mutation
/// completes unconditionally. The cache is volatile and can always be rebuilt
/// from the store, so callers never have to reconcile a cache failure.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::MemoryCache`] - sharded in-memory cache
/// - [`crate::infrastructure::cache::NullCache`] - no-op implementation for disabled caching
#[async_trait]
pub trait LinkCache: Send + Sync {
    /// Returns the cached value if the key is present and unexpired.
    async fn get(&self, key: &str) -> Option<String>;

    /// Inserts or overwrites a record, restarting its expiry timer.
    async fn set(&self, key: &str, value: &str, expiration: Expiration);

    /// Removes a record. Absent keys are ignored.
    async fn delete(&self, key: &str);

    /// Removes every record in one step; concurrent readers see either the
    /// full cache or an empty one.
    async fn flush(&self);

    /// Removes every record whose expiry has passed and returns how many were
    /// dropped.
    async fn purge_expired(&self) -> usize;

    /// Number of records held, including expired records not yet swept.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
