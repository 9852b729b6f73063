//! No-op cache implementation for disabled caching.

use super::service::{Expiration, LinkCache};
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Used when caching is explicitly disabled (`CACHE_ENABLED=false`): every
/// lookup misses, so every resolve goes to the store.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkCache for NullCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: &str, _expiration: Expiration) {}

    async fn delete(&self, _key: &str) {}

    async fn flush(&self) {}

    async fn purge_expired(&self) -> usize {
        0
    }

    fn len(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_cache_never_hits() {
        let cache = NullCache::new();

        cache.set("a", "value", Expiration::Never).await;

        assert_eq!(cache.get("a").await, None);
        assert!(cache.is_empty());
    }
}
