//! Cache-aside coordination between the in-memory cache and the link store.
//!
//! # Consistency
//!
//! The store is always written first and the cache is only touched after the
//! durable write succeeded, so the cache never shows a value that was not
//! committed. Reads take no lock across the lookup -> populate step: a resolve
//! that read an old destination can populate the cache after a concurrent
//! update already set the new one. That window is accepted; it is bounded by
//! the record's expiry and closed by the next write of the same key.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tracing::{debug, info, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::StoreError;
use crate::infrastructure::cache::{Expiration, LinkCache};

/// Policy knobs for [`CacheAsideStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Destination returned (and cached) for keys missing from the store.
    pub fallback_destination: String,
    /// Lifetime of cached fallbacks; `None` uses the cache default.
    /// `Some(Duration::ZERO)` keeps them until flushed or overwritten.
    pub negative_cache_ttl: Option<Duration>,
    /// Upper bound for every store call.
    pub store_timeout: Duration,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            fallback_destination: "/".to_string(),
            negative_cache_ttl: None,
            store_timeout: Duration::from_secs(5),
        }
    }
}

/// Resolves short keys through the cache and keeps it in step with the store.
///
/// One instance is shared by every request handler (behind an `Arc`); it holds
/// no lock of its own, so calls for different keys never wait on each other.
pub struct CacheAsideStore<R: LinkRepository> {
    repository: Arc<R>,
    cache: Arc<dyn LinkCache>,
    settings: ResolverSettings,
}

impl<R: LinkRepository> CacheAsideStore<R> {
    /// Creates a new store over `repository`, caching into `cache`.
    pub fn new(repository: Arc<R>, cache: Arc<dyn LinkCache>, settings: ResolverSettings) -> Self {
        Self {
            repository,
            cache,
            settings,
        }
    }

    /// Returns the destination for `key`.
    ///
    /// Served from the cache when possible. On a miss the store is queried and
    /// the answer cached; a key the store does not know resolves to the
    /// fallback destination, which is cached as well so repeated lookups of an
    /// unknown key do not reach the store again.
    ///
    /// # Errors
    ///
    /// Any store error other than [`StoreError::NotFound`] (including
    /// [`StoreError::Timeout`]) is returned as is, and nothing is cached.
    pub async fn resolve(&self, key: &str) -> Result<String, StoreError> {
        if let Some(destination) = self.cache.get(key).await {
            debug!("Cache HIT for [{}]: {}", key, destination);
            counter!("link_cache_hits_total").increment(1);
            return Ok(destination);
        }

        debug!("Cache MISS for [{}]", key);
        counter!("link_cache_misses_total").increment(1);

        match self.bounded(self.repository.lookup(key)).await {
            Ok(destination) => {
                self.cache.set(key, &destination, Expiration::Default).await;
                Ok(destination)
            }
            Err(StoreError::NotFound(_)) => {
                counter!("link_cache_negative_total").increment(1);
                let fallback = self.settings.fallback_destination.clone();
                self.cache.set(key, &fallback, self.negative_expiration()).await;
                Ok(fallback)
            }
            Err(e) => {
                warn!(error = %e, key, "Link lookup failed");
                Err(e)
            }
        }
    }

    /// Stores a new link and caches its destination.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the key exists,
    /// [`StoreError::WriteFailed`] if no row was inserted, or any
    /// availability error. The cache is untouched on error.
    pub async fn create_link(&self, key: &str, destination: &str) -> Result<(), StoreError> {
        self.bounded(self.repository.create(NewLink::new(key, destination))).await?;
        self.cache.set(key, destination, Expiration::Default).await;
        info!(key, destination, "Link created");
        Ok(())
    }

    /// Changes the destination of an existing link and refreshes the cache.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the key does not exist, or any
    /// availability error. The cache is untouched on error.
    pub async fn update_link(&self, key: &str, destination: &str) -> Result<(), StoreError> {
        self.bounded(self.repository.update(key, destination)).await?;
        self.cache.set(key, destination, Expiration::Default).await;
        info!(key, destination, "Link updated");
        Ok(())
    }

    /// Deletes a link from the store, then from the cache.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the key does not exist, or any
    /// availability error. The cache is untouched on error.
    pub async fn delete_link(&self, key: &str) -> Result<(), StoreError> {
        self.bounded(self.repository.delete(key)).await?;
        self.cache.delete(key).await;
        info!(key, "Link deleted");
        Ok(())
    }

    /// Reads the full durable entry, bypassing the cache.
    pub async fn find_link(&self, key: &str) -> Result<Option<Link>, StoreError> {
        self.bounded(self.repository.find(key)).await
    }

    /// Drops every cached record; later reads repopulate from the store.
    pub async fn flush_cache(&self) {
        self.cache.flush().await;
        info!("Cache flushed");
    }

    /// Runs an expiry sweep now, independent of the background timer.
    pub async fn purge_expired(&self) -> usize {
        let removed = self.cache.purge_expired().await;
        counter!("link_cache_purged_total").increment(removed as u64);
        info!("Cache purge: removed {} expired records", removed);
        removed
    }

    /// Number of cached records.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Probes the store under the same timeout as regular calls.
    pub async fn store_health(&self) -> Result<(), StoreError> {
        self.bounded(self.repository.ping()).await
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    fn negative_expiration(&self) -> Expiration {
        self.settings
            .negative_cache_ttl
            .map(Expiration::from_duration)
            .unwrap_or_default()
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        let result = match tokio::time::timeout(self.settings.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.settings.store_timeout)),
        };

        if let Err(e) = &result
            && !matches!(e, StoreError::NotFound(_))
        {
            counter!("link_store_errors_total").increment(1);
        }

        result
    }
}
