//! Repository trait for durable short link storage.

use crate::domain::entities::{Link, NewLink};
use crate::error::StoreError;
use async_trait::async_trait;

/// Durable CRUD for short links; the source of truth behind the cache.
///
/// Every mutating call is a single-row atomic statement. Implementations never
/// substitute a fallback destination: a missing key is reported as
/// [`StoreError::NotFound`] and the caller decides what to do with it.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteLinkRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Returns the destination stored for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no entry exists for the key.
    /// Returns [`StoreError::Unavailable`] on database errors.
    async fn lookup(&self, key: &str) -> Result<String, StoreError>;

    /// Returns the full entry for `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on database errors.
    async fn find(&self, key: &str) -> Result<Option<Link>, StoreError>;

    /// Inserts a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the key already exists.
    /// Returns [`StoreError::WriteFailed`] if the insert reported no affected rows.
    /// Returns [`StoreError::Unavailable`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<(), StoreError>;

    /// Replaces the destination of an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no row matched `key`.
    /// Returns [`StoreError::Unavailable`] on database errors.
    async fn update(&self, key: &str, destination: &str) -> Result<(), StoreError>;

    /// Removes an entry, releasing its key for reuse.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no row matched `key`.
    /// Returns [`StoreError::Unavailable`] on database errors.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Checks that the store answers queries.
    async fn ping(&self) -> Result<(), StoreError>;
}
