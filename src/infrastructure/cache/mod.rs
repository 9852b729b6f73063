//! In-process caching layer for fast redirect lookups.
//!
//! Provides a [`LinkCache`] trait with two implementations:
//! - [`MemoryCache`] - Sharded in-memory cache with per-record expiry
//! - [`NullCache`] - No-op implementation for disabled caching
//!
//! Expired records are removed lazily on read and by the background task
//! started with [`spawn_sweeper`].

mod memory_cache;
mod null_cache;
mod service;
mod sweeper;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use service::{Expiration, LinkCache};
pub use sweeper::spawn_sweeper;
