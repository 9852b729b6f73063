//! Business logic services for the application layer.

pub mod cache_aside_store;

pub use cache_aside_store::{CacheAsideStore, ResolverSettings};
