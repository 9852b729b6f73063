//! Application layer services implementing business logic.
//!
//! Services consume repository and cache traits and provide a clean API for
//! HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::cache_aside_store::CacheAsideStore`] - Link resolution and
//!   write-through updates over the cache and the durable store

pub mod services;
