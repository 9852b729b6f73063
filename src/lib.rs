//! # Link Resolver
//!
//! A short link redirector with a cache-aside layer in front of SQLite.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Link entity and the durable store contract
//! - **Application Layer** ([`application`]) - The cache-aside store that resolves keys
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite persistence and the in-memory cache
//! - **API Layer** ([`api`]) - Redirect and link management handlers, DTOs, and middleware
//!
//! ## Request Flow
//!
//! `handler -> CacheAsideStore -> {MemoryCache, SqliteLinkRepository}`
//!
//! Reads hit the cache first and fall back to the store on a miss, populating
//! the cache with the answer (or with the fallback destination for unknown
//! keys). Writes go to the store first and update the cache only once the
//! store accepted them. A background sweeper drops expired cache records.
//!
//! ## Quick Start
//!
//! ```bash
//! export DATABASE_URL="sqlite://links.db"
//! cargo run
//!
//! # Manage links
//! cargo run --bin admin -- link create docs https://docs.example.com/
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::{AppError, StoreError};
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{CacheAsideStore, ResolverSettings};
    pub use crate::domain::entities::{Link, NewLink};
    pub use crate::domain::repositories::LinkRepository;
    pub use crate::error::{AppError, StoreError};
    pub use crate::infrastructure::cache::{Expiration, LinkCache, MemoryCache, NullCache};
    pub use crate::state::AppState;
}
