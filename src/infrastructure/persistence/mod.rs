//! SQLite repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! parameterised runtime queries.
//!
//! # Repositories
//!
//! - [`SqliteLinkRepository`] - Link storage and retrieval
//!
//! Pool construction and schema migrations live in [`pool`].

pub mod pool;
pub mod sqlite_link_repository;

pub use pool::{connect, run_migrations};
pub use sqlite_link_repository::SqliteLinkRepository;
