//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic.
//!
//! # Entity Types
//!
//! - [`Link`] - A durable short link entry
//! - [`NewLink`] - Input for creating a link

pub mod link;

pub use link::{Link, NewLink};
