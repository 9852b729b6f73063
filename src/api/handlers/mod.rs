//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod cache;
pub mod health;
pub mod links;
pub mod redirect;

pub use cache::{flush_cache_handler, purge_cache_handler};
pub use health::health_handler;
pub use links::{create_link_handler, delete_link_handler, get_link_handler, update_link_handler};
pub use redirect::{redirect_handler, redirect_root_handler};
