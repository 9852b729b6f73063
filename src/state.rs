//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::CacheAsideStore;
use crate::infrastructure::persistence::SqliteLinkRepository;

/// The cache-aside store as wired in production.
pub type LinkStore = CacheAsideStore<SqliteLinkRepository>;

#[derive(Clone)]
pub struct AppState {
    pub links: Arc<LinkStore>,
}

impl AppState {
    pub fn new(links: Arc<LinkStore>) -> Self {
        Self { links }
    }
}
