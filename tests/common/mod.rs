#![allow(dead_code)]

use link_resolver::application::services::{CacheAsideStore, ResolverSettings};
use link_resolver::infrastructure::cache::{LinkCache, MemoryCache};
use link_resolver::infrastructure::persistence::{SqliteLinkRepository, run_migrations};
use link_resolver::state::{AppState, LinkStore};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use std::time::Duration;

/// Opens a private in-memory database with the schema applied.
///
/// The pool holds a single connection that is never recycled; the database
/// lives exactly as long as that connection.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    run_migrations(&pool).await.unwrap();
    pool
}

pub async fn create_test_link(pool: &SqlitePool, key: &str, destination: &str) {
    sqlx::query("INSERT INTO shortlinks (shortpath, destination, hits, created) VALUES (?, ?, 0, 0)")
        .bind(key)
        .bind(destination)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn count_links(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM shortlinks")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn test_settings() -> ResolverSettings {
    ResolverSettings {
        fallback_destination: "/".to_string(),
        negative_cache_ttl: None,
        store_timeout: Duration::from_secs(5),
    }
}

pub fn create_test_store(pool: SqlitePool, cache: Arc<dyn LinkCache>) -> Arc<LinkStore> {
    let repository = Arc::new(SqliteLinkRepository::new(Arc::new(pool)));
    Arc::new(CacheAsideStore::new(repository, cache, test_settings()))
}

pub fn create_test_state(pool: SqlitePool) -> AppState {
    let cache = Arc::new(MemoryCache::new(Duration::from_secs(300)));
    AppState::new(create_test_store(pool, cache))
}
