//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, cache setup, the expiry sweeper and the Axum
//! server lifecycle.

use crate::application::services::CacheAsideStore;
use crate::config::Config;
use crate::infrastructure::cache::{LinkCache, MemoryCache, NullCache, spawn_sweeper};
use crate::infrastructure::persistence::{self, SqliteLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - SQLite connection pool
/// - Schema migrations (when enabled)
/// - In-memory cache (or NullCache when disabled) and its sweeper
/// - Axum HTTP server with graceful shutdown on Ctrl-C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = persistence::connect(
        &config.database_url,
        config.db_max_connections,
        Duration::from_secs(config.db_connect_timeout),
    )
    .await
    .context("Failed to connect to database")?;

    if config.db_run_migrations {
        persistence::run_migrations(&pool)
            .await
            .context("Failed to migrate")?;
    }

    let (cache, sweeper) = build_cache(&config);

    let repository = Arc::new(SqliteLinkRepository::new(Arc::new(pool.clone())));
    let links = Arc::new(CacheAsideStore::new(
        repository,
        cache,
        config.resolver_settings(),
    ));

    let state = AppState::new(links);
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Builds the cache selected by configuration and starts its sweeper.
fn build_cache(config: &Config) -> (Arc<dyn LinkCache>, Option<JoinHandle<()>>) {
    if !config.cache_enabled {
        tracing::info!("Cache disabled (NullCache)");
        return (Arc::new(NullCache::new()), None);
    }

    let cache: Arc<dyn LinkCache> = Arc::new(MemoryCache::new(config.cache_default_expiration()));
    tracing::info!("Cache enabled (in-memory)");

    let sweeper = match config.cache_purge_interval() {
        Some(interval) => Some(spawn_sweeper(cache.clone(), interval)),
        None => {
            tracing::info!("Cache sweeper disabled; expired records are dropped on read");
            None
        }
    };

    (cache, sweeper)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
