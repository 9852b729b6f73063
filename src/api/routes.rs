//! API route configuration.
//!
//! Link management and cache administration. Writes are not authenticated;
//! deploy behind a trusted network boundary.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, flush_cache_handler, get_link_handler,
    health_handler, purge_cache_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `GET    /health`        - Store connectivity and cache size
/// - `POST   /links`         - Create a link
/// - `GET    /links/{key}`   - Read a stored link
/// - `PUT    /links/{key}`   - Replace a link's destination
/// - `DELETE /links/{key}`   - Delete a link
/// - `POST   /cache/flush`   - Drop every cached record
/// - `POST   /cache/purge`   - Remove expired cached records now
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/links", post(create_link_handler))
        .route(
            "/links/{key}",
            get(get_link_handler)
                .put(update_link_handler)
                .delete(delete_link_handler),
        )
        .route("/cache/flush", post(flush_cache_handler))
        .route("/cache/purge", post(purge_cache_handler))
}
