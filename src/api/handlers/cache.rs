//! Handlers for cache administration.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::cache::PurgeResponse;
use crate::state::AppState;

/// Drops every cached record.
///
/// # Endpoint
///
/// `POST /api/cache/flush`
pub async fn flush_cache_handler(State(state): State<AppState>) -> StatusCode {
    state.links.flush_cache().await;
    StatusCode::NO_CONTENT
}

/// Removes expired records now instead of waiting for the sweeper.
///
/// # Endpoint
///
/// `POST /api/cache/purge`
///
/// # Response
///
/// ```json
/// { "removed": 12 }
/// ```
pub async fn purge_cache_handler(State(state): State<AppState>) -> Json<PurgeResponse> {
    let removed = state.links.purge_expired().await;
    Json(PurgeResponse { removed })
}
