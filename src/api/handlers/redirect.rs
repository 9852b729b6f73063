//! Handlers for short link redirects.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short key to its destination.
///
/// # Endpoint
///
/// `GET /{link}`
///
/// # Request Flow
///
/// 1. Resolve the key through the cache-aside store (cache first, store on miss)
/// 2. Return 302 Found with the destination in `Location`
///
/// Unknown keys resolve to the configured fallback destination, so they are
/// redirected too.
///
/// # Errors
///
/// Returns 503 Service Unavailable if the link store fails or times out.
/// Returns 500 Internal Server Error if the stored destination is not a valid
/// `Location` value.
pub async fn redirect_handler(
    Path(link): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    redirect_to(&state, &link).await
}

/// Redirects the bare root path, which resolves the empty key.
///
/// # Endpoint
///
/// `GET /`
pub async fn redirect_root_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    redirect_to(&state, "").await
}

async fn redirect_to(state: &AppState, key: &str) -> Result<Response, AppError> {
    let destination = state.links.resolve(key).await?;

    let location = HeaderValue::from_str(&destination).map_err(|_| {
        AppError::internal(
            "Stored destination is not a valid Location header",
            json!({ "key": key }),
        )
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
