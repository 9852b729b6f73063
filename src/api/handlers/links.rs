//! Handlers for link management endpoints (create, read, update, delete).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkResponse, UpdateLinkRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "key": "docs", "destination": "https://docs.example.com/" }
/// ```
///
/// The link is written to the store first and cached only after the insert
/// succeeded.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 409 Conflict if the key already exists.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    state
        .links
        .create_link(&payload.key, &payload.destination)
        .await?;

    let link = state.links.find_link(&payload.key).await?.ok_or_else(|| {
        AppError::internal(
            "Link vanished right after creation",
            json!({ "key": payload.key }),
        )
    })?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Returns the stored entry for a key, read from the store.
///
/// # Endpoint
///
/// `GET /api/links/{key}`
///
/// # Errors
///
/// Returns 404 Not Found if the key does not exist.
pub async fn get_link_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state
        .links
        .find_link(&key)
        .await?
        .ok_or_else(|| AppError::not_found("Link not found", json!({ "key": key })))?;

    Ok(Json(link.into()))
}

/// Replaces the destination of a link.
///
/// # Endpoint
///
/// `PUT /api/links/{key}`
///
/// # Cache
///
/// The cached destination is overwritten after the update commits, so the
/// next redirect uses the new destination.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 404 Not Found if the key does not exist.
pub async fn update_link_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    state.links.update_link(&key, &payload.destination).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Deletes a link from the store and the cache.
///
/// # Endpoint
///
/// `DELETE /api/links/{key}`
///
/// The key becomes free for a new link; redirects for it fall back to the
/// fallback destination.
///
/// # Errors
///
/// Returns 404 Not Found if the key does not exist.
pub async fn delete_link_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.links.delete_link(&key).await?;

    Ok(StatusCode::NO_CONTENT)
}
