//! DTOs for link management endpoints.

use axum::http::HeaderValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::Link;

/// Request body for `POST /api/links`.
///
/// `key` may be empty: the empty key is what `GET /` resolves.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(max = 256, message = "Key must be at most 256 characters"))]
    pub key: String,

    #[validate(length(min = 1, max = 2048, message = "Destination must be 1-2048 characters"))]
    #[validate(custom(function = "validate_location"))]
    pub destination: String,
}

/// Request body for `PUT /api/links/{key}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "Destination must be 1-2048 characters"))]
    #[validate(custom(function = "validate_location"))]
    pub destination: String,
}

/// Destinations are sent back verbatim in the `Location` header, so they must
/// be valid header values (no control characters such as CR or LF).
fn validate_location(destination: &str) -> Result<(), ValidationError> {
    if HeaderValue::from_str(destination).is_err() {
        return Err(ValidationError::new("location")
            .with_message("Destination must be a valid Location header value".into()));
    }
    Ok(())
}

/// JSON representation of a stored link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub key: String,
    pub destination: String,
    pub hits: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            key: link.key,
            destination: link.destination,
            hits: link.hits,
            created_at: link.created_at,
        }
    }
}
