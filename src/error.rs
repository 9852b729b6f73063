use std::time::Duration;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Errors produced by the durable link store.
///
/// Cache operations have no error type at all; every failure the core can
/// report originates here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No entry exists for the key.
    #[error("link '{0}' not found")]
    NotFound(String),

    /// A create hit the uniqueness constraint on the key.
    #[error("link '{0}' already exists")]
    Conflict(String),

    /// The driver reported success but no row was touched.
    #[error("{operation} for link '{key}' affected no rows")]
    WriteFailed { operation: &'static str, key: String },

    /// Connection, I/O or pool failure.
    #[error("link store unavailable: {0}")]
    Unavailable(String),

    /// The store did not answer within the configured bound.
    #[error("link store call timed out after {0:?}")]
    Timeout(Duration),
}

/// Maps a driver error for an operation on `key` into the store taxonomy.
pub fn map_sqlx_error(e: sqlx::Error, key: &str) -> StoreError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return StoreError::Conflict(key.to_string());
    }

    match e {
        sqlx::Error::RowNotFound => StoreError::NotFound(key.to_string()),
        other => StoreError::Unavailable(other.to_string()),
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    NotFound { message: String, details: Value },
    Conflict { message: String, details: Value },
    Unavailable { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => {
                AppError::not_found("Link not found", json!({ "key": key }))
            }
            StoreError::Conflict(key) => {
                AppError::conflict("Link already exists", json!({ "key": key }))
            }
            StoreError::WriteFailed { operation, key } => AppError::internal(
                "Write affected no rows",
                json!({ "operation": operation, "key": key }),
            ),
            StoreError::Unavailable(reason) => {
                AppError::unavailable("Link store unavailable", json!({ "reason": reason }))
            }
            StoreError::Timeout(after) => AppError::unavailable(
                "Link store timed out",
                json!({ "timeout_ms": after.as_millis() as u64 }),
            ),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&e).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Validation failed", details)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::Conflict { message, details } => {
                (StatusCode::CONFLICT, "conflict", message, details)
            }
            AppError::Unavailable { message, details } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "unavailable",
                message,
                details,
            ),
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}
