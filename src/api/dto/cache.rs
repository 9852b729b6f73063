//! DTOs for cache administration endpoints.

use serde::Serialize;

/// Response for `POST /api/cache/purge`.
#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub removed: usize,
}
