//! Error types and HTTP error response handling.
//!
//! Missing keys and already-revoked keys are ordinary negative outcomes and
//! never surface here; they are carried in the regular response payloads.
//! This module covers only the conditions that are real faults.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Malformed request bodies are rejected by the axum extractors before a
/// handler runs, so the only fault the service itself can raise is a failure
/// to synthesize a unique key.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Key synthesis produced a colliding key twice in a row.
    ///
    /// With 256 bits of entropy per key this is vanishingly unlikely and
    /// indicates a broken random source. Returns HTTP 500 with a generic
    /// message; the collision detail stays server-side.
    #[error("Failed to generate a unique API key")]
    KeyGeneration,
}

/// Convert AppError into an HTTP response.
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::KeyGeneration => {
                // Hide the internal detail from the client
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
