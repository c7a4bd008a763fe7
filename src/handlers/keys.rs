//! API key lifecycle HTTP handlers.
//!
//! This module implements the key management endpoints:
//! - POST /api/v1/keys - Generate a new API key
//! - POST /api/v1/keys/validate - Validate an API key
//! - POST /api/v1/keys/revoke - Revoke an API key
//! - GET /api/v1/keys - List keys for an owner (redacted)
//!
//! Handlers only translate between the wire format and the key store; all
//! credential state lives behind the store interface.

use crate::{
    error::AppError,
    models::credential::{
        GenerateKeyRequest, GenerateKeyResponse, ListKeysQuery, ListKeysResponse,
        RevokeKeyRequest, RevokeKeyResponse, ValidateKeyRequest, ValidateKeyResponse,
    },
    services::key_store::KeyStore,
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

/// Generate a new API key.
///
/// # Endpoint
///
/// `POST /api/v1/keys`
///
/// # Request Body
///
/// ```json
/// {
///   "owner_id": 7  // optional, defaults to the configured owner
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: the full key, shown exactly once
/// - **Error (500)**: key synthesis failed
///
/// ```json
/// {
///   "api_key": "ca_4f8a...",
///   "message": "API key generated successfully"
/// }
/// ```
pub async fn generate_key(
    State(store): State<KeyStore>,
    Json(request): Json<GenerateKeyRequest>,
) -> Result<(StatusCode, Json<GenerateKeyResponse>), AppError> {
    let credential = store.generate(request.owner_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(GenerateKeyResponse {
            api_key: credential.key,
            message: "API key generated successfully".to_string(),
        }),
    ))
}

/// Validate an API key.
///
/// # Endpoint
///
/// `POST /api/v1/keys/validate`
///
/// # Request Body
///
/// ```json
/// {
///   "api_key": "ca_4f8a..."
/// }
/// ```
///
/// A missing `api_key` field is rejected by the JSON extractor before this
/// handler runs.
///
/// # Response
///
/// - **Success (200 OK)**: `{ "valid": true, "owner_id": 7, ... }`
/// - **Invalid (401 Unauthorized)**: `{ "valid": false, ... }`
///
/// The 401 payload is identical for unknown and revoked keys; the response
/// never discloses whether a key ever existed.
pub async fn validate_key(
    State(store): State<KeyStore>,
    Json(request): Json<ValidateKeyRequest>,
) -> (StatusCode, Json<ValidateKeyResponse>) {
    let result = store.validate(&request.api_key).await;

    if result.valid {
        (
            StatusCode::OK,
            Json(ValidateKeyResponse {
                valid: true,
                owner_id: result.owner_id,
                message: "API key is valid".to_string(),
            }),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(ValidateKeyResponse {
                valid: false,
                owner_id: None,
                message: "Invalid or inactive API key".to_string(),
            }),
        )
    }
}

/// Revoke an API key.
///
/// # Endpoint
///
/// `POST /api/v1/keys/revoke`
///
/// # Response
///
/// - **Success (200 OK)**: key was issued at some point; it is now revoked.
///   Revoking an already-revoked key also lands here (idempotent).
/// - **Not Found (404)**: key was never issued
pub async fn revoke_key(
    State(store): State<KeyStore>,
    Json(request): Json<RevokeKeyRequest>,
) -> (StatusCode, Json<RevokeKeyResponse>) {
    if store.revoke(&request.api_key).await {
        (
            StatusCode::OK,
            Json(RevokeKeyResponse {
                success: true,
                message: "API key revoked successfully".to_string(),
            }),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(RevokeKeyResponse {
                success: false,
                message: "API key not found".to_string(),
            }),
        )
    }
}

/// List API keys for an owner.
///
/// # Endpoint
///
/// `GET /api/v1/keys?owner_id=7`
///
/// `owner_id` is optional and defaults to the configured owner.
///
/// # Response (200 OK)
///
/// Keys are always redacted; the full key string never appears in a listing.
/// An owner with no keys gets an empty list, not an error.
///
/// ```json
/// {
///   "keys": [
///     {
///       "api_key": "ca_4f8a9b2...",
///       "created_at": "2026-08-29T10:00:00Z",
///       "last_used_at": null,
///       "active": true
///     }
///   ],
///   "total": 1
/// }
/// ```
pub async fn list_keys(
    State(store): State<KeyStore>,
    Query(query): Query<ListKeysQuery>,
) -> Json<ListKeysResponse> {
    let keys = store.list(query.owner_id).await;

    Json(ListKeysResponse {
        total: keys.len(),
        keys,
    })
}
