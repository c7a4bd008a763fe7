//! Credential model and API wire types.
//!
//! A credential is an opaque bearer API key tied to an owner. The full key
//! string is handed out exactly once, at generation time; every other view of
//! a credential is redacted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of leading key characters kept in a redacted view.
///
/// Ten characters cover the `ca_` namespace tag plus seven hex characters,
/// enough to recognize a key in a listing but far too short to replay.
pub const REDACTED_PREFIX_LEN: usize = 10;

/// A credential record owned by the key store.
///
/// # Lifecycle
///
/// - Created by `generate` with `active = true` and `last_used_at = None`
/// - `last_used_at` is touched on every successful validation
/// - `active` is flipped to `false` by revocation and never flipped back
/// - Records are never deleted; revocation is the terminal state
///
/// This struct deliberately does not implement `Serialize`. The full key
/// must never travel through a listing response; convert to
/// [`RedactedCredential`] instead.
#[derive(Debug, Clone)]
pub struct Credential {
    /// The full key string, e.g. `ca_<64 hex chars>`.
    ///
    /// Doubles as the map key in the store and as the bearer secret.
    pub key: String,

    /// Identifier of the principal this credential authenticates as.
    pub owner_id: i64,

    /// Timestamp set once at creation, immutable thereafter.
    pub created_at: DateTime<Utc>,

    /// Timestamp of the most recent successful validation.
    ///
    /// `None` until the key is validated for the first time.
    pub last_used_at: Option<DateTime<Utc>>,

    /// Whether this credential is currently valid.
    ///
    /// One-way: once revoked, a credential can never be reactivated.
    pub active: bool,
}

/// A credential view safe to display: the key is truncated to a short,
/// recognizable handle.
#[derive(Debug, Clone, Serialize)]
pub struct RedactedCredential {
    /// First [`REDACTED_PREFIX_LEN`] characters of the key, followed by a
    /// literal `...` truncation marker.
    pub api_key: String,

    /// When the credential was created.
    pub created_at: DateTime<Utc>,

    /// When the credential was last validated successfully, if ever.
    pub last_used_at: Option<DateTime<Utc>>,

    /// Whether the credential is still active.
    pub active: bool,
}

impl From<&Credential> for RedactedCredential {
    fn from(credential: &Credential) -> Self {
        // Keys are always longer than the redacted prefix, but clamp anyway
        // so a short key can never panic the listing path.
        let visible = credential
            .key
            .get(..REDACTED_PREFIX_LEN)
            .unwrap_or(&credential.key);

        RedactedCredential {
            api_key: format!("{visible}..."),
            created_at: credential.created_at,
            last_used_at: credential.last_used_at,
            active: credential.active,
        }
    }
}

/// Outcome of a validation lookup.
///
/// An invalid result carries no owner and does not distinguish a key that was
/// never issued from one that was revoked; leaking that difference would
/// reveal which keys ever existed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the key exists and is active.
    pub valid: bool,

    /// Owner of the key; populated only when `valid` is true.
    pub owner_id: Option<i64>,
}

impl ValidationResult {
    /// A successful validation for the given owner.
    pub fn valid(owner_id: i64) -> Self {
        ValidationResult {
            valid: true,
            owner_id: Some(owner_id),
        }
    }

    /// A failed validation (unknown key or revoked key, indistinguishably).
    pub fn invalid() -> Self {
        ValidationResult {
            valid: false,
            owner_id: None,
        }
    }
}

/// Request to generate a new API key.
///
/// # Example
///
/// ```json
/// {
///   "owner_id": 7
/// }
/// ```
///
/// `owner_id` may be omitted, in which case the configured default owner is
/// used (see `Config::default_owner_id`).
#[derive(Debug, Deserialize)]
pub struct GenerateKeyRequest {
    pub owner_id: Option<i64>,
}

/// Response to a successful key generation.
///
/// This is the only response anywhere in the API that contains the full
/// plaintext key. Callers must store it; it cannot be retrieved again.
#[derive(Debug, Serialize)]
pub struct GenerateKeyResponse {
    pub api_key: String,
    pub message: String,
}

/// Request to validate an API key.
#[derive(Debug, Deserialize)]
pub struct ValidateKeyRequest {
    pub api_key: String,
}

/// Response to a validation request.
#[derive(Debug, Serialize)]
pub struct ValidateKeyResponse {
    pub valid: bool,

    /// Owner of the validated key; omitted when the key is invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,

    pub message: String,
}

/// Request to revoke an API key.
#[derive(Debug, Deserialize)]
pub struct RevokeKeyRequest {
    pub api_key: String,
}

/// Response to a revocation request.
#[derive(Debug, Serialize)]
pub struct RevokeKeyResponse {
    pub success: bool,
    pub message: String,
}

/// Query parameters for listing keys.
///
/// `owner_id` may be omitted; the configured default owner is used.
#[derive(Debug, Deserialize)]
pub struct ListKeysQuery {
    pub owner_id: Option<i64>,
}

/// Response to a list request: redacted views only.
#[derive(Debug, Serialize)]
pub struct ListKeysResponse {
    pub keys: Vec<RedactedCredential>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_credential(key: &str) -> Credential {
        Credential {
            key: key.to_string(),
            owner_id: 1,
            created_at: Utc::now(),
            last_used_at: None,
            active: true,
        }
    }

    #[test]
    fn redaction_truncates_with_marker() {
        let credential = sample_credential("ca_0123456789abcdef0123456789abcdef");
        let redacted = RedactedCredential::from(&credential);

        assert_eq!(redacted.api_key, "ca_0123456...");
        assert!(redacted.api_key.len() < credential.key.len());
    }

    #[test]
    fn redacted_prefix_is_strict_prefix_of_real_key() {
        let credential = sample_credential("ca_0123456789abcdef0123456789abcdef");
        let redacted = RedactedCredential::from(&credential);

        let handle = redacted.api_key.strip_suffix("...").unwrap();
        assert!(credential.key.starts_with(handle));
        assert!(handle.len() < credential.key.len());
    }

    #[test]
    fn redaction_never_panics_on_short_key() {
        let credential = sample_credential("ca_x");
        let redacted = RedactedCredential::from(&credential);

        assert_eq!(redacted.api_key, "ca_x...");
    }

    #[test]
    fn invalid_result_carries_no_owner() {
        assert_eq!(ValidationResult::invalid().owner_id, None);
        assert_eq!(ValidationResult::valid(7).owner_id, Some(7));
    }
}
