//! Key store - Core credential lifecycle logic.
//!
//! This service owns every credential record and exposes the four lifecycle
//! operations: generate, validate, revoke, list. All state is in memory and
//! lives exactly as long as the process; a production deployment would place
//! a durable backing store behind the same interface.
//!
//! # Concurrency
//!
//! A single `tokio::sync::RwLock` guards the map. Mutating operations
//! (generate, a successful validate, revoke) take the write lock; list takes
//! the read lock and copies a snapshot. No lock is held across an await
//! point, so every operation completes in bounded time. A validate racing a
//! revoke on the same key may resolve either way; revoke linearizes after
//! any validate that acquired the lock first.

use crate::{
    error::AppError,
    models::credential::{Credential, RedactedCredential, ValidationResult},
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Namespace tag prepended to every generated key.
///
/// Makes keys visually recognizable and lets `validate` reject candidates
/// that cannot possibly be in the store without taking the lock.
pub const KEY_PREFIX: &str = "ca_";

/// Number of random bytes behind each key (256 bits of entropy).
const KEY_RANDOM_BYTES: usize = 32;

/// In-memory credential store.
///
/// Cloning is cheap and every clone addresses the same underlying map, so a
/// single store can be shared across all request handlers via axum state.
/// Each test constructs its own store for isolation.
///
/// # Growth
///
/// Records are never deleted (revocation is terminal), so the map grows for
/// the lifetime of the process. Acceptable at demo scope.
#[derive(Debug, Clone)]
pub struct KeyStore {
    keys: Arc<RwLock<HashMap<String, Credential>>>,

    /// Owner substituted when `generate` or `list` is called without one.
    ///
    /// This is a deliberate, configurable policy (see `Config`), not an
    /// accidental fallback; callers that care must pass an explicit owner.
    default_owner_id: i64,
}

impl KeyStore {
    /// Create an empty store with the given default owner policy.
    pub fn new(default_owner_id: i64) -> Self {
        KeyStore {
            keys: Arc::new(RwLock::new(HashMap::new())),
            default_owner_id,
        }
    }

    /// Generate a new API key for `owner_id` (or the default owner).
    ///
    /// The returned [`Credential`] carries the full plaintext key. This is
    /// the only moment the key is ever handed out; every later view of the
    /// credential is redacted.
    ///
    /// # Process
    ///
    /// 1. Mint `ca_` + 64 hex chars from a cryptographically secure source
    /// 2. Defensive uniqueness check against the map (one retry on collision)
    /// 3. Insert the fully-initialized record under the write lock
    ///
    /// # Errors
    ///
    /// `AppError::KeyGeneration` if two consecutive mints collide with
    /// existing keys. With 256 bits of entropy per key this indicates a
    /// broken random source, not bad luck.
    pub async fn generate(&self, owner_id: Option<i64>) -> Result<Credential, AppError> {
        let owner_id = owner_id.unwrap_or(self.default_owner_id);

        let mut keys = self.keys.write().await;

        let mut key = mint_key();
        if keys.contains_key(&key) {
            tracing::warn!("generated API key collided with an existing key, retrying");
            key = mint_key();
            if keys.contains_key(&key) {
                return Err(AppError::KeyGeneration);
            }
        }

        let credential = Credential {
            key: key.clone(),
            owner_id,
            created_at: Utc::now(),
            last_used_at: None,
            active: true,
        };

        // Insert happens entirely under the write lock, so readers see
        // either no record or a fully-initialized one.
        keys.insert(key, credential.clone());

        tracing::debug!(owner_id, "API key generated");

        Ok(credential)
    }

    /// Validate a candidate key.
    ///
    /// Succeeds only if the key exists and is active. On success,
    /// `last_used_at` is updated before returning; concurrent validations of
    /// the same key serialize on the write lock, so the field is always a
    /// timestamp one of them wrote (last writer wins).
    ///
    /// An invalid result does not distinguish an unknown key from a revoked
    /// one. Absence and inactivity are ordinary outcomes, not errors.
    pub async fn validate(&self, key: &str) -> ValidationResult {
        // Every stored key carries the namespace tag, so anything without it
        // can be rejected without touching the map.
        if !key.starts_with(KEY_PREFIX) {
            return ValidationResult::invalid();
        }

        let mut keys = self.keys.write().await;

        match keys.get_mut(key) {
            Some(credential) if credential.active => {
                credential.last_used_at = Some(Utc::now());
                ValidationResult::valid(credential.owner_id)
            }
            _ => ValidationResult::invalid(),
        }
    }

    /// Revoke a key.
    ///
    /// Returns `true` if the key was ever issued, regardless of whether it
    /// was already revoked (revocation is idempotent), and `false` for a key
    /// that was never issued. Revocation is one-way: there is no operation
    /// that reactivates a credential.
    pub async fn revoke(&self, key: &str) -> bool {
        let mut keys = self.keys.write().await;

        match keys.get_mut(key) {
            Some(credential) => {
                if credential.active {
                    credential.active = false;
                    tracing::debug!(owner_id = credential.owner_id, "API key revoked");
                }
                true
            }
            None => false,
        }
    }

    /// List redacted views of every credential belonging to `owner_id`
    /// (or the default owner).
    ///
    /// Returns a snapshot taken at call time, sorted by creation time (ties
    /// broken by key) so the order within one snapshot is deterministic.
    /// An owner with no credentials gets an empty vector.
    pub async fn list(&self, owner_id: Option<i64>) -> Vec<RedactedCredential> {
        let owner_id = owner_id.unwrap_or(self.default_owner_id);

        let keys = self.keys.read().await;

        let mut matching: Vec<&Credential> = keys
            .values()
            .filter(|credential| credential.owner_id == owner_id)
            .collect();

        // HashMap iteration order is arbitrary; sort the snapshot.
        matching.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.key.cmp(&b.key))
        });

        matching.into_iter().map(RedactedCredential::from).collect()
    }
}

/// Mint a fresh key: namespace tag + hex-encoded CSPRNG bytes.
fn mint_key() -> String {
    let bytes: [u8; KEY_RANDOM_BYTES] = rand::random();
    format!("{KEY_PREFIX}{}", hex::encode(bytes))
}
