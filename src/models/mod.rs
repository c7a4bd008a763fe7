//! Data models and API wire types.
//!
//! This module contains the credential record owned by the key store and the
//! request/response structures exchanged over HTTP.

/// Credential model, redacted views, and key endpoint wire types
pub mod credential;
