//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Calls into the key store
//! 3. Returns HTTP response (JSON, status code)

/// Liveness endpoint
pub mod health;
/// API key lifecycle endpoints
pub mod keys;
