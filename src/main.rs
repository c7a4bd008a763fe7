//! API Key Service - Main Application Entry Point
//!
//! This is a REST API server for issuing, validating, revoking, and listing
//! opaque bearer API keys. All credential state is held in memory and lives
//! exactly as long as the process — a deliberate scope boundary, not an
//! oversight; a production system would place a durable store behind the
//! same four-operation interface.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **State**: in-memory key store shared across handlers via axum State
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create the key store with the configured default owner policy
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured port

mod config;
mod error;
mod handlers;
mod models;
mod services;

use tracing_subscriber::EnvFilter;

use axum::{
    Router,
    routing::{get, post},
};
use services::key_store::KeyStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the application router around a key store.
///
/// Factored out of `main` so tests can drive the full HTTP surface against a
/// fresh store without binding a socket.
fn app(store: KeyStore) -> Router {
    Router::new()
        // Public liveness probe
        .route("/health", get(handlers::health::health_check))
        // Key lifecycle routes
        .route("/api/v1/keys", post(handlers::keys::generate_key))
        .route("/api/v1/keys", get(handlers::keys::list_keys))
        .route("/api/v1/keys/validate", post(handlers::keys::validate_key))
        .route("/api/v1/keys/revoke", post(handlers::keys::revoke_key))
        // Demo service, so CORS is wide open
        .layer(CorsLayer::permissive())
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share the key store with all handlers via State extraction
        .with_state(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create the key store; all handlers share this one instance
    let store = KeyStore::new(config.default_owner_id);
    tracing::info!(
        default_owner_id = config.default_owner_id,
        "Key store created"
    );

    let app = app(store);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(KeyStore::new(1))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = test_app();
        let (status, body) = send(&app, get_request("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn generate_returns_full_key_once() {
        let app = test_app();
        let (status, body) =
            send(&app, post_json("/api/v1/keys", json!({ "owner_id": 7 }))).await;

        assert_eq!(status, StatusCode::CREATED);
        let key = body["api_key"].as_str().unwrap();
        assert!(key.starts_with("ca_"));
        assert!(key.len() > 40);
    }

    #[tokio::test]
    async fn generate_without_owner_uses_default() {
        let app = test_app();
        let (status, _) = send(&app, post_json("/api/v1/keys", json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);

        // default owner is 1 in test_app
        let (status, body) = send(&app, get_request("/api/v1/keys?owner_id=1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
    }

    #[tokio::test]
    async fn lifecycle_over_http() {
        let app = test_app();

        // generate for owner 7
        let (_, body) = send(&app, post_json("/api/v1/keys", json!({ "owner_id": 7 }))).await;
        let key = body["api_key"].as_str().unwrap().to_string();

        // validate succeeds with the owner
        let (status, body) = send(
            &app,
            post_json("/api/v1/keys/validate", json!({ "api_key": key })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
        assert_eq!(body["owner_id"], 7);

        // revoke succeeds
        let (status, body) = send(
            &app,
            post_json("/api/v1/keys/revoke", json!({ "api_key": key })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        // validation now fails with 401 and no owner
        let (status, body) = send(
            &app,
            post_json("/api/v1/keys/validate", json!({ "api_key": key })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["valid"], false);
        assert!(body.get("owner_id").is_none());

        // listing shows one revoked, redacted record
        let (status, body) = send(&app, get_request("/api/v1/keys?owner_id=7")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        let listed = &body["keys"][0];
        assert_eq!(listed["active"], false);
        let handle = listed["api_key"].as_str().unwrap();
        assert_ne!(handle, key);
        assert!(handle.ends_with("..."));
        assert!(key.starts_with(handle.strip_suffix("...").unwrap()));
    }

    #[tokio::test]
    async fn validate_unknown_key_returns_unauthorized() {
        let app = test_app();
        let (status, body) = send(
            &app,
            post_json("/api/v1/keys/validate", json!({ "api_key": "nonexistent" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["valid"], false);
    }

    #[tokio::test]
    async fn validate_without_api_key_field_is_rejected() {
        let app = test_app();
        let response = app
            .oneshot(post_json("/api/v1/keys/validate", json!({})))
            .await
            .unwrap();

        // rejected by the Json extractor before the store is consulted
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn revoke_unknown_key_returns_not_found() {
        let app = test_app();
        let (status, body) = send(
            &app,
            post_json("/api/v1/keys/revoke", json!({ "api_key": "ca_never" })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn list_unknown_owner_is_empty() {
        let app = test_app();
        let (status, body) = send(&app, get_request("/api/v1/keys?owner_id=999")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
        assert_eq!(body["keys"].as_array().unwrap().len(), 0);
    }
}
