//! API Routes
//!
//! Configures the Axum router with all proxy endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_handler, payload_handler, provision_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /_health` - Health check endpoint
/// - `GET /_stats` - Local cache statistics
/// - `POST /authUser` - Provision a user
/// - `GET /{...}/{key}` - Read a key through both tiers
/// - `PUT /{...}/{key}` - Write a key through both tiers
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
/// - Client limit: When `client_limit` is set, at most that many requests
///   are served at once across all routes and the rest wait their turn
pub fn create_router(state: AppState, client_limit: Option<usize>) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/_health", get(health_handler))
        .route("/_stats", get(stats_handler))
        .route("/authUser", post(provision_handler))
        .fallback(payload_handler);

    let router = match client_limit {
        Some(limit) => router.layer(GlobalConcurrencyLimitLayer::new(limit)),
        None => router,
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
