//! API Routes
//!
//! Configures the Axum router with the sweeper status endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{health_handler, stats_handler, sweep_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check, including whether the sweeper runs
/// - `GET /stats` - Sweep statistics
/// - `POST /sweep` - Delete expired sessions now
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/sweep", post(sweep_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
