//! API Handlers
//!
//! HTTP request handlers for the sweeper status endpoints.

use axum::{extract::State, Json};

use crate::error::Result;
use crate::models::{HealthResponse, StatsResponse, SweepResponse};
use crate::sweeper::Sweeper;

/// Application state shared across all handlers.
///
/// Holds a clone of the sweeper whose run is controlled from `main`.
#[derive(Clone)]
pub struct AppState {
    pub sweeper: Sweeper,
}

impl AppState {
    /// Creates a new AppState around the given sweeper.
    pub fn new(sweeper: Sweeper) -> Self {
        Self { sweeper }
    }
}

/// Handler for POST /sweep
///
/// Runs one delete-expired statement immediately, outside the timer.
pub async fn sweep_handler(State(state): State<AppState>) -> Result<Json<SweepResponse>> {
    let removed = state.sweeper.delete_expired().await?;
    Ok(Json(SweepResponse::new(
        state.sweeper.target().table.as_str(),
        removed,
    )))
}

/// Handler for GET /stats
///
/// Returns the sweep statistics gathered since startup.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.sweeper.stats().await;

    Json(StatsResponse::new(
        state.sweeper.target().table.as_str(),
        state.sweeper.is_running(),
        stats,
    ))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.sweeper.is_running()))
}
