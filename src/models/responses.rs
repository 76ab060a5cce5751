//! Response DTOs for the sweeper status API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::sweeper::SweepStats;

/// Response body for the manual sweep endpoint (POST /sweep)
#[derive(Debug, Clone, Serialize)]
pub struct SweepResponse {
    /// Table that was swept
    pub table: String,
    /// Rows removed by this sweep
    pub rows_deleted: u64,
}

impl SweepResponse {
    pub fn new(table: impl Into<String>, rows_deleted: u64) -> Self {
        Self {
            table: table.into(),
            rows_deleted,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Table the sweeper is bound to
    pub table: String,
    /// Whether a background run is alive
    pub running: bool,
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    /// Total rows removed since startup
    pub rows_deleted: u64,
    pub last_rows_deleted: u64,
    pub last_sweep_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    /// failures / attempts
    pub failure_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from sweep statistics
    pub fn new(table: impl Into<String>, running: bool, stats: SweepStats) -> Self {
        let failure_rate = stats.failure_rate();
        Self {
            table: table.into(),
            running,
            attempts: stats.attempts,
            successes: stats.successes,
            failures: stats.failures,
            rows_deleted: stats.rows_deleted,
            last_rows_deleted: stats.last_rows_deleted,
            last_sweep_at: stats.last_sweep_at,
            last_error: stats.last_error,
            failure_rate,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Whether the background sweeper is running
    pub sweeper_running: bool,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(sweeper_running: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            sweeper_running,
        }
    }
}
