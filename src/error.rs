//! Error types for the session sweeper
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Sweeper Error Enum ==
/// Unified error type for the session sweeper.
#[derive(Error, Debug)]
pub enum SweeperError {
    /// Table or column name rejected by identifier validation
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Sweep interval too large to schedule
    #[error("Invalid sweep interval: {0}")]
    InvalidInterval(String),

    /// Failure reported by the data-access layer
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A run is still active for this sweeper
    #[error("Sweeper already running for table {0}")]
    AlreadyRunning(String),

    /// The background task had already exited when stop was requested
    #[error("Sweeper run already stopped")]
    AlreadyStopped,

    /// The background task exited without acknowledging shutdown
    #[error("Sweeper task aborted before acknowledging shutdown")]
    TaskAborted,
}

// == IntoResponse Implementation ==
impl IntoResponse for SweeperError {
    fn into_response(self) -> Response {
        let status = match &self {
            SweeperError::InvalidIdentifier(_) | SweeperError::InvalidInterval(_) => {
                StatusCode::BAD_REQUEST
            }
            SweeperError::AlreadyRunning(_) => StatusCode::CONFLICT,
            SweeperError::Database(_)
            | SweeperError::AlreadyStopped
            | SweeperError::TaskAborted => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the session sweeper.
pub type Result<T> = std::result::Result<T, SweeperError>;
