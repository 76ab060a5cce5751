//! Session Sweeper - Background deletion of expired session rows
//!
//! Periodically removes sessions whose expiration has passed, with a
//! start/stop handshake that lets callers close the database afterwards.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod sweeper;

pub use api::AppState;
pub use config::Config;
pub use error::{Result, SweeperError};
pub use store::{SessionStore, SqliteSessionStore, SweepTarget};
pub use sweeper::{RunHandle, RunState, Sweeper, DEFAULT_SWEEP_INTERVAL};
