//! Configuration Module
//!
//! Handles loading and managing sweeper configuration from environment variables.

use std::env;
use std::time::Duration;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// sqlx connection string for the session database
    pub database_url: String,
    /// Upper bound on pooled database connections
    pub db_max_connections: u32,
    /// Table holding the sessions to sweep
    pub session_table: String,
    /// Column holding each row's expiration timestamp
    pub expiry_column: String,
    /// Sweep interval in seconds (0 selects the sweeper's default period)
    pub sweep_interval: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` - Database connection string (default: sqlite://sessions.db?mode=rwc)
    /// - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
    /// - `SESSION_TABLE` - Table to sweep (default: sessions)
    /// - `SESSION_EXPIRY_COLUMN` - Expiration column (default: expires_on)
    /// - `SWEEP_INTERVAL_SECS` - Sweep frequency in seconds (default: 0, i.e. 5 minutes)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.db_max_connections),
            session_table: env::var("SESSION_TABLE").unwrap_or(defaults.session_table),
            expiry_column: env::var("SESSION_EXPIRY_COLUMN").unwrap_or(defaults.expiry_column),
            sweep_interval: env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_interval),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }

    /// Sweep interval as a Duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://sessions.db?mode=rwc".to_string(),
            db_max_connections: 5,
            session_table: "sessions".to_string(),
            expiry_column: "expires_on".to_string(),
            sweep_interval: 0,
            server_port: 3000,
        }
    }
}
