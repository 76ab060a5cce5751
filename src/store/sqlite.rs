//! SQLite Session Store
//!
//! `SessionStore` implementation backed by a shared `sqlx` SQLite pool.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use super::{SessionStore, SweepTarget};
use crate::error::Result;
use crate::sweeper::{RunHandle, Sweeper};

/// Session store over a pooled SQLite database.
///
/// The pool is shared with request-handling code; cloning the store clones
/// the pool handle, not the connections.
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    /// Wraps an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `url` with at most `max_connections` connections.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Stops `run` and only then closes the pool.
    ///
    /// The pool is closed even if stopping fails; the stop outcome is returned.
    pub async fn close_after(&self, sweeper: &Sweeper, run: RunHandle) -> Result<()> {
        let stopped = sweeper.stop(run).await;
        self.pool.close().await;
        stopped
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn delete_expired(&self, target: &SweepTarget) -> Result<u64> {
        let sql = target.delete_expired_sql();
        let result = sqlx::query(&sql).execute(&self.pool).await?;
        debug!(table = %target.table, rows = result.rows_affected(), "delete expired executed");
        Ok(result.rows_affected())
    }
}
