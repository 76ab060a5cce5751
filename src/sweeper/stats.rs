//! Sweep Statistics Module
//!
//! Tracks sweeper activity: attempts, failures and rows removed.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Sweep Stats ==
/// Tracks sweeper activity across runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepStats {
    /// Number of delete-expired executions attempted
    pub attempts: u64,
    /// Number of executions that completed without error
    pub successes: u64,
    /// Number of executions that failed
    pub failures: u64,
    /// Total rows removed since startup
    pub rows_deleted: u64,
    /// Rows removed by the most recent successful sweep
    pub last_rows_deleted: u64,
    /// When the most recent sweep finished
    pub last_sweep_at: Option<DateTime<Utc>>,
    /// Message of the most recent failure, cleared on success
    pub last_error: Option<String>,
}

impl SweepStats {
    // == Constructor ==
    /// Creates a new SweepStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Failure Rate ==
    /// Returns failures / attempts, or 0.0 if nothing has run yet.
    pub fn failure_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.failures as f64 / self.attempts as f64
        }
    }

    // == Record Success ==
    pub fn record_success(&mut self, rows: u64) {
        self.attempts += 1;
        self.successes += 1;
        self.rows_deleted += rows;
        self.last_rows_deleted = rows;
        self.last_sweep_at = Some(Utc::now());
        self.last_error = None;
    }

    // == Record Failure ==
    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.attempts += 1;
        self.failures += 1;
        self.last_sweep_at = Some(Utc::now());
        self.last_error = Some(error.into());
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = SweepStats::new();
        assert_eq!(stats.attempts, 0);
        assert_eq!(stats.rows_deleted, 0);
        assert!(stats.last_sweep_at.is_none());
        assert_eq!(stats.failure_rate(), 0.0);
    }

    #[test]
    fn test_record_success_accumulates_rows() {
        let mut stats = SweepStats::new();
        stats.record_success(3);
        stats.record_success(0);
        assert_eq!(stats.attempts, 2);
        assert_eq!(stats.successes, 2);
        assert_eq!(stats.rows_deleted, 3);
        assert_eq!(stats.last_rows_deleted, 0);
        assert!(stats.last_sweep_at.is_some());
    }

    #[test]
    fn test_failure_then_success_clears_error() {
        let mut stats = SweepStats::new();
        stats.record_failure("database is locked");
        assert_eq!(stats.last_error.as_deref(), Some("database is locked"));
        assert_eq!(stats.failure_rate(), 1.0);

        stats.record_success(1);
        assert!(stats.last_error.is_none());
        assert_eq!(stats.failure_rate(), 0.5);
    }

    #[test]
    fn test_stats_serialize() {
        let mut stats = SweepStats::new();
        stats.record_success(2);
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"rows_deleted\":2"));
        assert!(json.contains("last_sweep_at"));
    }
}
