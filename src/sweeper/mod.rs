//! Sweeper Module
//!
//! Background task that periodically deletes expired session rows, with a
//! start/stop handshake so shutdown can be sequenced before the database pool
//! is closed.

mod handle;
mod stats;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, RwLock};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::{Result, SweeperError};
use crate::store::{SessionStore, SweepTarget};

pub use handle::{RunHandle, RunState};
pub use stats::SweepStats;

use handle::{ActiveRun, SharedRunState};

// == Public Constants ==
/// Period used when `start` is given a zero interval
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Returns the period a run will actually use for `interval`.
pub fn effective_interval(interval: Duration) -> Duration {
    if interval.is_zero() {
        DEFAULT_SWEEP_INTERVAL
    } else {
        interval
    }
}

// == Sweeper ==
/// Periodic deleter of expired rows in one session table.
///
/// Clones share the same store, statistics and run marker, so a clone handed
/// to the HTTP layer observes the run started from `main`.
#[derive(Clone)]
pub struct Sweeper {
    store: Arc<dyn SessionStore>,
    target: Arc<SweepTarget>,
    stats: Arc<RwLock<SweepStats>>,
    active: Arc<AtomicBool>,
}

impl Sweeper {
    /// Creates a sweeper for `table`, using the default `expires_on` column.
    ///
    /// Fails with `InvalidIdentifier` if `table` is not a plain SQL identifier.
    pub fn new(store: Arc<dyn SessionStore>, table: &str) -> Result<Self> {
        Ok(Self::from_target(store, SweepTarget::new(table)?))
    }

    /// Creates a sweeper for an already validated target.
    pub fn from_target(store: Arc<dyn SessionStore>, target: SweepTarget) -> Self {
        Self {
            store,
            target: Arc::new(target),
            stats: Arc::new(RwLock::new(SweepStats::new())),
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replaces the expiration column.
    ///
    /// Statistics and the run marker stay shared with the original, so this
    /// cannot be used to slip a second run past `start`. A run that is already
    /// active keeps sweeping with the column it was started with.
    pub fn with_expiry_column(self, column: &str) -> Result<Self> {
        let target = SweepTarget::with_column(self.target.table.as_str(), column)?;
        Ok(Self {
            target: Arc::new(target),
            ..self
        })
    }

    pub fn target(&self) -> &SweepTarget {
        &self.target
    }

    /// True while a background run is alive.
    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Snapshot of the sweep statistics.
    pub async fn stats(&self) -> SweepStats {
        self.stats.read().await.clone()
    }

    /// Runs one delete-expired statement against this sweeper's store.
    ///
    /// Idempotent: with nothing expired it succeeds and removes zero rows.
    pub async fn delete_expired(&self) -> Result<u64> {
        let outcome = self.store.delete_expired(&self.target).await;

        let mut stats = self.stats.write().await;
        match &outcome {
            Ok(removed) => {
                stats.record_success(*removed);
                if *removed > 0 {
                    info!(table = %self.target.table, removed, "Expired sessions deleted");
                } else {
                    debug!(table = %self.target.table, "No expired sessions found");
                }
            }
            Err(err) => stats.record_failure(err.to_string()),
        }

        outcome
    }

    /// Starts the background run and returns its control handle immediately.
    ///
    /// A zero `interval` selects [`DEFAULT_SWEEP_INTERVAL`]. The first sweep
    /// happens one full period after the call. Must be called from within a
    /// Tokio runtime.
    ///
    /// # Errors
    /// - `InvalidInterval` if `interval` reaches past the clock's range
    /// - `AlreadyRunning` if a previous run has not exited yet
    pub fn start(&self, interval: Duration) -> Result<RunHandle> {
        let period = effective_interval(interval);
        let first_tick = Instant::now().checked_add(period).ok_or_else(|| {
            SweeperError::InvalidInterval(format!("{}s cannot be scheduled", period.as_secs()))
        })?;

        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SweeperError::AlreadyRunning(self.target.table.to_string()));
        }

        let (cancel_tx, cancel_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();
        let state = Arc::new(SharedRunState::new());
        let run = ActiveRun::new(self.active.clone(), state.clone());

        tokio::spawn(run_loop(
            self.clone(),
            first_tick,
            period,
            cancel_rx,
            done_tx,
            run,
        ));

        info!(
            table = %self.target.table,
            interval_ms = period.as_millis() as u64,
            "Session sweeper started"
        );

        Ok(RunHandle::new(
            cancel_tx,
            done_rx,
            state,
            self.target.table.clone(),
            self.active.clone(),
        ))
    }

    /// Stops the run behind `handle`, waiting until its task has exited.
    ///
    /// A handle started by another sweeper is still stopped, since dropping
    /// it would cancel that run anyway; the mismatch is logged.
    pub async fn stop(&self, handle: RunHandle) -> Result<()> {
        if !handle.belongs_to(&self.active) {
            warn!(
                table = %self.target.table,
                handle_table = %handle.table(),
                "Stopping a run started by another sweeper"
            );
        }

        let table = handle.table().clone();
        handle.stop().await?;
        info!(table = %table, "Session sweeper stopped");
        Ok(())
    }
}

/// Body of the background task: sweep on every tick until cancelled.
async fn run_loop(
    sweeper: Sweeper,
    first_tick: Instant,
    period: Duration,
    mut cancel: oneshot::Receiver<()>,
    done: oneshot::Sender<()>,
    run: ActiveRun,
) {
    let mut ticker = interval_at(first_tick, period);
    // A slow sweep skips the ticks it overran instead of queueing them
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        // Cancellation is checked first so a tick left ready by a slow sweep
        // never delays shutdown by another deletion
        tokio::select! {
            biased;

            signal = &mut cancel => {
                if signal.is_err() {
                    debug!(table = %sweeper.target.table, "Run handle dropped, stopping sweeper");
                }
                run.begin_stopping();
                break;
            }
            _ = ticker.tick() => {
                if let Err(err) = sweeper.delete_expired().await {
                    warn!(
                        table = %sweeper.target.table,
                        error = %err,
                        "Unable to delete expired sessions"
                    );
                }
            }
        }
    }

    // Timer and run marker go away before completion is acknowledged
    drop(ticker);
    drop(run);
    let _ = done.send(());
}
