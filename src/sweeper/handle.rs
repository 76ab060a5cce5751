//! Run Handle Module
//!
//! Control handle returned by `Sweeper::start` and the run state it observes.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::oneshot;

use crate::error::{Result, SweeperError};
use crate::store::Identifier;

// == Run State ==
/// Lifecycle of a single background run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Timer armed, sweeping on every tick
    Running,
    /// Cancellation received, tearing down
    Stopping,
    /// Task exited; terminal
    Stopped,
}

impl RunState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => RunState::Running,
            1 => RunState::Stopping,
            _ => RunState::Stopped,
        }
    }
}

/// Run state shared between the background task and its handle.
#[derive(Debug)]
pub(crate) struct SharedRunState(AtomicU8);

impl SharedRunState {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(RunState::Running as u8))
    }

    pub(crate) fn get(&self) -> RunState {
        RunState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: RunState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

// == Active Run Guard ==
/// Held by the background task for its whole lifetime.
///
/// Dropping it marks the run `Stopped` and frees the sweeper for another
/// `start`, including when the task unwinds from a panic.
pub(crate) struct ActiveRun {
    active: Arc<AtomicBool>,
    state: Arc<SharedRunState>,
}

impl ActiveRun {
    pub(crate) fn new(active: Arc<AtomicBool>, state: Arc<SharedRunState>) -> Self {
        Self { active, state }
    }

    pub(crate) fn begin_stopping(&self) {
        self.state.set(RunState::Stopping);
    }
}

impl Drop for ActiveRun {
    fn drop(&mut self) {
        self.state.set(RunState::Stopped);
        self.active.store(false, Ordering::Release);
    }
}

// == Run Handle ==
/// Caller-held control for one background run.
///
/// Holds the cancellation sender and the completion receiver. `stop` consumes
/// the handle, so a run can be stopped at most once. Dropping the handle
/// without calling `stop` also cancels the run, but without waiting for it.
#[derive(Debug)]
pub struct RunHandle {
    cancel: oneshot::Sender<()>,
    done: oneshot::Receiver<()>,
    state: Arc<SharedRunState>,
    table: Identifier,
    owner: Arc<AtomicBool>,
}

impl RunHandle {
    pub(crate) fn new(
        cancel: oneshot::Sender<()>,
        done: oneshot::Receiver<()>,
        state: Arc<SharedRunState>,
        table: Identifier,
        owner: Arc<AtomicBool>,
    ) -> Self {
        Self {
            cancel,
            done,
            state,
            table,
            owner,
        }
    }

    /// Table swept by the run this handle controls.
    pub fn table(&self) -> &Identifier {
        &self.table
    }

    /// True if the run was started from `active`'s sweeper (or a clone of it).
    pub(crate) fn belongs_to(&self, active: &Arc<AtomicBool>) -> bool {
        Arc::ptr_eq(&self.owner, active)
    }

    /// Current state of the run this handle controls.
    pub fn state(&self) -> RunState {
        self.state.get()
    }

    /// True once the background task has exited.
    pub fn is_finished(&self) -> bool {
        self.state() == RunState::Stopped
    }

    /// Requests cancellation and waits until the background task has exited.
    ///
    /// On `Ok` the timer is gone and no further deletion will run, so the
    /// caller may close the database pool immediately.
    ///
    /// # Errors
    /// - `AlreadyStopped` if the task exited before the request was sent
    /// - `TaskAborted` if the task went away without acknowledging
    pub async fn stop(self) -> Result<()> {
        let RunHandle { cancel, done, .. } = self;

        cancel
            .send(())
            .map_err(|_| SweeperError::AlreadyStopped)?;
        done.await.map_err(|_| SweeperError::TaskAborted)
    }
}
