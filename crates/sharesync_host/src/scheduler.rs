//! Tokio-backed tick scheduler.

use crate::error::{HostError, HostResult};
use parking_lot::Mutex;
use sharesync_engine::{EngineError, EngineResult, TaskId, TickCallback, TickScheduler};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Runs tick callbacks on a tokio runtime at a fixed rate.
///
/// Each registration spawns one task driving a [`tokio::time::Interval`].
/// The first tick fires one period after registration. Ticks that fall
/// behind are skipped rather than bunched up. Cancelling aborts the task;
/// dropping the scheduler aborts every task it spawned.
pub struct TokioTickScheduler {
    handle: Handle,
    next_id: AtomicU64,
    tasks: Mutex<HashMap<TaskId, JoinHandle<()>>>,
}

impl TokioTickScheduler {
    /// Creates a scheduler spawning onto `handle`.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            next_id: AtomicU64::new(0),
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a scheduler on the runtime the caller is running in.
    pub fn current() -> HostResult<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| HostError::NoRuntime(e.to_string()))
    }

    /// Number of registered tasks that are still running.
    pub fn active_tasks(&self) -> usize {
        self.tasks
            .lock()
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }
}

impl TickScheduler for TokioTickScheduler {
    fn schedule_repeating(&self, period: Duration, callback: TickCallback) -> EngineResult<TaskId> {
        if period.is_zero() {
            return Err(EngineError::Scheduler("tick period must be non-zero".into()));
        }

        let id = TaskId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let handle = self.handle.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                callback();
            }
        });

        self.tasks.lock().insert(id, handle);
        debug!(task = %id, ?period, "scheduled repeating tick");
        Ok(id)
    }

    fn cancel(&self, task: TaskId) {
        if let Some(handle) = self.tasks.lock().remove(&task) {
            handle.abort();
            debug!(task = %task, "cancelled repeating tick");
        }
    }
}

impl Drop for TokioTickScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.get_mut().drain() {
            handle.abort();
        }
    }
}
