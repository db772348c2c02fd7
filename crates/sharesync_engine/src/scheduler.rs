//! Tick scheduling abstraction.

use crate::error::{EngineError, EngineResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Callback run by the host on every tick.
pub type TickCallback = Arc<dyn Fn() + Send + Sync>;

/// Handle of a registered repeating task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a task ID from its raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// A host scheduler that runs callbacks at a fixed period.
///
/// This trait abstracts the host's timing source, allowing for different
/// implementations (an async runtime, a game loop, a manual driver for
/// tests, etc.).
pub trait TickScheduler: Send + Sync {
    /// Registers `callback` to run every `period`.
    fn schedule_repeating(&self, period: Duration, callback: TickCallback) -> EngineResult<TaskId>;

    /// Cancels a registered task. Unknown tasks are ignored.
    fn cancel(&self, task: TaskId);
}

struct ManualTask {
    period: Duration,
    callback: TickCallback,
}

/// A scheduler driven explicitly by the caller.
///
/// Registered callbacks only run when [`ManualScheduler::run_once`] or
/// [`ManualScheduler::advance`] is called. Callbacks are invoked without
/// holding the scheduler's lock, so they may register or cancel tasks.
#[derive(Default)]
pub struct ManualScheduler {
    next_id: AtomicU64,
    tasks: Mutex<BTreeMap<TaskId, ManualTask>>,
    rejecting: AtomicBool,
    fired: AtomicU64,
}

impl ManualScheduler {
    /// Creates a new manual scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every registered task once, returning how many ran.
    pub fn run_once(&self) -> usize {
        let callbacks: Vec<TickCallback> = self
            .tasks
            .lock()
            .values()
            .map(|task| Arc::clone(&task.callback))
            .collect();

        for callback in &callbacks {
            callback();
        }
        self.fired
            .fetch_add(callbacks.len() as u64, Ordering::SeqCst);
        callbacks.len()
    }

    /// Runs `ticks` rounds, returning the total number of callbacks run.
    pub fn advance(&self, ticks: u32) -> usize {
        (0..ticks).map(|_| self.run_once()).sum()
    }

    /// Number of registered tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Returns the period a task was registered with.
    pub fn period_of(&self, task: TaskId) -> Option<Duration> {
        self.tasks.lock().get(&task).map(|task| task.period)
    }

    /// Total number of callbacks run so far.
    pub fn fired(&self) -> u64 {
        self.fired.load(Ordering::SeqCst)
    }

    /// Makes subsequent registrations fail.
    pub fn set_rejecting(&self, rejecting: bool) {
        self.rejecting.store(rejecting, Ordering::SeqCst);
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule_repeating(&self, period: Duration, callback: TickCallback) -> EngineResult<TaskId> {
        if self.rejecting.load(Ordering::SeqCst) {
            return Err(EngineError::Scheduler("scheduler is not accepting tasks".into()));
        }

        let id = TaskId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.tasks.lock().insert(id, ManualTask { period, callback });
        Ok(id)
    }

    fn cancel(&self, task: TaskId) {
        self.tasks.lock().remove(&task);
    }
}
