//! Convergence engine state machine.

use crate::adapter::StateAdapter;
use crate::config::EngineConfig;
use crate::error::{EngineResult, ProviderError};
use crate::provider::ParticipantProvider;
use crate::scheduler::{TaskId, TickCallback, TickScheduler};
use parking_lot::{Mutex, RwLock};
use sharesync_state::{Fingerprint, StateSnapshot};
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Lifecycle state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Not syncing; ticks do nothing.
    #[default]
    Stopped,
    /// Syncing on every tick.
    Running,
}

impl SyncState {
    /// Returns true if the engine is syncing.
    pub fn is_running(&self) -> bool {
        matches!(self, SyncState::Running)
    }
}

/// How a status message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    /// The requested change happened.
    Success,
    /// Nothing changed.
    Notice,
    /// Participants were wiped.
    Warning,
}

/// Outcome of a start or stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Sync was started.
    Enabled,
    /// Sync was already running.
    AlreadyEnabled,
    /// Sync was stopped and participants reset.
    Disabled,
    /// Sync was not running; participants were reset anyway.
    AlreadyDisabled,
}

impl SyncStatus {
    /// Human-readable message for the invoker.
    pub fn message(&self) -> &'static str {
        match self {
            SyncStatus::Enabled => "Sharing enabled. All participants are now linked.",
            SyncStatus::AlreadyEnabled => "Sharing is already enabled.",
            SyncStatus::Disabled => "Sharing disabled. All participants have been cleared/reset.",
            SyncStatus::AlreadyDisabled => "Sharing is already disabled.",
        }
    }

    /// Presentation tone of the message.
    pub fn tone(&self) -> StatusTone {
        match self {
            SyncStatus::Enabled => StatusTone::Success,
            SyncStatus::AlreadyEnabled | SyncStatus::AlreadyDisabled => StatusTone::Notice,
            SyncStatus::Disabled => StatusTone::Warning,
        }
    }

    /// Returns true if the request did not change the engine state.
    pub fn is_redundant(&self) -> bool {
        matches!(self, SyncStatus::AlreadyEnabled | SyncStatus::AlreadyDisabled)
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Statistics about engine activity.
#[derive(Debug, Clone, Default)]
pub struct EngineStats {
    /// Ticks that ran while syncing.
    pub ticks: u64,
    /// Divergences adopted as the new baseline.
    pub divergences: u64,
    /// Broadcasts performed.
    pub broadcasts: u64,
    /// Snapshots applied to participants.
    pub applies: u64,
    /// Participants reset.
    pub resets: u64,
    /// Participant touches skipped because of provider errors.
    pub skipped: u64,
    /// Time of the last broadcast.
    pub last_broadcast_time: Option<Instant>,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport<Id> {
    /// Whether the engine was running.
    pub ran: bool,
    /// Number of participants listed at the start of the tick.
    pub participants: usize,
    /// Whether the baseline was seeded during this tick.
    pub seeded: bool,
    /// Participant whose state became the new baseline.
    pub diverged: Option<Id>,
    /// Fingerprint broadcast during this tick.
    pub broadcast: Option<Fingerprint>,
    /// Participants the baseline was applied to.
    pub applied: usize,
    /// Participants skipped because of provider errors.
    pub skipped: usize,
}

impl<Id> TickReport<Id> {
    fn idle() -> Self {
        Self {
            ran: false,
            participants: 0,
            seeded: false,
            diverged: None,
            broadcast: None,
            applied: 0,
            skipped: 0,
        }
    }
}

/// The shared state participants converge onto.
#[derive(Debug, Default)]
struct Baseline {
    current: Option<StateSnapshot>,
    last_broadcast: Option<Fingerprint>,
}

impl Baseline {
    fn fingerprint(&self) -> Option<Fingerprint> {
        self.current.as_ref().map(StateSnapshot::fingerprint)
    }

    fn replace(&mut self, snapshot: StateSnapshot) {
        self.current = Some(snapshot);
    }

    /// Returns the baseline if it has not been broadcast yet.
    fn pending_broadcast(&self) -> Option<&StateSnapshot> {
        self.current
            .as_ref()
            .filter(|snapshot| Some(snapshot.fingerprint()) != self.last_broadcast)
    }

    fn mark_broadcast(&mut self, fingerprint: Fingerprint) {
        self.last_broadcast = Some(fingerprint);
    }

    fn clear(&mut self) {
        self.current = None;
        self.last_broadcast = None;
    }
}

/// Everything a tick reads or writes, guarded by one lock.
#[derive(Debug, Default)]
struct EngineCore {
    state: SyncState,
    baseline: Baseline,
    task: Option<TaskId>,
}

/// The convergence engine keeps every active participant on one shared state.
///
/// The engine is created once per running instance and handed to whatever
/// wires up the tick callback. Starting registers a repeating tick with the
/// [`TickScheduler`]; the callback holds only a weak reference to the engine.
///
/// # Example
///
/// ```
/// use sharesync_engine::{
///     ConvergenceEngine, EngineConfig, ManualScheduler, MemoryProvider, SyncStatus,
/// };
/// use std::sync::Arc;
///
/// let provider = Arc::new(MemoryProvider::new());
/// let scheduler = Arc::new(ManualScheduler::new());
/// provider.join("alex");
/// provider.join("sam");
///
/// let config = EngineConfig::default();
/// let engine = ConvergenceEngine::new(config, provider.clone(), scheduler.clone());
/// assert_eq!(engine.start_sync().unwrap(), SyncStatus::Enabled);
///
/// provider.update("alex", |record| record.vitals.health = 5.0);
/// scheduler.advance(2);
/// assert_eq!(provider.record("sam").unwrap().vitals.health, 5.0);
/// ```
pub struct ConvergenceEngine<P: ParticipantProvider> {
    config: EngineConfig,
    adapter: StateAdapter<P>,
    scheduler: Arc<dyn TickScheduler>,
    core: Mutex<EngineCore>,
    stats: RwLock<EngineStats>,
    this: Weak<Self>,
}

impl<P: ParticipantProvider + 'static> ConvergenceEngine<P> {
    /// Creates a stopped engine.
    pub fn new(
        config: EngineConfig,
        provider: Arc<P>,
        scheduler: Arc<dyn TickScheduler>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            adapter: StateAdapter::new(provider, config.fallback_max_health),
            config,
            scheduler,
            core: Mutex::new(EngineCore::default()),
            stats: RwLock::new(EngineStats::default()),
            this: this.clone(),
        })
    }

    /// Gets the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Gets the state adapter.
    pub fn adapter(&self) -> &StateAdapter<P> {
        &self.adapter
    }

    /// Gets the current state.
    pub fn state(&self) -> SyncState {
        self.core.lock().state
    }

    /// Gets the current stats.
    pub fn stats(&self) -> EngineStats {
        self.stats.read().clone()
    }

    /// Fingerprint of the current baseline.
    pub fn baseline_fingerprint(&self) -> Option<Fingerprint> {
        self.core.lock().baseline.fingerprint()
    }

    /// Copy of the current baseline.
    pub fn baseline(&self) -> Option<StateSnapshot> {
        self.core.lock().baseline.current.clone()
    }

    /// Fingerprint most recently broadcast.
    pub fn last_broadcast(&self) -> Option<Fingerprint> {
        self.core.lock().baseline.last_broadcast
    }

    /// Captures a participant's current state.
    pub fn capture(&self, id: &P::Id) -> EngineResult<StateSnapshot> {
        Ok(self.adapter.capture(id)?)
    }

    /// Starts syncing.
    ///
    /// Resets every active participant, seeds the baseline from the first one
    /// and registers the tick callback. Returns
    /// [`SyncStatus::AlreadyEnabled`] without side effects if already
    /// running. If the scheduler refuses the callback the engine stays
    /// stopped.
    pub fn start_sync(&self) -> EngineResult<SyncStatus> {
        self.config.validate()?;

        let mut guard = self.core.lock();
        let core = &mut *guard;
        if core.state.is_running() {
            debug!("sync already running");
            return Ok(SyncStatus::AlreadyEnabled);
        }

        let participants = self.adapter.list_active();
        self.reset_all(&participants);

        core.baseline.clear();
        for id in &participants {
            match self.adapter.capture(id) {
                Ok(snapshot) => {
                    core.baseline.replace(snapshot);
                    break;
                }
                Err(e) => self.record_skip(id, &e),
            }
        }

        let this = self.this.clone();
        let callback: TickCallback = Arc::new(move || {
            if let Some(engine) = this.upgrade() {
                engine.tick();
            }
        });
        let task = match self
            .scheduler
            .schedule_repeating(self.config.tick_period, callback)
        {
            Ok(task) => task,
            Err(e) => {
                core.baseline.clear();
                warn!(error = %e, "failed to register tick callback");
                return Err(e);
            }
        };

        core.task = Some(task);
        core.state = SyncState::Running;
        info!(
            participants = participants.len(),
            baseline = ?core.baseline.fingerprint(),
            %task,
            "sync started"
        );
        Ok(SyncStatus::Enabled)
    }

    /// Stops syncing.
    ///
    /// Cancels the tick callback, resets every active participant and clears
    /// the baseline. Participants are reset even if the engine was not
    /// running.
    pub fn stop_sync(&self) -> SyncStatus {
        let mut guard = self.core.lock();
        let core = &mut *guard;
        let participants = self.adapter.list_active();

        if !core.state.is_running() {
            debug!("sync already stopped, resetting participants");
            self.reset_all(&participants);
            return SyncStatus::AlreadyDisabled;
        }

        if let Some(task) = core.task.take() {
            self.scheduler.cancel(task);
        }
        core.state = SyncState::Stopped;
        self.reset_all(&participants);
        core.baseline.clear();

        info!(participants = participants.len(), "sync stopped");
        SyncStatus::Disabled
    }

    /// Tears the engine down for process shutdown.
    ///
    /// Cancels the tick callback if registered and resets every active
    /// participant. Provider failures are logged and ignored.
    pub fn shutdown(&self) {
        let mut guard = self.core.lock();
        let core = &mut *guard;

        if let Some(task) = core.task.take() {
            self.scheduler.cancel(task);
        }
        core.state = SyncState::Stopped;
        core.baseline.clear();

        let participants = self.adapter.list_active();
        let reset = self.reset_all(&participants);
        info!(reset, "engine shut down");
    }

    /// Resets a participant that just became active.
    ///
    /// Only acts while running; the participant picks up the baseline on a
    /// later tick. Returns true if the participant was reset.
    pub fn on_participant_join(&self, id: &P::Id) -> bool {
        let core = self.core.lock();
        if !core.state.is_running() {
            return false;
        }

        match self.adapter.reset(id) {
            Ok(()) => {
                self.stats.write().resets += 1;
                debug!(participant = ?id, "reset joining participant");
                true
            }
            Err(e) => {
                self.record_skip(id, &e);
                false
            }
        }
    }

    /// Runs one scan-and-broadcast cycle.
    ///
    /// Does nothing unless running. The first participant, in enumeration
    /// order, whose fingerprint differs from the baseline becomes the new
    /// baseline and ends the scan. The baseline is then applied to every
    /// listed participant, originator included, unless that fingerprint was
    /// already broadcast.
    pub fn tick(&self) -> TickReport<P::Id> {
        let mut guard = self.core.lock();
        let core = &mut *guard;
        let mut report = TickReport::idle();

        if !core.state.is_running() {
            return report;
        }
        report.ran = true;
        self.stats.write().ticks += 1;

        let participants = self.adapter.list_active();
        report.participants = participants.len();
        if participants.is_empty() {
            return report;
        }

        // An empty baseline is seeded from the first capturable participant.
        for id in &participants {
            let snapshot = match self.adapter.capture(id) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    self.record_skip(id, &e);
                    report.skipped += 1;
                    continue;
                }
            };

            let Some(baseline) = core.baseline.fingerprint() else {
                debug!(
                    participant = ?id,
                    fingerprint = %snapshot.fingerprint(),
                    "seeded baseline"
                );
                core.baseline.replace(snapshot);
                report.seeded = true;
                continue;
            };

            if snapshot.fingerprint() != baseline {
                debug!(
                    participant = ?id,
                    from = ?core.baseline.fingerprint(),
                    to = %snapshot.fingerprint(),
                    "divergence detected"
                );
                core.baseline.replace(snapshot);
                report.diverged = Some(id.clone());
                self.stats.write().divergences += 1;
                break;
            }
        }

        if let Some(snapshot) = core.baseline.pending_broadcast() {
            let fingerprint = snapshot.fingerprint();
            for id in &participants {
                match self.adapter.apply(id, snapshot) {
                    Ok(()) => report.applied += 1,
                    Err(e) => {
                        self.record_skip(id, &e);
                        report.skipped += 1;
                    }
                }
            }
            report.broadcast = Some(fingerprint);
        }

        if let Some(fingerprint) = report.broadcast {
            core.baseline.mark_broadcast(fingerprint);
            let mut stats = self.stats.write();
            stats.broadcasts += 1;
            stats.applies += report.applied as u64;
            stats.last_broadcast_time = Some(Instant::now());
            info!(%fingerprint, applied = report.applied, "broadcast baseline");
        }

        report
    }

    /// Resets each participant, returning how many succeeded.
    fn reset_all(&self, participants: &[P::Id]) -> usize {
        let mut reset = 0;
        for id in participants {
            match self.adapter.reset(id) {
                Ok(()) => reset += 1,
                Err(e) => self.record_skip(id, &e),
            }
        }
        self.stats.write().resets += reset as u64;
        reset
    }

    fn record_skip(&self, id: &P::Id, error: &ProviderError) {
        if error.is_transient() {
            debug!(participant = ?id, "participant left, skipping");
        } else {
            warn!(participant = ?id, error = %error, "provider call failed, skipping");
        }
        self.stats.write().skipped += 1;
    }
}

impl<P: ParticipantProvider> Drop for ConvergenceEngine<P> {
    fn drop(&mut self) {
        if let Some(task) = self.core.get_mut().task.take() {
            self.scheduler.cancel(task);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryProvider;
    use crate::scheduler::ManualScheduler;
    use crate::EngineError;

    struct Harness {
        provider: Arc<MemoryProvider>,
        scheduler: Arc<ManualScheduler>,
        engine: Arc<ConvergenceEngine<MemoryProvider>>,
    }

    fn harness(names: &[&str]) -> Harness {
        let provider = Arc::new(MemoryProvider::new());
        for name in names {
            provider.join(name);
        }
        let scheduler = Arc::new(ManualScheduler::new());
        let engine = ConvergenceEngine::new(
            EngineConfig::default(),
            Arc::clone(&provider),
            scheduler.clone(),
        );
        Harness {
            provider,
            scheduler,
            engine,
        }
    }

    #[test]
    fn sync_state_checks() {
        assert!(SyncState::Running.is_running());
        assert!(!SyncState::Stopped.is_running());
        assert_eq!(SyncState::default(), SyncState::Stopped);
    }

    #[test]
    fn status_messages() {
        assert!(SyncStatus::AlreadyEnabled.is_redundant());
        assert!(SyncStatus::AlreadyDisabled.is_redundant());
        assert!(!SyncStatus::Enabled.is_redundant());
        assert_eq!(SyncStatus::Enabled.tone(), StatusTone::Success);
        assert_eq!(SyncStatus::Disabled.tone(), StatusTone::Warning);
        assert_eq!(
            SyncStatus::AlreadyEnabled.to_string(),
            "Sharing is already enabled."
        );
    }

    #[test]
    fn engine_initial_state() {
        let h = harness(&["alex"]);
        assert_eq!(h.engine.state(), SyncState::Stopped);
        assert_eq!(h.engine.baseline_fingerprint(), None);
        assert_eq!(h.engine.last_broadcast(), None);
        assert_eq!(h.engine.stats().ticks, 0);
    }

    #[test]
    fn start_registers_tick_and_seeds_baseline() {
        let h = harness(&["alex", "sam"]);
        h.provider.update("alex", |record| record.vitals.food = 4);

        assert_eq!(h.engine.start_sync().unwrap(), SyncStatus::Enabled);
        assert_eq!(h.engine.state(), SyncState::Running);
        assert_eq!(h.scheduler.task_count(), 1);

        // The seed is taken after the reset, so the food change is gone.
        assert_eq!(h.provider.record("alex").unwrap().vitals.food, 20);
        assert_eq!(
            h.engine.baseline_fingerprint(),
            Some(StateSnapshot::default().fingerprint())
        );
        assert_eq!(h.engine.last_broadcast(), None);
    }

    #[test]
    fn start_twice_is_redundant() {
        let h = harness(&["alex"]);
        h.engine.start_sync().unwrap();
        h.provider.update("alex", |record| record.vitals.food = 4);

        assert_eq!(h.engine.start_sync().unwrap(), SyncStatus::AlreadyEnabled);
        assert_eq!(h.scheduler.task_count(), 1);
        // No reset on the redundant start.
        assert_eq!(h.provider.record("alex").unwrap().vitals.food, 4);
    }

    #[test]
    fn start_fails_when_scheduler_rejects() {
        let h = harness(&["alex"]);
        h.scheduler.set_rejecting(true);

        assert!(matches!(
            h.engine.start_sync(),
            Err(EngineError::Scheduler(_))
        ));
        assert_eq!(h.engine.state(), SyncState::Stopped);
        assert_eq!(h.engine.baseline_fingerprint(), None);
    }

    #[test]
    fn start_rejects_invalid_config() {
        let provider = Arc::new(MemoryProvider::new());
        let scheduler = Arc::new(ManualScheduler::new());
        let engine = ConvergenceEngine::new(
            EngineConfig::new().with_tick_period(std::time::Duration::ZERO),
            provider,
            scheduler.clone(),
        );

        assert!(matches!(
            engine.start_sync(),
            Err(EngineError::InvalidConfig(_))
        ));
        assert_eq!(scheduler.task_count(), 0);
    }

    #[test]
    fn first_tick_broadcasts_seed_once() {
        let h = harness(&["alex", "sam"]);
        h.engine.start_sync().unwrap();

        let report = h.engine.tick();
        assert!(report.ran);
        assert_eq!(report.diverged, None);
        assert_eq!(report.broadcast, h.engine.baseline_fingerprint());
        assert_eq!(report.applied, 2);

        let writes = h.provider.total_writes();
        for _ in 0..5 {
            let report = h.engine.tick();
            assert_eq!(report.broadcast, None);
            assert_eq!(report.applied, 0);
        }
        assert_eq!(h.provider.total_writes(), writes);
        assert_eq!(h.engine.stats().broadcasts, 1);
    }

    #[test]
    fn divergence_is_broadcast_to_everyone() {
        let h = harness(&["alex", "sam"]);
        h.engine.start_sync().unwrap();
        h.engine.tick();
        let seed = h.engine.baseline_fingerprint();

        h.provider.update("alex", |record| record.vitals.health = 5.0);
        let report = h.engine.tick();

        assert_eq!(report.diverged.as_deref(), Some("alex"));
        assert_ne!(h.engine.baseline_fingerprint(), seed);
        assert_eq!(report.broadcast, h.engine.baseline_fingerprint());
        assert_eq!(report.applied, 2);
        assert_eq!(h.provider.record("sam").unwrap().vitals.health, 5.0);
    }

    #[test]
    fn first_divergence_wins_the_tick() {
        let h = harness(&["a", "b", "c"]);
        h.engine.start_sync().unwrap();
        h.engine.tick();

        h.provider.update("b", |record| record.experience.level = 2);
        h.provider.update("c", |record| record.experience.level = 9);

        let report = h.engine.tick();
        assert_eq!(report.diverged.as_deref(), Some("b"));
        assert_eq!(h.engine.baseline().unwrap().experience().level, 2);
        assert_eq!(h.provider.record("c").unwrap().experience.level, 2);
    }

    #[test]
    fn stop_resets_and_cancels() {
        let h = harness(&["alex", "sam"]);
        h.engine.start_sync().unwrap();
        h.provider.update("alex", |record| record.vitals.health = 5.0);
        h.scheduler.advance(2);
        assert_eq!(h.provider.record("sam").unwrap().vitals.health, 5.0);

        assert_eq!(h.engine.stop_sync(), SyncStatus::Disabled);
        assert_eq!(h.engine.state(), SyncState::Stopped);
        assert_eq!(h.scheduler.task_count(), 0);
        assert_eq!(h.engine.baseline_fingerprint(), None);
        assert_eq!(h.provider.record("alex").unwrap().vitals.health, 20.0);
        assert_eq!(h.provider.record("sam").unwrap().vitals.health, 20.0);

        h.provider.update("alex", |record| record.vitals.health = 3.0);
        let report = h.engine.tick();
        assert!(!report.ran);
        assert_eq!(h.provider.record("sam").unwrap().vitals.health, 20.0);
    }

    #[test]
    fn stop_while_stopped_still_resets() {
        let h = harness(&["alex"]);
        h.provider.update("alex", |record| record.vitals.food = 1);

        assert_eq!(h.engine.stop_sync(), SyncStatus::AlreadyDisabled);
        assert_eq!(h.provider.record("alex").unwrap().vitals.food, 20);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let h = harness(&["alex"]);
        h.engine.start_sync().unwrap();

        h.engine.shutdown();
        h.engine.shutdown();
        assert_eq!(h.engine.state(), SyncState::Stopped);
        assert_eq!(h.scheduler.task_count(), 0);
    }

    #[test]
    fn shutdown_survives_provider_faults() {
        let h = harness(&["alex", "sam"]);
        h.engine.start_sync().unwrap();
        h.provider.set_fault("alex", Some("backend gone"));
        h.provider.update("sam", |record| record.vitals.food = 2);

        h.engine.shutdown();
        assert_eq!(h.provider.record("sam").unwrap().vitals.food, 20);
        assert!(h.engine.stats().skipped >= 1);
    }

    #[test]
    fn join_resets_only_while_running() {
        let h = harness(&["alex"]);
        h.provider.join("sam");
        h.provider.update("sam", |record| record.vitals.food = 2);

        assert!(!h.engine.on_participant_join(&"sam".to_string()));
        assert_eq!(h.provider.record("sam").unwrap().vitals.food, 2);

        h.engine.start_sync().unwrap();
        h.provider.join("kim");
        h.provider.update("kim", |record| record.vitals.food = 2);
        assert!(h.engine.on_participant_join(&"kim".to_string()));
        assert_eq!(h.provider.record("kim").unwrap().vitals.food, 20);
    }

    #[test]
    fn tick_with_no_participants_is_empty() {
        let h = harness(&[]);
        h.engine.start_sync().unwrap();

        let report = h.engine.tick();
        assert!(report.ran);
        assert_eq!(report.participants, 0);
        assert_eq!(h.engine.baseline_fingerprint(), None);
    }

    #[test]
    fn tick_seeds_when_started_empty() {
        let h = harness(&[]);
        h.engine.start_sync().unwrap();
        h.provider.join("alex");
        h.provider.update("alex", |record| record.vitals.food = 7);

        let report = h.engine.tick();
        assert!(report.seeded);
        assert_eq!(report.diverged, None);
        assert!(report.broadcast.is_some());
        assert_eq!(h.engine.baseline().unwrap().vitals().food, 7);
    }

    #[test]
    fn faulty_participant_does_not_abort_tick() {
        let h = harness(&["a", "b", "c"]);
        h.engine.start_sync().unwrap();
        h.engine.tick();

        h.provider.set_fault("b", Some("timeout"));
        h.provider.update("c", |record| record.vitals.food = 6);

        let report = h.engine.tick();
        assert_eq!(report.diverged.as_deref(), Some("c"));
        assert_eq!(report.applied, 2);
        assert_eq!(report.skipped, 2);
        assert_eq!(h.provider.record("a").unwrap().vitals.food, 6);
    }

    #[test]
    fn dropping_engine_cancels_tick() {
        let h = harness(&["alex"]);
        h.engine.start_sync().unwrap();
        assert_eq!(h.scheduler.task_count(), 1);

        let Harness {
            scheduler, engine, ..
        } = h;
        drop(engine);
        assert_eq!(scheduler.task_count(), 0);
    }
}
