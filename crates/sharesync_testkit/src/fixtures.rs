//! Test fixtures and engine helpers.
//!
//! Provides convenience types for setting up an engine over in-memory
//! participants and for reproducing awkward provider timing.

use parking_lot::Mutex;
use sharesync_engine::{
    ConvergenceEngine, EngineConfig, ManualScheduler, MemoryProvider, ParticipantProvider,
    ParticipantRecord, ProviderResult, SyncStatus, TickReport,
};
use sharesync_state::{
    EffectKind, Experience, Fingerprint, Inventory, StateSnapshot, StatusEffect, Vitals,
};
use std::sync::Arc;

/// An engine over in-memory participants driven by a manual scheduler.
pub struct TestSession {
    /// The participant provider.
    pub provider: Arc<MemoryProvider>,
    /// The scheduler driving ticks.
    pub scheduler: Arc<ManualScheduler>,
    /// The engine under test.
    pub engine: Arc<ConvergenceEngine<MemoryProvider>>,
}

impl TestSession {
    /// Creates a session with no participants.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates a session with the given engine configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        let provider = Arc::new(MemoryProvider::new());
        let scheduler = Arc::new(ManualScheduler::new());
        let engine = ConvergenceEngine::new(config, Arc::clone(&provider), scheduler.clone());
        Self {
            provider,
            scheduler,
            engine,
        }
    }

    /// Creates a session with participants joined in the given order.
    pub fn with_participants(names: &[&str]) -> Self {
        let session = Self::new();
        for name in names {
            session.provider.join(name);
        }
        session
    }

    /// Starts syncing, panicking on failure.
    pub fn start(&self) -> SyncStatus {
        self.engine.start_sync().expect("Failed to start sync")
    }

    /// Stops syncing.
    pub fn stop(&self) -> SyncStatus {
        self.engine.stop_sync()
    }

    /// Joins a participant and notifies the engine, like a host would.
    pub fn join(&self, name: &str) -> bool {
        self.provider.join(name) && self.engine.on_participant_join(&name.to_string())
    }

    /// Runs `ticks` scheduler rounds.
    pub fn tick_n(&self, ticks: u32) -> usize {
        self.scheduler.advance(ticks)
    }

    /// Runs one tick directly on the engine.
    pub fn tick(&self) -> TickReport<String> {
        self.engine.tick()
    }

    /// Mutates a participant from outside the engine.
    pub fn update(&self, name: &str, edit: impl FnOnce(&mut ParticipantRecord)) {
        assert!(self.provider.update(name, edit), "unknown participant {name}");
    }

    /// Returns a participant's record.
    pub fn record(&self, name: &str) -> ParticipantRecord {
        self.provider
            .record(name)
            .unwrap_or_else(|| panic!("unknown participant {name}"))
    }

    /// Captures a participant.
    pub fn snapshot(&self, name: &str) -> StateSnapshot {
        self.engine
            .capture(&name.to_string())
            .expect("Failed to capture participant")
    }

    /// Fingerprint of a participant's current state.
    pub fn fingerprint(&self, name: &str) -> Fingerprint {
        self.snapshot(name).fingerprint()
    }

    /// Returns true if every participant matches the baseline.
    pub fn converged(&self) -> bool {
        let Some(baseline) = self.engine.baseline_fingerprint() else {
            return self.provider.is_empty();
        };
        self.provider
            .list_active()
            .iter()
            .all(|name| self.fingerprint(name) == baseline)
    }
}

impl Default for TestSession {
    fn default() -> Self {
        Self::new()
    }
}

/// A provider whose enumeration can be pinned.
///
/// While frozen, [`ParticipantProvider::list_active`] keeps returning the
/// roster captured by [`FrozenRoster::freeze`] even after participants leave
/// the inner provider. Every other call is forwarded, so accesses to a
/// departed participant fail the way they would if it left between
/// enumeration and access.
pub struct FrozenRoster<P: ParticipantProvider> {
    inner: Arc<P>,
    roster: Mutex<Option<Vec<P::Id>>>,
}

impl<P: ParticipantProvider> FrozenRoster<P> {
    /// Wraps `inner`, initially unfrozen.
    pub fn new(inner: Arc<P>) -> Self {
        Self {
            inner,
            roster: Mutex::new(None),
        }
    }

    /// Pins the current enumeration.
    pub fn freeze(&self) {
        *self.roster.lock() = Some(self.inner.list_active());
    }

    /// Returns to live enumeration.
    pub fn thaw(&self) {
        *self.roster.lock() = None;
    }

    /// Returns the wrapped provider.
    pub fn inner(&self) -> &Arc<P> {
        &self.inner
    }
}

impl<P: ParticipantProvider> ParticipantProvider for FrozenRoster<P> {
    type Id = P::Id;

    fn list_active(&self) -> Vec<Self::Id> {
        match &*self.roster.lock() {
            Some(roster) => roster.clone(),
            None => self.inner.list_active(),
        }
    }

    fn is_active(&self, id: &Self::Id) -> bool {
        self.inner.is_active(id)
    }

    fn inventory(&self, id: &Self::Id) -> ProviderResult<Inventory> {
        self.inner.inventory(id)
    }

    fn set_inventory(&self, id: &Self::Id, inventory: Inventory) -> ProviderResult<()> {
        self.inner.set_inventory(id, inventory)
    }

    fn vitals(&self, id: &Self::Id) -> ProviderResult<Vitals> {
        self.inner.vitals(id)
    }

    fn set_vitals(&self, id: &Self::Id, vitals: Vitals) -> ProviderResult<()> {
        self.inner.set_vitals(id, vitals)
    }

    fn max_health(&self, id: &Self::Id) -> ProviderResult<Option<f64>> {
        self.inner.max_health(id)
    }

    fn max_air(&self, id: &Self::Id) -> ProviderResult<i32> {
        self.inner.max_air(id)
    }

    fn active_effects(&self, id: &Self::Id) -> ProviderResult<Vec<StatusEffect>> {
        self.inner.active_effects(id)
    }

    fn remove_effect(&self, id: &Self::Id, kind: &EffectKind) -> ProviderResult<()> {
        self.inner.remove_effect(id, kind)
    }

    fn add_effect(&self, id: &Self::Id, effect: StatusEffect) -> ProviderResult<()> {
        self.inner.add_effect(id, effect)
    }

    fn experience(&self, id: &Self::Id) -> ProviderResult<Experience> {
        self.inner.experience(id)
    }

    fn set_experience(&self, id: &Self::Id, experience: Experience) -> ProviderResult<()> {
        self.inner.set_experience(id, experience)
    }
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use sharesync_state::{ItemStack, SlotRef};

    /// Names `p0`, `p1`, ... for `count` participants.
    pub fn participant_names(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("p{i}")).collect()
    }

    /// A running session with `count` participants, already converged.
    pub fn converged_session(count: usize) -> TestSession {
        let session = TestSession::new();
        for name in participant_names(count) {
            session.provider.join(&name);
        }
        session.start();
        session.tick_n(1);
        session
    }

    /// Gives a participant a loaded inventory and a few effects.
    pub fn load_up(record: &mut ParticipantRecord) {
        record.inventory.contents[0] = Some(
            ItemStack::new("minecraft:diamond_sword", 1)
                .with_damage(12)
                .with_enchantment("minecraft:sharpness", 5),
        );
        record.inventory.contents[8] = Some(ItemStack::new("minecraft:bread", 16));
        record
            .inventory
            .set(SlotRef::Offhand, Some(ItemStack::new("minecraft:shield", 1)))
            .expect("Offhand slot always exists");
        record.vitals.health = 13.5;
        record.experience.level = 7;
        record.effects.push(StatusEffect::new("minecraft:speed", 600, 1));
    }
}
