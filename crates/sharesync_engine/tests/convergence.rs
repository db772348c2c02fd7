//! Integration tests for the convergence engine.
//!
//! These drive the engine through the scheduler the way a host would and
//! check participant state through the memory provider.

use sharesync_engine::{
    ConvergenceEngine, EngineConfig, EngineError, ManualScheduler, MemoryProvider,
    ParticipantRecord, SyncState, SyncStatus, TaskId,
};
use sharesync_state::{ItemStack, SlotRef, StateSnapshot, StatusEffect};
use sharesync_testkit::prelude::*;
use std::sync::Arc;

#[test]
fn test_two_participants_follow_external_change() {
    let session = TestSession::with_participants(&["A", "B"]);
    assert_eq!(session.start(), SyncStatus::Enabled);

    let f0 = session.engine.baseline_fingerprint().unwrap();
    assert_eq!(f0, session.fingerprint("A"));

    // The seed is broadcast once, then unchanged ticks write nothing.
    session.tick_n(1);
    let writes = session.provider.total_writes();
    let report = session.tick();
    assert_eq!(report.applied, 0);
    assert_eq!(session.provider.total_writes(), writes);

    session.update("A", |record| record.vitals.health = 5.0);
    let report = session.tick();

    let f1 = session.engine.baseline_fingerprint().unwrap();
    assert_ne!(f1, f0);
    assert_eq!(report.diverged.as_deref(), Some("A"));
    assert_eq!(report.applied, 2);
    assert_eq!(session.record("B").vitals.health, 5.0);
    assert!(session.converged());
}

#[test]
fn test_stop_resets_everyone_and_ignores_stray_ticks() {
    let session = TestSession::with_participants(&["A", "B"]);
    session.start();
    session.update("A", scenarios::load_up);
    session.tick_n(1);
    assert_eq!(session.record("B").experience.level, 7);

    assert_eq!(session.stop(), SyncStatus::Disabled);
    assert_eq!(session.scheduler.task_count(), 0);

    let fresh = StateSnapshot::default().fingerprint();
    assert_eq!(session.fingerprint("A"), fresh);
    assert_eq!(session.fingerprint("B"), fresh);

    session.update("A", |record| record.vitals.food = 2);
    let report = session.tick();
    assert!(!report.ran);
    assert_eq!(session.record("B").vitals.food, 20);
}

#[test]
fn test_participant_joining_mid_run_receives_baseline() {
    let session = TestSession::with_participants(&["A", "B"]);
    session.start();
    session.update("A", scenarios::load_up);
    session.tick_n(1);

    session.provider.join("C");
    session.update("C", |record| record.vitals.food = 1);
    assert!(session.engine.on_participant_join(&"C".to_string()));
    assert_eq!(session.record("C").vitals.food, 20);

    let report = session.tick();
    assert_eq!(report.diverged.as_deref(), Some("C"));
    // C's reset state is now the baseline and is pushed to everyone.
    assert!(session.converged());
    assert_eq!(session.record("A").experience.level, 0);
}

#[test]
fn test_joiner_matching_baseline_gets_no_writes() {
    let session = TestSession::with_participants(&["A"]);
    session.start();
    session.tick_n(1);

    assert!(session.join("B"));
    let writes = session.provider.writes("B");
    let report = session.tick();
    assert_eq!(report.diverged, None);
    assert_eq!(report.broadcast, None);
    assert_eq!(session.provider.writes("B"), writes);
}

#[test]
fn test_earliest_divergence_wins() {
    let session = TestSession::with_participants(&["A", "B", "C"]);
    session.start();
    session.tick_n(1);

    session.update("B", |record| record.vitals.food = 11);
    session.update("C", |record| record.vitals.food = 3);

    let report = session.tick();
    assert_eq!(report.diverged.as_deref(), Some("B"));
    for name in ["A", "B", "C"] {
        assert_eq!(session.record(name).vitals.food, 11);
    }

    // C's edit was overwritten, so the next tick is quiet.
    let report = session.tick();
    assert_eq!(report.diverged, None);
    assert_eq!(report.broadcast, None);
}

#[test]
fn test_idempotent_broadcast() {
    let session = scenarios::converged_session(4);
    session.update("p2", |record| {
        record
            .inventory
            .set(SlotRef::Container(5), Some(ItemStack::new("minecraft:torch", 32)))
            .unwrap();
    });

    session.tick_n(1);
    let broadcasts = session.engine.stats().broadcasts;
    let writes = session.provider.total_writes();

    session.tick_n(10);
    assert_eq!(session.engine.stats().broadcasts, broadcasts);
    assert_eq!(session.provider.total_writes(), writes);
    assert_eq!(session.engine.stats().ticks, 12);
}

#[test]
fn test_broadcast_reaches_originator() {
    let session = scenarios::converged_session(2);
    let before = session.provider.writes("p0");

    session.update("p0", |record| record.vitals.food = 9);
    let report = session.tick();

    assert_eq!(report.diverged.as_deref(), Some("p0"));
    assert!(session.provider.writes("p0") > before);
}

#[test]
fn test_apply_clamps_to_target_ceiling() {
    let session = TestSession::new();
    session.provider.join("tank");
    session
        .provider
        .join_with("glass", ParticipantRecord::new().with_max_health(Some(6.0)));
    session.start();
    session.tick_n(1);

    session.update("tank", |record| record.vitals.health = 18.0);
    session.tick_n(1);
    assert_eq!(session.record("glass").vitals.health, 6.0);

    // The clamped copy differs, so glass becomes the next baseline.
    let report = session.tick();
    assert_eq!(report.diverged.as_deref(), Some("glass"));
    assert_eq!(session.record("tank").vitals.health, 6.0);
}

#[test]
fn test_effects_converge_as_sets() {
    let session = scenarios::converged_session(2);
    session.update("p1", |record| {
        record.effects.push(StatusEffect::new("minecraft:haste", 200, 1));
        record.effects.push(StatusEffect::new("minecraft:speed", 100, 0));
    });
    session.tick_n(1);

    session.update("p0", |record| record.effects.reverse());
    let report = session.tick();
    assert_eq!(report.diverged, None);
    assert!(session.converged());
}

#[test]
fn test_vanished_participant_is_skipped() {
    let inner = Arc::new(MemoryProvider::new());
    for name in ["A", "B", "C"] {
        inner.join(name);
    }
    let roster = Arc::new(FrozenRoster::new(Arc::clone(&inner)));
    let scheduler = Arc::new(ManualScheduler::new());
    let engine = ConvergenceEngine::new(EngineConfig::default(), Arc::clone(&roster), scheduler);
    engine.start_sync().unwrap();
    engine.tick();

    roster.freeze();
    inner.update("C", |record| record.vitals.food = 4);
    inner.leave("B");

    let report = engine.tick();
    assert_eq!(report.participants, 3);
    assert_eq!(report.diverged.as_deref(), Some("C"));
    assert_eq!(report.applied, 2);
    assert_eq!(report.skipped, 2);
    assert_eq!(inner.record("A").unwrap().vitals.food, 4);
}

#[test]
fn test_departed_first_participant_does_not_block_others() {
    let inner = Arc::new(MemoryProvider::new());
    for name in ["A", "B", "C"] {
        inner.join(name);
    }
    let roster = Arc::new(FrozenRoster::new(Arc::clone(&inner)));
    roster.freeze();
    inner.leave("A");

    let scheduler = Arc::new(ManualScheduler::new());
    let engine = ConvergenceEngine::new(EngineConfig::default(), Arc::clone(&roster), scheduler);
    engine.start_sync().unwrap();
    assert!(engine.baseline_fingerprint().is_some());

    inner.update("B", |record| record.vitals.food = 4);
    let report = engine.tick();
    assert_eq!(report.diverged.as_deref(), Some("B"));
    assert_eq!(report.applied, 2);
    assert_eq!(inner.record("C").unwrap().vitals.food, 4);
}

#[test]
fn test_tick_seeds_from_first_readable_participant() {
    let session = TestSession::with_participants(&["p0", "p1", "p2"]);
    for name in ["p0", "p1", "p2"] {
        session.provider.set_fault(name, Some("offline"));
    }
    session.start();
    assert_eq!(session.engine.baseline_fingerprint(), None);

    session.provider.set_fault("p1", None);
    session.provider.set_fault("p2", None);
    session.update("p2", |record| record.vitals.food = 4);

    let report = session.tick();
    assert!(report.seeded);
    assert_eq!(report.diverged.as_deref(), Some("p2"));
    assert_eq!(report.skipped, 2);
    assert_eq!(session.record("p1").vitals.food, 4);
    assert_eq!(session.record("p0").vitals.food, 20);
}

#[test]
fn test_backend_fault_skips_only_that_participant() {
    let session = scenarios::converged_session(3);
    session.provider.set_fault("p0", Some("connection reset"));
    session.update("p1", |record| record.experience.level = 3);

    let report = session.tick();
    assert_eq!(report.diverged.as_deref(), Some("p1"));
    assert_eq!(session.record("p2").experience.level, 3);
    assert_eq!(session.record("p0").experience.level, 0);

    // Once readable again, its stale state counts as a divergence.
    session.provider.set_fault("p0", None);
    let report = session.tick();
    assert_eq!(report.diverged.as_deref(), Some("p0"));
}

#[test]
fn test_scheduler_rejection_leaves_engine_stopped() {
    let session = TestSession::with_participants(&["A"]);
    session.scheduler.set_rejecting(true);

    let result = session.engine.start_sync();
    assert!(matches!(result, Err(EngineError::Scheduler(_))));
    assert_eq!(session.engine.state(), SyncState::Stopped);

    session.scheduler.set_rejecting(false);
    assert_eq!(session.start(), SyncStatus::Enabled);
}

#[test]
fn test_restart_after_stop() {
    let session = TestSession::with_participants(&["A", "B"]);
    session.start();
    session.stop();
    assert_eq!(session.stop(), SyncStatus::AlreadyDisabled);

    assert_eq!(session.start(), SyncStatus::Enabled);
    assert_eq!(session.scheduler.task_count(), 1);
    session.update("B", |record| record.vitals.food = 5);
    session.tick_n(2);
    assert_eq!(session.record("A").vitals.food, 5);
}

#[test]
fn test_tick_period_is_passed_to_scheduler() {
    let config = EngineConfig::new().with_tick_period(std::time::Duration::from_millis(250));
    let session = TestSession::with_config(config);
    session.start();

    assert_eq!(
        session.scheduler.period_of(TaskId::new(0)),
        Some(std::time::Duration::from_millis(250))
    );
}

#[test]
fn test_empty_roster_start_then_join() {
    let session = TestSession::new();
    assert_eq!(session.start(), SyncStatus::Enabled);
    assert_eq!(session.engine.baseline_fingerprint(), None);

    session.join("A");
    session.update("A", |record| record.vitals.food = 8);
    let report = session.tick();
    assert!(report.seeded);
    assert_eq!(session.engine.baseline().unwrap().vitals().food, 8);
    assert_eq!(session.provider.len(), 1);
}
