//! # ShareSync Engine
//!
//! Convergence engine that keeps a set of participants on one shared state.
//!
//! This crate provides:
//! - Convergence state machine (stopped → running)
//! - Participant provider trait and the capture/apply/reset adapter
//! - Tick scheduler abstraction and a manual scheduler for tests
//! - In-memory participant provider
//!
//! ## Architecture
//!
//! The engine runs a **scan-then-broadcast** cycle on every tick:
//! 1. Capture every active participant in enumeration order
//! 2. The first one whose fingerprint differs from the baseline becomes the
//!    new baseline; scanning stops there
//! 3. If the baseline differs from the last broadcast, apply it to every
//!    active participant
//!
//! ## Key Invariants
//!
//! - Fingerprints are the only equality test
//! - At most one divergence is adopted per tick
//! - A baseline is broadcast at most once until it changes
//! - Participants that vanish mid-tick are skipped, never fatal
//! - Stopping is idempotent and always resets every participant

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod adapter;
mod config;
mod engine;
mod error;
mod memory;
mod provider;
mod scheduler;

pub use adapter::StateAdapter;
pub use config::{EngineConfig, DEFAULT_TICK_PERIOD};
pub use engine::{ConvergenceEngine, EngineStats, StatusTone, SyncState, SyncStatus, TickReport};
pub use error::{EngineError, EngineResult, ProviderError, ProviderResult};
pub use memory::{MemoryProvider, ParticipantRecord};
pub use provider::ParticipantProvider;
pub use scheduler::{ManualScheduler, TaskId, TickCallback, TickScheduler};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
