//! # ShareSync State
//!
//! Participant state snapshots and deterministic fingerprints for ShareSync.
//!
//! This crate provides:
//! - `StateSnapshot`, the immutable capture of one participant's state
//! - Item, effect, vitals and experience value types
//! - The `Fingerprint` digest used as the equality proxy between snapshots
//! - JSON encoding of snapshot documents
//!
//! This is a pure data crate with no I/O operations.
//!
//! ## Fingerprints
//!
//! Fingerprints are 32-bit polynomial hashes with a fixed field order, so two
//! independent builds agree bit-for-bit. They are allowed to collide; callers
//! accept a small chance of treating two different snapshots as equal in
//! exchange for constant-time comparison.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod effect;
mod error;
mod fingerprint;
mod item;
mod snapshot;
mod vitals;

pub use effect::{EffectKind, EffectSet, StatusEffect};
pub use error::{StateError, StateResult};
pub use fingerprint::{Fingerprint, Fold, StateHash};
pub use item::{Inventory, ItemStack, SlotRef, ARMOR_SLOTS, CONTAINER_SLOTS};
pub use snapshot::StateSnapshot;
pub use vitals::{
    Experience, Vitals, DEFAULT_MAX_AIR, DEFAULT_MAX_HEALTH, MAX_FOOD_LEVEL, RESET_SATURATION,
};
