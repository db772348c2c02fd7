//! Participant provider abstraction.

use crate::error::ProviderResult;
use sharesync_state::{EffectKind, Experience, Inventory, StatusEffect, Vitals};
use std::fmt;

/// Read/write access to the participants the engine keeps in sync.
///
/// This trait abstracts the host's participant API (a game server, a test
/// double, ...). Implementations use interior mutability; every method takes
/// `&self`. Calls for a participant that has gone away return
/// [`crate::ProviderError::Inactive`].
pub trait ParticipantProvider: Send + Sync {
    /// Identifier of a participant.
    type Id: Clone + Eq + fmt::Debug + Send + Sync;

    /// Lists active participants in a stable order.
    fn list_active(&self) -> Vec<Self::Id>;

    /// Returns true if the participant is still active.
    fn is_active(&self, id: &Self::Id) -> bool;

    /// Reads the inventory.
    fn inventory(&self, id: &Self::Id) -> ProviderResult<Inventory>;

    /// Replaces the inventory.
    fn set_inventory(&self, id: &Self::Id, inventory: Inventory) -> ProviderResult<()>;

    /// Reads the vitals.
    fn vitals(&self, id: &Self::Id) -> ProviderResult<Vitals>;

    /// Replaces the vitals.
    fn set_vitals(&self, id: &Self::Id, vitals: Vitals) -> ProviderResult<()>;

    /// Returns the participant's health ceiling, if it has one.
    fn max_health(&self, id: &Self::Id) -> ProviderResult<Option<f64>>;

    /// Returns the participant's breath ceiling.
    fn max_air(&self, id: &Self::Id) -> ProviderResult<i32>;

    /// Lists active effects in no particular order.
    fn active_effects(&self, id: &Self::Id) -> ProviderResult<Vec<StatusEffect>>;

    /// Removes the effect of the given kind.
    fn remove_effect(&self, id: &Self::Id, kind: &EffectKind) -> ProviderResult<()>;

    /// Adds an effect, replacing one of the same kind.
    fn add_effect(&self, id: &Self::Id, effect: StatusEffect) -> ProviderResult<()>;

    /// Reads the experience.
    fn experience(&self, id: &Self::Id) -> ProviderResult<Experience>;

    /// Replaces the experience.
    fn set_experience(&self, id: &Self::Id, experience: Experience) -> ProviderResult<()>;
}
