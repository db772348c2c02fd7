//! Capture, apply and reset against a single participant.

use crate::error::{ProviderError, ProviderResult};
use crate::provider::ParticipantProvider;
use sharesync_state::{EffectSet, Experience, StateSnapshot, StatusEffect, Vitals};
use std::sync::Arc;

/// Translates between snapshots and a participant provider.
///
/// Every operation checks that the participant is still active before
/// touching it and fails with [`ProviderError::Inactive`] otherwise. Writes
/// are clamped to what the target participant can hold.
pub struct StateAdapter<P: ParticipantProvider> {
    provider: Arc<P>,
    fallback_max_health: f64,
}

impl<P: ParticipantProvider> StateAdapter<P> {
    /// Creates an adapter over `provider`.
    pub fn new(provider: Arc<P>, fallback_max_health: f64) -> Self {
        Self {
            provider,
            fallback_max_health,
        }
    }

    /// Returns the underlying provider.
    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Lists active participants.
    pub fn list_active(&self) -> Vec<P::Id> {
        self.provider.list_active()
    }

    /// Captures the participant's full state.
    pub fn capture(&self, id: &P::Id) -> ProviderResult<StateSnapshot> {
        self.ensure_active(id)?;

        let inventory = self.provider.inventory(id)?;
        let vitals = self.provider.vitals(id)?;
        let experience = self.provider.experience(id)?;
        let effects: EffectSet = self.provider.active_effects(id)?.into_iter().collect();

        Ok(StateSnapshot::new(inventory, vitals, experience, effects))
    }

    /// Writes `snapshot` onto the participant.
    pub fn apply(&self, id: &P::Id, snapshot: &StateSnapshot) -> ProviderResult<()> {
        self.ensure_active(id)?;

        self.provider.set_inventory(id, snapshot.inventory().clone())?;
        self.replace_effects(id, snapshot.effects().iter().cloned())?;

        let max_health = self.max_health(id)?;
        let max_air = self.provider.max_air(id)?;
        self.provider
            .set_vitals(id, snapshot.vitals().clamped(max_health, max_air))?;
        self.provider
            .set_experience(id, snapshot.experience().clamped())?;

        Ok(())
    }

    /// Puts the participant back to a clean slate.
    ///
    /// Empties every slot, removes all effects, restores vitals to their
    /// fresh values and zeroes experience.
    pub fn reset(&self, id: &P::Id) -> ProviderResult<()> {
        self.ensure_active(id)?;

        let cleared = self.provider.inventory(id)?.cleared();
        self.provider.set_inventory(id, cleared)?;
        self.replace_effects(id, std::iter::empty())?;

        let max_health = self.max_health(id)?;
        let max_air = self.provider.max_air(id)?;
        self.provider
            .set_vitals(id, Vitals::fresh(max_health, max_air))?;
        self.provider.set_experience(id, Experience::default())?;

        Ok(())
    }

    fn ensure_active(&self, id: &P::Id) -> ProviderResult<()> {
        if self.provider.is_active(id) {
            Ok(())
        } else {
            Err(ProviderError::Inactive)
        }
    }

    fn max_health(&self, id: &P::Id) -> ProviderResult<f64> {
        Ok(self
            .provider
            .max_health(id)?
            .unwrap_or(self.fallback_max_health))
    }

    /// Clears every current effect, then adds `effects`.
    fn replace_effects(
        &self,
        id: &P::Id,
        effects: impl IntoIterator<Item = StatusEffect>,
    ) -> ProviderResult<()> {
        for effect in self.provider.active_effects(id)? {
            self.provider.remove_effect(id, &effect.kind)?;
        }
        for effect in effects {
            self.provider.add_effect(id, effect)?;
        }
        Ok(())
    }
}
