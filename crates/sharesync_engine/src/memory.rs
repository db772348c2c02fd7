//! In-memory participant provider.

use crate::error::{ProviderError, ProviderResult};
use crate::provider::ParticipantProvider;
use parking_lot::RwLock;
use sharesync_state::{
    EffectKind, Experience, Inventory, StatusEffect, Vitals, DEFAULT_MAX_AIR, DEFAULT_MAX_HEALTH,
};

/// Raw state of one in-memory participant.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantRecord {
    /// Inventory contents.
    pub inventory: Inventory,
    /// Vitals.
    pub vitals: Vitals,
    /// Experience.
    pub experience: Experience,
    /// Active effects in the order they were added.
    pub effects: Vec<StatusEffect>,
    /// Health ceiling; `None` if unknown.
    pub max_health: Option<f64>,
    /// Breath ceiling.
    pub max_air: i32,
}

impl ParticipantRecord {
    /// Creates a record in the default state.
    pub fn new() -> Self {
        Self {
            inventory: Inventory::empty(),
            vitals: Vitals::default(),
            experience: Experience::default(),
            effects: Vec::new(),
            max_health: Some(DEFAULT_MAX_HEALTH),
            max_air: DEFAULT_MAX_AIR,
        }
    }

    /// Sets the health ceiling.
    pub fn with_max_health(mut self, max_health: Option<f64>) -> Self {
        self.max_health = max_health;
        self
    }

    /// Sets the breath ceiling.
    pub fn with_max_air(mut self, max_air: i32) -> Self {
        self.max_air = max_air;
        self
    }
}

impl Default for ParticipantRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct Slot {
    name: String,
    record: ParticipantRecord,
    writes: u64,
    fault: Option<String>,
}

/// Participant provider backed by in-memory records.
///
/// Participants are identified by name and enumerated in join order. Every
/// provider write bumps a per-participant counter, which makes redundant
/// broadcasts observable in tests.
///
/// # Example
///
/// ```
/// use sharesync_engine::{MemoryProvider, ParticipantProvider};
///
/// let provider = MemoryProvider::new();
/// provider.join("alex");
/// provider.join("sam");
/// assert_eq!(provider.list_active(), vec!["alex".to_string(), "sam".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryProvider {
    slots: RwLock<Vec<Slot>>,
}

impl MemoryProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a participant in the default state. Returns false if the name is
    /// already taken.
    pub fn join(&self, name: &str) -> bool {
        self.join_with(name, ParticipantRecord::new())
    }

    /// Adds a participant with the given record. Returns false if the name is
    /// already taken.
    pub fn join_with(&self, name: &str, record: ParticipantRecord) -> bool {
        let mut slots = self.slots.write();
        if slots.iter().any(|slot| slot.name == name) {
            return false;
        }
        slots.push(Slot {
            name: name.to_string(),
            record,
            writes: 0,
            fault: None,
        });
        true
    }

    /// Removes a participant, returning its last record.
    pub fn leave(&self, name: &str) -> Option<ParticipantRecord> {
        let mut slots = self.slots.write();
        let index = slots.iter().position(|slot| slot.name == name)?;
        Some(slots.remove(index).record)
    }

    /// Returns a copy of a participant's record.
    pub fn record(&self, name: &str) -> Option<ParticipantRecord> {
        self.slots
            .read()
            .iter()
            .find(|slot| slot.name == name)
            .map(|slot| slot.record.clone())
    }

    /// Mutates a participant's record from outside the engine.
    ///
    /// Does not count as a provider write. Returns false if the participant
    /// is unknown.
    pub fn update(&self, name: &str, edit: impl FnOnce(&mut ParticipantRecord)) -> bool {
        let mut slots = self.slots.write();
        match slots.iter_mut().find(|slot| slot.name == name) {
            Some(slot) => {
                edit(&mut slot.record);
                true
            }
            None => false,
        }
    }

    /// Number of provider writes made to a participant.
    pub fn writes(&self, name: &str) -> u64 {
        self.slots
            .read()
            .iter()
            .find(|slot| slot.name == name)
            .map_or(0, |slot| slot.writes)
    }

    /// Number of provider writes made to all current participants.
    pub fn total_writes(&self) -> u64 {
        self.slots.read().iter().map(|slot| slot.writes).sum()
    }

    /// Makes every call for `name` fail with a backend error until cleared
    /// with `None`.
    pub fn set_fault(&self, name: &str, fault: Option<&str>) {
        let mut slots = self.slots.write();
        if let Some(slot) = slots.iter_mut().find(|slot| slot.name == name) {
            slot.fault = fault.map(str::to_string);
        }
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Returns true if no participant has joined.
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    fn read<T>(&self, name: &str, view: impl FnOnce(&ParticipantRecord) -> T) -> ProviderResult<T> {
        let slots = self.slots.read();
        let slot = slots
            .iter()
            .find(|slot| slot.name == name)
            .ok_or(ProviderError::Inactive)?;
        if let Some(fault) = &slot.fault {
            return Err(ProviderError::backend(fault.clone()));
        }
        Ok(view(&slot.record))
    }

    fn write(&self, name: &str, edit: impl FnOnce(&mut ParticipantRecord)) -> ProviderResult<()> {
        let mut slots = self.slots.write();
        let slot = slots
            .iter_mut()
            .find(|slot| slot.name == name)
            .ok_or(ProviderError::Inactive)?;
        if let Some(fault) = &slot.fault {
            return Err(ProviderError::backend(fault.clone()));
        }
        edit(&mut slot.record);
        slot.writes += 1;
        Ok(())
    }
}

impl ParticipantProvider for MemoryProvider {
    type Id = String;

    fn list_active(&self) -> Vec<String> {
        self.slots
            .read()
            .iter()
            .map(|slot| slot.name.clone())
            .collect()
    }

    fn is_active(&self, id: &String) -> bool {
        self.slots.read().iter().any(|slot| &slot.name == id)
    }

    fn inventory(&self, id: &String) -> ProviderResult<Inventory> {
        self.read(id, |record| record.inventory.clone())
    }

    fn set_inventory(&self, id: &String, inventory: Inventory) -> ProviderResult<()> {
        self.write(id, |record| record.inventory = inventory)
    }

    fn vitals(&self, id: &String) -> ProviderResult<Vitals> {
        self.read(id, |record| record.vitals)
    }

    fn set_vitals(&self, id: &String, vitals: Vitals) -> ProviderResult<()> {
        self.write(id, |record| record.vitals = vitals)
    }

    fn max_health(&self, id: &String) -> ProviderResult<Option<f64>> {
        self.read(id, |record| record.max_health)
    }

    fn max_air(&self, id: &String) -> ProviderResult<i32> {
        self.read(id, |record| record.max_air)
    }

    fn active_effects(&self, id: &String) -> ProviderResult<Vec<StatusEffect>> {
        self.read(id, |record| record.effects.clone())
    }

    fn remove_effect(&self, id: &String, kind: &EffectKind) -> ProviderResult<()> {
        self.write(id, |record| record.effects.retain(|effect| &effect.kind != kind))
    }

    fn add_effect(&self, id: &String, effect: StatusEffect) -> ProviderResult<()> {
        self.write(id, |record| {
            match record.effects.iter_mut().find(|e| e.kind == effect.kind) {
                Some(existing) => *existing = effect,
                None => record.effects.push(effect),
            }
        })
    }

    fn experience(&self, id: &String) -> ProviderResult<Experience> {
        self.read(id, |record| record.experience)
    }

    fn set_experience(&self, id: &String, experience: Experience) -> ProviderResult<()> {
        self.write(id, |record| record.experience = experience)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_order_is_enumeration_order() {
        let provider = MemoryProvider::new();
        assert!(provider.join("b"));
        assert!(provider.join("a"));
        assert!(!provider.join("b"));
        assert_eq!(provider.list_active(), vec!["b".to_string(), "a".to_string()]);
        assert_eq!(provider.len(), 2);
    }

    #[test]
    fn leave_makes_participant_inactive() {
        let provider = MemoryProvider::new();
        provider.join("alex");
        assert!(provider.leave("alex").is_some());
        assert!(!provider.is_active(&"alex".to_string()));
        assert_eq!(
            provider.vitals(&"alex".to_string()).unwrap_err(),
            ProviderError::Inactive
        );
        assert!(provider.is_empty());
    }

    #[test]
    fn writes_are_counted_but_updates_are_not() {
        let provider = MemoryProvider::new();
        provider.join("alex");
        let alex = "alex".to_string();

        provider.update("alex", |record| record.vitals.food = 3);
        assert_eq!(provider.writes("alex"), 0);

        provider.set_vitals(&alex, Vitals::default()).unwrap();
        provider.set_experience(&alex, Experience::default()).unwrap();
        assert_eq!(provider.writes("alex"), 2);
        assert_eq!(provider.total_writes(), 2);
    }

    #[test]
    fn add_effect_overwrites_same_kind() {
        let provider = MemoryProvider::new();
        provider.join("alex");
        let alex = "alex".to_string();

        provider
            .add_effect(&alex, StatusEffect::new("minecraft:speed", 100, 0))
            .unwrap();
        provider
            .add_effect(&alex, StatusEffect::new("minecraft:speed", 30, 2))
            .unwrap();

        let effects = provider.active_effects(&alex).unwrap();
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].amplifier, 2);

        provider
            .remove_effect(&alex, &EffectKind::from("minecraft:speed"))
            .unwrap();
        assert!(provider.active_effects(&alex).unwrap().is_empty());
    }

    #[test]
    fn faults_fail_calls_until_cleared() {
        let provider = MemoryProvider::new();
        provider.join("alex");
        let alex = "alex".to_string();

        provider.set_fault("alex", Some("io timeout"));
        assert_eq!(
            provider.inventory(&alex).unwrap_err(),
            ProviderError::backend("io timeout")
        );
        assert!(provider.set_vitals(&alex, Vitals::default()).is_err());
        assert_eq!(provider.writes("alex"), 0);

        provider.set_fault("alex", None);
        assert!(provider.inventory(&alex).is_ok());
    }
}
