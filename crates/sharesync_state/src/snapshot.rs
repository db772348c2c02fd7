//! Immutable participant snapshots.

use crate::effect::EffectSet;
use crate::error::StateResult;
use crate::fingerprint::{Fingerprint, Fold};
use crate::item::{Inventory, ItemStack, ARMOR_SLOTS};
use crate::vitals::{Experience, Vitals};
use serde::{Deserialize, Serialize};

/// Immutable capture of one participant's synchronized state.
///
/// The fingerprint is computed once at construction. Fields are private and
/// only exposed through shared borrows, so a snapshot cannot change after it
/// has been built; use `Clone` or [`StateSnapshot::into_parts`] to obtain
/// owned copies.
///
/// # Example
///
/// ```
/// use sharesync_state::{EffectSet, Experience, Inventory, StateSnapshot, Vitals};
///
/// let a = StateSnapshot::new(
///     Inventory::empty(),
///     Vitals::default(),
///     Experience::default(),
///     EffectSet::new(),
/// );
/// let b = StateSnapshot::default();
/// assert_eq!(a.fingerprint(), b.fingerprint());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SnapshotDocument", into = "SnapshotDocument")]
pub struct StateSnapshot {
    inventory: Inventory,
    vitals: Vitals,
    experience: Experience,
    effects: EffectSet,
    fingerprint: Fingerprint,
}

impl StateSnapshot {
    /// Builds a snapshot and computes its fingerprint.
    pub fn new(
        inventory: Inventory,
        vitals: Vitals,
        experience: Experience,
        effects: EffectSet,
    ) -> Self {
        let fingerprint = compute_fingerprint(&inventory, &vitals, &experience, &effects);
        Self {
            inventory,
            vitals,
            experience,
            effects,
            fingerprint,
        }
    }

    /// Decodes a snapshot from a JSON document.
    ///
    /// Any fingerprint present in the document is ignored and recomputed.
    pub fn from_json(json: &str) -> StateResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encodes the snapshot as a pretty-printed JSON document.
    pub fn to_json_pretty(&self) -> StateResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns the fingerprint.
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Returns the inventory.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Returns the container slots.
    pub fn contents(&self) -> &[Option<ItemStack>] {
        &self.inventory.contents
    }

    /// Returns the equipped slots.
    pub fn armor(&self) -> &[Option<ItemStack>; ARMOR_SLOTS] {
        &self.inventory.armor
    }

    /// Returns the auxiliary hand slot.
    pub fn offhand(&self) -> Option<&ItemStack> {
        self.inventory.offhand.as_ref()
    }

    /// Returns the vitals.
    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    /// Returns the experience.
    pub fn experience(&self) -> &Experience {
        &self.experience
    }

    /// Returns the active effects.
    pub fn effects(&self) -> &EffectSet {
        &self.effects
    }

    /// Consumes the snapshot, returning its parts.
    pub fn into_parts(self) -> (Inventory, Vitals, Experience, EffectSet) {
        (self.inventory, self.vitals, self.experience, self.effects)
    }
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self::new(
            Inventory::empty(),
            Vitals::default(),
            Experience::default(),
            EffectSet::new(),
        )
    }
}

fn compute_fingerprint(
    inventory: &Inventory,
    vitals: &Vitals,
    experience: &Experience,
    effects: &EffectSet,
) -> Fingerprint {
    let hash = Fold::new()
        .push(&inventory.contents)
        .push(&inventory.armor)
        .push(&inventory.offhand)
        .push(&vitals.health)
        .push(&vitals.absorption)
        .push(&vitals.food)
        .push(&vitals.saturation)
        .push(&vitals.exhaustion)
        .push(&vitals.remaining_air)
        .push(&vitals.fire_ticks)
        .push(&vitals.freeze_ticks)
        .push(&vitals.fall_distance)
        .push(&vitals.invulnerable_ticks)
        .push(&experience.level)
        .push(&experience.progress)
        .push(&experience.total)
        .push(effects)
        .finish();
    Fingerprint::from_raw(hash)
}

/// Wire form of a snapshot.
#[derive(Serialize, Deserialize)]
struct SnapshotDocument {
    inventory: Inventory,
    vitals: Vitals,
    #[serde(default)]
    experience: Experience,
    #[serde(default)]
    effects: EffectSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fingerprint: Option<Fingerprint>,
}

impl From<SnapshotDocument> for StateSnapshot {
    fn from(doc: SnapshotDocument) -> Self {
        Self::new(doc.inventory, doc.vitals, doc.experience, doc.effects)
    }
}

impl From<StateSnapshot> for SnapshotDocument {
    fn from(snapshot: StateSnapshot) -> Self {
        Self {
            fingerprint: Some(snapshot.fingerprint),
            inventory: snapshot.inventory,
            vitals: snapshot.vitals,
            experience: snapshot.experience,
            effects: snapshot.effects,
        }
    }
}
