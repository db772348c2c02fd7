//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random participant state and random
//! edits that a host could make between ticks.

use proptest::prelude::*;
use sharesync_engine::ParticipantRecord;
use sharesync_state::{
    EffectSet, Experience, Inventory, ItemStack, SlotRef, StateSnapshot, StatusEffect, Vitals,
    ARMOR_SLOTS, CONTAINER_SLOTS,
};

const ITEM_KINDS: &[&str] = &[
    "minecraft:stone",
    "minecraft:bread",
    "minecraft:diamond",
    "minecraft:iron_sword",
    "minecraft:torch",
    "minecraft:elytra",
];

const EFFECT_KINDS: &[&str] = &[
    "minecraft:speed",
    "minecraft:haste",
    "minecraft:regeneration",
    "minecraft:poison",
    "minecraft:night_vision",
];

/// Strategy for generating item stacks.
pub fn item_stack_strategy() -> impl Strategy<Value = ItemStack> {
    (
        prop::sample::select(ITEM_KINDS),
        1u32..=64,
        0u32..500,
        prop::option::weighted(0.2, "[A-Za-z ]{1,12}"),
        prop::collection::btree_map("minecraft:[a-z_]{3,12}", 1u32..=5, 0..3),
    )
        .prop_map(|(kind, amount, damage, custom_name, enchantments)| ItemStack {
            kind: kind.to_string(),
            amount,
            damage,
            custom_name,
            enchantments,
        })
}

/// Strategy for generating full-size inventories.
pub fn inventory_strategy() -> impl Strategy<Value = Inventory> {
    (
        prop::collection::vec(prop::option::weighted(0.25, item_stack_strategy()), CONTAINER_SLOTS),
        prop::array::uniform4(prop::option::weighted(0.3, item_stack_strategy())),
        prop::option::of(item_stack_strategy()),
    )
        .prop_map(|(contents, armor, offhand)| Inventory {
            contents,
            armor,
            offhand,
        })
}

/// Strategy for generating vitals within normal bounds.
pub fn vitals_strategy() -> impl Strategy<Value = Vitals> {
    (
        (0.0f64..=20.0, 0.0f64..=16.0, 0i32..=20, 0.0f32..=20.0, 0.0f32..=4.0),
        (0i32..=300, 0i32..=200, 0i32..=140, 0.0f32..=30.0, 0i32..=20),
    )
        .prop_map(
            |(
                (health, absorption, food, saturation, exhaustion),
                (remaining_air, fire_ticks, freeze_ticks, fall_distance, invulnerable_ticks),
            )| Vitals {
                health,
                absorption,
                food,
                saturation,
                exhaustion,
                remaining_air,
                fire_ticks,
                freeze_ticks,
                fall_distance,
                invulnerable_ticks,
            },
        )
}

/// Strategy for generating experience.
pub fn experience_strategy() -> impl Strategy<Value = Experience> {
    (0i32..=100, 0.0f32..1.0, 0i32..=30_000).prop_map(|(level, progress, total)| Experience {
        level,
        progress,
        total,
    })
}

/// Strategy for generating status effects.
pub fn status_effect_strategy() -> impl Strategy<Value = StatusEffect> {
    (
        prop::sample::select(EFFECT_KINDS),
        1i32..=12_000,
        0i32..=4,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(kind, duration, amplifier, ambient, particles)| StatusEffect {
            kind: kind.into(),
            duration,
            amplifier,
            ambient,
            particles,
        })
}

/// Strategy for generating effect lists, possibly repeating a kind.
pub fn effect_list_strategy() -> impl Strategy<Value = Vec<StatusEffect>> {
    prop::collection::vec(status_effect_strategy(), 0..4)
}

/// Strategy for generating effect sets.
pub fn effect_set_strategy() -> impl Strategy<Value = EffectSet> {
    effect_list_strategy().prop_map(EffectSet::from)
}

/// Strategy for generating snapshots.
pub fn snapshot_strategy() -> impl Strategy<Value = StateSnapshot> {
    (
        inventory_strategy(),
        vitals_strategy(),
        experience_strategy(),
        effect_set_strategy(),
    )
        .prop_map(|(inventory, vitals, experience, effects)| {
            StateSnapshot::new(inventory, vitals, experience, effects)
        })
}

/// An edit a host could make to a participant between ticks.
#[derive(Debug, Clone)]
pub enum StateEdit {
    /// Set health
    Health(f64),
    /// Set food level
    Food(i32),
    /// Set experience level
    Level(i32),
    /// Put an item in a slot
    Give {
        /// Target slot
        slot: SlotRef,
        /// Item placed
        item: ItemStack,
    },
    /// Empty a slot
    Take {
        /// Target slot
        slot: SlotRef,
    },
    /// Add or replace an effect
    Effect(StatusEffect),
    /// Remove every effect
    ClearEffects,
}

impl StateEdit {
    /// Applies the edit to a record.
    pub fn apply(&self, record: &mut ParticipantRecord) {
        match self {
            StateEdit::Health(health) => record.vitals.health = *health,
            StateEdit::Food(food) => record.vitals.food = *food,
            StateEdit::Level(level) => record.experience.level = *level,
            StateEdit::Give { slot, item } => {
                let _ = record.inventory.set(*slot, Some(item.clone()));
            }
            StateEdit::Take { slot } => {
                let _ = record.inventory.set(*slot, None);
            }
            StateEdit::Effect(effect) => {
                record.effects.retain(|e| e.kind != effect.kind);
                record.effects.push(effect.clone());
            }
            StateEdit::ClearEffects => record.effects.clear(),
        }
    }
}

/// Strategy for generating slot references.
pub fn slot_strategy() -> impl Strategy<Value = SlotRef> {
    prop_oneof![
        4 => (0..CONTAINER_SLOTS).prop_map(SlotRef::Container),
        1 => (0..ARMOR_SLOTS).prop_map(SlotRef::Armor),
        1 => Just(SlotRef::Offhand),
    ]
}

/// Strategy for generating edits.
pub fn state_edit_strategy() -> impl Strategy<Value = StateEdit> {
    prop_oneof![
        2 => (1.0f64..=20.0).prop_map(StateEdit::Health),
        2 => (0i32..=20).prop_map(StateEdit::Food),
        1 => (0i32..=50).prop_map(StateEdit::Level),
        3 => (slot_strategy(), item_stack_strategy())
            .prop_map(|(slot, item)| StateEdit::Give { slot, item }),
        1 => slot_strategy().prop_map(|slot| StateEdit::Take { slot }),
        2 => status_effect_strategy().prop_map(StateEdit::Effect),
        1 => Just(StateEdit::ClearEffects),
    ]
}

/// Strategy for generating edits addressed to one of `participants`.
pub fn addressed_edits_strategy(
    participants: usize,
    max_edits: usize,
) -> impl Strategy<Value = Vec<(usize, StateEdit)>> {
    prop::collection::vec((0..participants, state_edit_strategy()), 0..max_edits)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn inventory_has_full_size(inventory in inventory_strategy()) {
            prop_assert_eq!(inventory.contents.len(), CONTAINER_SLOTS);
        }

        #[test]
        fn vitals_are_already_clamped(vitals in vitals_strategy()) {
            prop_assert_eq!(vitals.clamped(20.0, 300), vitals);
        }

        #[test]
        fn effect_set_has_one_per_kind(effects in effect_list_strategy()) {
            let set = EffectSet::from(effects.clone());
            prop_assert!(set.len() <= effects.len());
            for effect in &effects {
                prop_assert!(set.contains(&effect.kind));
            }
        }

        #[test]
        fn edits_target_existing_slots(edit in state_edit_strategy()) {
            let mut record = ParticipantRecord::new();
            edit.apply(&mut record);
            prop_assert_eq!(record.inventory.contents.len(), CONTAINER_SLOTS);
        }
    }
}
