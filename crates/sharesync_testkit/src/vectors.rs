//! Fingerprint test vectors for ShareSync.
//!
//! Any implementation that shares baselines with this one must produce
//! these exact fingerprints.

use serde::Serialize;
use sharesync_state::{
    EffectSet, Experience, Fingerprint, Inventory, ItemStack, StateSnapshot, StatusEffect, Vitals,
};

/// A snapshot and the fingerprint it must hash to.
#[derive(Debug, Clone, Serialize)]
pub struct FingerprintVector {
    /// Unique identifier for this vector.
    pub id: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Input snapshot.
    pub snapshot: StateSnapshot,
    /// Expected fingerprint.
    pub expected: Fingerprint,
}

/// A primitive hash and its expected value.
#[derive(Debug, Clone, Copy)]
pub struct HashVector {
    /// Unique identifier for this vector.
    pub id: &'static str,
    /// Computed hash.
    pub actual: i32,
    /// Expected hash.
    pub expected: i32,
}

/// Fingerprints of whole snapshots.
pub fn fingerprint_vectors() -> Vec<FingerprintVector> {
    vec![
        FingerprintVector {
            id: "snapshot_default",
            description: "Empty 36-slot inventory with fresh vitals",
            snapshot: StateSnapshot::default(),
            expected: Fingerprint::from_raw(0x406d_6a97),
        },
        FingerprintVector {
            id: "snapshot_loaded",
            description: "Items in every slot group, non-default vitals and two effects",
            snapshot: loaded_snapshot(),
            expected: Fingerprint::from_raw(0x1c48_ac99),
        },
    ]
}

/// Hashes of primitive values.
pub fn hash_vectors() -> Vec<HashVector> {
    use sharesync_state::StateHash;

    vec![
        HashVector {
            id: "str_abc",
            actual: "abc".state_hash(),
            expected: 96354,
        },
        HashVector {
            id: "f64_twenty",
            actual: 20.0f64.state_hash(),
            expected: 1_077_149_696,
        },
        HashVector {
            id: "f32_five",
            actual: 5.0f32.state_hash(),
            expected: 1_084_227_584,
        },
        HashVector {
            id: "effect_speed",
            actual: StatusEffect::new("minecraft:speed", 600, 1).state_hash(),
            expected: 250_798_300,
        },
        HashVector {
            id: "option_none",
            actual: None::<i32>.state_hash(),
            expected: 0,
        },
        HashVector {
            id: "bool_true",
            actual: true.state_hash(),
            expected: 1231,
        },
    ]
}

fn loaded_snapshot() -> StateSnapshot {
    let mut inventory = Inventory::empty();
    inventory.contents[0] = Some(
        ItemStack::new("minecraft:diamond_sword", 1)
            .with_damage(12)
            .with_name("Edge")
            .with_enchantment("minecraft:sharpness", 5),
    );
    inventory.contents[8] = Some(ItemStack::new("minecraft:bread", 16));
    inventory.armor[0] = Some(ItemStack::new("minecraft:iron_boots", 1));
    inventory.armor[3] = Some(ItemStack::new("minecraft:turtle_helmet", 1));
    inventory.offhand = Some(ItemStack::new("minecraft:shield", 1));

    let vitals = Vitals {
        health: 13.5,
        absorption: 2.0,
        food: 17,
        saturation: 3.25,
        exhaustion: 0.5,
        remaining_air: 280,
        fire_ticks: 40,
        freeze_ticks: 0,
        fall_distance: 1.5,
        invulnerable_ticks: 10,
    };
    let experience = Experience {
        level: 7,
        progress: 0.25,
        total: 160,
    };
    let effects: EffectSet = vec![
        StatusEffect::new("minecraft:speed", 600, 1),
        StatusEffect::new("minecraft:night_vision", 1200, 0)
            .ambient()
            .without_particles(),
    ]
    .into();

    StateSnapshot::new(inventory, vitals, experience, effects)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_vectors() {
        for vector in fingerprint_vectors() {
            assert_eq!(
                vector.snapshot.fingerprint(),
                vector.expected,
                "Fingerprint vector {} failed",
                vector.id
            );
        }
    }

    #[test]
    fn test_hash_vectors() {
        for vector in hash_vectors() {
            assert_eq!(vector.actual, vector.expected, "Hash vector {} failed", vector.id);
        }
    }

    #[test]
    fn test_vectors_survive_json() {
        for vector in fingerprint_vectors() {
            let json = vector.snapshot.to_json_pretty().unwrap();
            let parsed = StateSnapshot::from_json(&json).unwrap();
            assert_eq!(parsed.fingerprint(), vector.expected, "{}", vector.id);
        }
    }

    #[test]
    fn test_vector_ids_unique() {
        let vectors = fingerprint_vectors();
        let mut ids: Vec<_> = vectors.iter().map(|v| v.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), vectors.len());
    }
}
