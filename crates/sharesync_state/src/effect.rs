//! Timed status effects.

use crate::fingerprint::{Fold, StateHash};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifies a kind of status effect, e.g. `minecraft:speed`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectKind(String);

impl EffectKind {
    /// Creates an effect kind.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the kind name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EffectKind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn default_particles() -> bool {
    true
}

/// An active timed effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    /// Effect kind.
    pub kind: EffectKind,
    /// Remaining duration in ticks.
    pub duration: i32,
    /// Amplifier (0 = level I).
    pub amplifier: i32,
    /// Whether the effect comes from an ambient source.
    #[serde(default)]
    pub ambient: bool,
    /// Whether particles are shown.
    #[serde(default = "default_particles")]
    pub particles: bool,
}

impl StatusEffect {
    /// Creates a non-ambient effect with particles.
    pub fn new(kind: impl Into<EffectKind>, duration: i32, amplifier: i32) -> Self {
        Self {
            kind: kind.into(),
            duration,
            amplifier,
            ambient: false,
            particles: true,
        }
    }

    /// Marks the effect as ambient.
    pub fn ambient(mut self) -> Self {
        self.ambient = true;
        self
    }

    /// Hides the effect's particles.
    pub fn without_particles(mut self) -> Self {
        self.particles = false;
        self
    }
}

impl StateHash for StatusEffect {
    fn state_hash(&self) -> i32 {
        Fold::new()
            .push(self.kind.as_str())
            .push(&self.duration)
            .push(&self.amplifier)
            .push(&self.ambient)
            .push(&self.particles)
            .finish()
    }
}

/// Set of active effects, at most one per kind.
///
/// Inserting an effect whose kind is already present replaces it. The set
/// hashes as the sum of its members, so its fingerprint does not depend on
/// the order in which effects were enumerated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<StatusEffect>", into = "Vec<StatusEffect>")]
pub struct EffectSet {
    effects: BTreeMap<EffectKind, StatusEffect>,
}

impl EffectSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an effect, returning the one it replaced.
    pub fn insert(&mut self, effect: StatusEffect) -> Option<StatusEffect> {
        self.effects.insert(effect.kind.clone(), effect)
    }

    /// Returns the effect of the given kind.
    pub fn get(&self, kind: &EffectKind) -> Option<&StatusEffect> {
        self.effects.get(kind)
    }

    /// Returns true if an effect of the given kind is present.
    pub fn contains(&self, kind: &EffectKind) -> bool {
        self.effects.contains_key(kind)
    }

    /// Number of effects.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Returns true if no effect is present.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Iterates over the effects.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.values()
    }
}

impl FromIterator<StatusEffect> for EffectSet {
    fn from_iter<I: IntoIterator<Item = StatusEffect>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<StatusEffect> for EffectSet {
    fn extend<I: IntoIterator<Item = StatusEffect>>(&mut self, iter: I) {
        for effect in iter {
            self.insert(effect);
        }
    }
}

impl From<Vec<StatusEffect>> for EffectSet {
    fn from(effects: Vec<StatusEffect>) -> Self {
        effects.into_iter().collect()
    }
}

impl From<EffectSet> for Vec<StatusEffect> {
    fn from(set: EffectSet) -> Self {
        set.effects.into_values().collect()
    }
}

impl StateHash for EffectSet {
    fn state_hash(&self) -> i32 {
        self.iter()
            .fold(0i32, |sum, effect| sum.wrapping_add(effect.state_hash()))
    }
}
