//! Vitals and experience.

use serde::{Deserialize, Serialize};

/// Highest food level.
pub const MAX_FOOD_LEVEL: i32 = 20;

/// Health ceiling used when a participant's maximum is unknown.
pub const DEFAULT_MAX_HEALTH: f64 = 20.0;

/// Saturation after a reset.
pub const RESET_SATURATION: f32 = 5.0;

/// Breath ceiling of a standard participant.
pub const DEFAULT_MAX_AIR: i32 = 300;

/// Health, hunger and hazard counters of a participant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    /// Current health.
    pub health: f64,
    /// Extra absorption hearts.
    pub absorption: f64,
    /// Food level (0..=20).
    pub food: i32,
    /// Food saturation.
    pub saturation: f32,
    /// Food exhaustion.
    pub exhaustion: f32,
    /// Remaining breath in ticks.
    pub remaining_air: i32,
    /// Ticks left burning.
    pub fire_ticks: i32,
    /// Ticks spent freezing.
    pub freeze_ticks: i32,
    /// Distance fallen since last touching ground.
    pub fall_distance: f32,
    /// Ticks of damage immunity left.
    pub invulnerable_ticks: i32,
}

impl Vitals {
    /// Returns the clean-slate vitals for a participant with the given ceilings.
    pub fn fresh(max_health: f64, max_air: i32) -> Self {
        Self {
            health: DEFAULT_MAX_HEALTH.min(max_health),
            absorption: 0.0,
            food: MAX_FOOD_LEVEL,
            saturation: RESET_SATURATION,
            exhaustion: 0.0,
            remaining_air: max_air,
            fire_ticks: 0,
            freeze_ticks: 0,
            fall_distance: 0.0,
            invulnerable_ticks: 0,
        }
    }

    /// Returns a copy clamped to what a participant with the given ceilings
    /// can hold.
    ///
    /// Hazard counters (fire, freeze, fall, invulnerability) are kept as-is.
    pub fn clamped(&self, max_health: f64, max_air: i32) -> Self {
        Self {
            health: self.health.max(0.0).min(max_health),
            absorption: self.absorption.max(0.0),
            food: self.food.clamp(0, MAX_FOOD_LEVEL),
            saturation: self.saturation.max(0.0),
            exhaustion: self.exhaustion.max(0.0),
            remaining_air: self.remaining_air.min(max_air).max(0),
            ..*self
        }
    }
}

impl Default for Vitals {
    fn default() -> Self {
        Self::fresh(DEFAULT_MAX_HEALTH, DEFAULT_MAX_AIR)
    }
}

/// Experience progress of a participant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    /// Current level.
    pub level: i32,
    /// Progress towards the next level (0..=1).
    pub progress: f32,
    /// Total points collected.
    pub total: i32,
}

impl Experience {
    /// Returns a copy clamped to valid ranges.
    pub fn clamped(&self) -> Self {
        Self {
            level: self.level.max(0),
            progress: self.progress.max(0.0).min(1.0),
            total: self.total.max(0),
        }
    }
}
