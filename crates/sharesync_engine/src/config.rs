//! Configuration for the convergence engine.

use crate::error::{EngineError, EngineResult};
use sharesync_state::DEFAULT_MAX_HEALTH;
use std::time::Duration;

/// Default tick period (one game tick at 20 ticks per second).
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(50);

/// Configuration for the convergence engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Period at which the host runs the tick callback.
    pub tick_period: Duration,
    /// Health ceiling used when a participant cannot report its maximum.
    pub fallback_max_health: f64,
}

impl EngineConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self {
            tick_period: DEFAULT_TICK_PERIOD,
            fallback_max_health: DEFAULT_MAX_HEALTH,
        }
    }

    /// Sets the tick period.
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Sets the fallback health ceiling.
    pub fn with_fallback_max_health(mut self, max_health: f64) -> Self {
        self.fallback_max_health = max_health;
        self
    }

    /// Checks that the configuration can drive the engine.
    pub fn validate(&self) -> EngineResult<()> {
        if self.tick_period.is_zero() {
            return Err(EngineError::InvalidConfig(
                "tick period must be greater than zero".into(),
            ));
        }
        if !self.fallback_max_health.is_finite() || self.fallback_max_health <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "fallback max health must be positive, got {}",
                self.fallback_max_health
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_config_builder() {
        let config = EngineConfig::new()
            .with_tick_period(Duration::from_millis(100))
            .with_fallback_max_health(40.0);

        assert_eq!(config.tick_period, Duration::from_millis(100));
        assert_eq!(config.fallback_max_health, 40.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_period, Duration::from_millis(50));
        assert_eq!(config.fallback_max_health, 20.0);
    }

    #[test]
    fn rejects_zero_period() {
        let config = EngineConfig::new().with_tick_period(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_non_positive_health() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = EngineConfig::new().with_fallback_max_health(bad);
            assert!(config.validate().is_err(), "{bad} accepted");
        }
    }
}
