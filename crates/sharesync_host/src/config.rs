//! Host configuration.

use sharesync_engine::EngineConfig;
use std::time::Duration;

/// Configuration for the sync host.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Engine configuration.
    pub engine: EngineConfig,
    /// Name used in log output.
    pub name: String,
}

impl HostConfig {
    /// Creates a new host configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            engine: EngineConfig::default(),
            name: name.into(),
        }
    }

    /// Sets the engine configuration.
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Sets the tick period.
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.engine = self.engine.with_tick_period(period);
        self
    }

    /// Sets the health ceiling used when a participant has none.
    pub fn with_fallback_max_health(mut self, max_health: f64) -> Self {
        self.engine = self.engine.with_fallback_max_health(max_health);
        self
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self::new("sharesync")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HostConfig::default();
        assert_eq!(config.name, "sharesync");
        assert_eq!(config.engine.tick_period, Duration::from_millis(50));
        assert_eq!(config.engine.fallback_max_health, 20.0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = HostConfig::new("lobby")
            .with_tick_period(Duration::from_millis(100))
            .with_fallback_max_health(30.0);

        assert_eq!(config.name, "lobby");
        assert_eq!(config.engine.tick_period, Duration::from_millis(100));
        assert_eq!(config.engine.fallback_max_health, 30.0);
    }
}
