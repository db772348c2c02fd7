//! Error types for the convergence engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Result type for participant provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors reported by a participant provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The participant left between enumeration and access.
    #[error("participant is no longer active")]
    Inactive,

    /// The provider failed to read or write participant state.
    #[error("provider error: {0}")]
    Backend(String),
}

impl ProviderError {
    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Returns true if this error only reflects a participant going away.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Inactive)
    }
}

/// Errors that can occur while controlling the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The host scheduler refused the tick callback.
    #[error("scheduler error: {0}")]
    Scheduler(String),

    /// The engine configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors() {
        assert!(ProviderError::Inactive.is_transient());
        assert!(!ProviderError::backend("disk on fire").is_transient());
    }

    #[test]
    fn error_display() {
        let err = EngineError::Scheduler("queue full".into());
        assert_eq!(err.to_string(), "scheduler error: queue full");

        let err = EngineError::from(ProviderError::Inactive);
        assert_eq!(err.to_string(), "participant is no longer active");
    }
}
