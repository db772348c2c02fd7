//! Error types for the sync host.

use sharesync_engine::EngineError;
use thiserror::Error;

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Errors that can occur in the sync host.
#[derive(Error, Debug)]
pub enum HostError {
    /// The command label is not recognized.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The engine refused the request.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// No tokio runtime is available to drive ticks.
    #[error("no tokio runtime: {0}")]
    NoRuntime(String),

    /// The host has been shut down and accepts no more commands.
    #[error("host is shut down")]
    ShutDown,
}

impl HostError {
    /// Returns true if the error was caused by the sender's input.
    pub fn is_user_error(&self) -> bool {
        matches!(self, HostError::UnknownCommand(_))
    }
}
