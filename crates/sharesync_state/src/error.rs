//! Error types for state values.

use thiserror::Error;

/// Result type for state operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur while building or decoding state values.
#[derive(Error, Debug)]
pub enum StateError {
    /// A slot reference points outside the inventory.
    #[error("slot {slot} out of range (container has {len} slots)")]
    SlotOutOfRange {
        /// Requested slot index.
        slot: usize,
        /// Number of slots available.
        len: usize,
    },

    /// A slot name could not be parsed.
    #[error("unknown slot: {0}")]
    UnknownSlot(String),

    /// Snapshot document could not be decoded.
    #[error("invalid snapshot document: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StateError::SlotOutOfRange { slot: 40, len: 36 };
        let msg = err.to_string();
        assert!(msg.contains("40"));
        assert!(msg.contains("36"));

        let err = StateError::UnknownSlot("belt".into());
        assert_eq!(err.to_string(), "unknown slot: belt");
    }
}
