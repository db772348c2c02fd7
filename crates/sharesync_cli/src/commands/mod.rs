//! CLI command implementations.

pub mod fingerprint;
pub mod script;
pub mod simulate;
