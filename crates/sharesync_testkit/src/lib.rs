//! # ShareSync Testkit
//!
//! Test utilities for ShareSync.
//!
//! This crate provides:
//! - Test sessions wiring a memory provider, a manual scheduler and an engine
//! - A frozen-roster provider for participants vanishing mid-tick
//! - Property-based test generators using proptest
//! - Fingerprint test vectors
//! - Concurrent stress helpers
//!
//! ## Usage
//!
//! ```rust
//! use sharesync_testkit::prelude::*;
//!
//! let session = TestSession::with_participants(&["alex", "sam"]);
//! session.start();
//! session.update("alex", |record| record.vitals.food = 3);
//! session.tick_n(2);
//! assert!(session.converged());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
    pub use crate::vectors::*;
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;
pub use vectors::*;
