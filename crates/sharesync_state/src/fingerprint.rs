//! Deterministic state fingerprints.
//!
//! A fingerprint is a 32-bit polynomial hash. Every fold starts at `1` and
//! computes `acc = acc * 31 + hash(value)` with wrapping arithmetic, so the
//! result depends on the order of the folded values. Primitive hashes are
//! fixed:
//!
//! | Value | Hash |
//! |-------|------|
//! | `i32` / `u32` | the value (reinterpreted as `i32`) |
//! | `bool` | `1231` / `1237` |
//! | `f32` | IEEE bits, canonical NaN, `-0.0` as `0.0` |
//! | `f64` | `bits ^ (bits >> 32)`, canonical NaN, `-0.0` as `0.0` |
//! | `str` | fold over UTF-8 bytes starting at `0` |
//! | `Option` | `0` for `None` |
//! | sequences | fold over elements starting at `1` |

use serde::{Deserialize, Serialize};
use std::fmt;

const SEED: i32 = 1;
const MULTIPLIER: i32 = 31;

const CANONICAL_NAN_F32: u32 = 0x7fc0_0000;
const CANONICAL_NAN_F64: u64 = 0x7ff8_0000_0000_0000;

/// Deterministic digest of a [`crate::StateSnapshot`].
///
/// Used as the equality proxy between snapshots. Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(i32);

impl Fingerprint {
    /// Creates a fingerprint from its raw value.
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub const fn as_raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0 as u32)
    }
}

/// A value that contributes to a fingerprint.
pub trait StateHash {
    /// Returns the 32-bit hash of this value.
    fn state_hash(&self) -> i32;
}

/// Polynomial accumulator.
///
/// ```
/// use sharesync_state::{Fold, StateHash};
///
/// let hash = Fold::new().push(&3i32).push(&true).finish();
/// assert_eq!(hash, (31 + 3) * 31 + 1231);
/// assert_eq!([3i32].state_hash(), 31 + 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Fold {
    acc: i32,
}

impl Fold {
    /// Starts a new fold at the seed value.
    pub const fn new() -> Self {
        Self { acc: SEED }
    }

    /// Folds the hash of `value` into the accumulator.
    #[must_use]
    pub fn push<T: StateHash + ?Sized>(self, value: &T) -> Self {
        self.push_raw(value.state_hash())
    }

    /// Folds an already computed hash into the accumulator.
    #[must_use]
    pub fn push_raw(self, hash: i32) -> Self {
        Self {
            acc: self.acc.wrapping_mul(MULTIPLIER).wrapping_add(hash),
        }
    }

    /// Returns the accumulated hash.
    pub const fn finish(self) -> i32 {
        self.acc
    }
}

impl Default for Fold {
    fn default() -> Self {
        Self::new()
    }
}

impl StateHash for i32 {
    fn state_hash(&self) -> i32 {
        *self
    }
}

impl StateHash for u32 {
    fn state_hash(&self) -> i32 {
        *self as i32
    }
}

impl StateHash for bool {
    fn state_hash(&self) -> i32 {
        if *self {
            1231
        } else {
            1237
        }
    }
}

impl StateHash for f32 {
    fn state_hash(&self) -> i32 {
        let bits = if self.is_nan() {
            CANONICAL_NAN_F32
        } else if *self == 0.0 {
            0
        } else {
            self.to_bits()
        };
        bits as i32
    }
}

impl StateHash for f64 {
    fn state_hash(&self) -> i32 {
        let bits = if self.is_nan() {
            CANONICAL_NAN_F64
        } else if *self == 0.0 {
            0
        } else {
            self.to_bits()
        };
        (bits ^ (bits >> 32)) as i32
    }
}

impl StateHash for str {
    fn state_hash(&self) -> i32 {
        self.bytes().fold(0i32, |acc, byte| {
            acc.wrapping_mul(MULTIPLIER).wrapping_add(i32::from(byte))
        })
    }
}

impl StateHash for String {
    fn state_hash(&self) -> i32 {
        self.as_str().state_hash()
    }
}

impl<T: StateHash + ?Sized> StateHash for &T {
    fn state_hash(&self) -> i32 {
        (**self).state_hash()
    }
}

impl<T: StateHash> StateHash for Option<T> {
    fn state_hash(&self) -> i32 {
        self.as_ref().map_or(0, StateHash::state_hash)
    }
}

impl<T: StateHash> StateHash for [T] {
    fn state_hash(&self) -> i32 {
        self.iter().fold(Fold::new(), |fold, item| fold.push(item)).finish()
    }
}

impl<T: StateHash> StateHash for Vec<T> {
    fn state_hash(&self) -> i32 {
        self.as_slice().state_hash()
    }
}

impl<T: StateHash, const N: usize> StateHash for [T; N] {
    fn state_hash(&self) -> i32 {
        self.as_slice().state_hash()
    }
}

impl<A: StateHash, B: StateHash> StateHash for (A, B) {
    fn state_hash(&self) -> i32 {
        Fold::new().push(&self.0).push(&self.1).finish()
    }
}
