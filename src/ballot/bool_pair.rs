//! Boolean-pair candidate values.
//!
//! Two independent flags packed into a 2-bit key: bit 0 is `flag_a`,
//! bit 1 is `flag_b`. The packing is a bijection between the four pairs
//! and the keys `0..=3`, so `(true, false)` and `(false, true)` never share
//! a ballot record.

use super::value::BallotValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A key outside `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid flag-pair key {0}, expected 0..=3")]
pub struct InvalidPairKey(pub u8);

/// A pair of flags voted on as one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct BoolPair {
    pub flag_a: bool,
    pub flag_b: bool,
}

impl BoolPair {
    /// All four pairs, in key order.
    pub const ALL: [BoolPair; 4] = [
        BoolPair::new(false, false),
        BoolPair::new(true, false),
        BoolPair::new(false, true),
        BoolPair::new(true, true),
    ];

    pub const fn new(flag_a: bool, flag_b: bool) -> Self {
        Self { flag_a, flag_b }
    }

    /// Pack into the 2-bit key.
    pub const fn pack(self) -> u8 {
        (self.flag_a as u8) | ((self.flag_b as u8) << 1)
    }

    /// Unpack a 2-bit key.
    pub fn unpack(key: u8) -> Result<Self, InvalidPairKey> {
        if key > 0b11 {
            return Err(InvalidPairKey(key));
        }
        Ok(Self::new(key & 0b01 != 0, key & 0b10 != 0))
    }
}

impl From<BoolPair> for u8 {
    fn from(pair: BoolPair) -> Self {
        pair.pack()
    }
}

impl TryFrom<u8> for BoolPair {
    type Error = InvalidPairKey;

    fn try_from(key: u8) -> Result<Self, Self::Error> {
        Self::unpack(key)
    }
}

impl fmt::Display for BoolPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.flag_a, self.flag_b)
    }
}

impl BallotValue for BoolPair {
    fn key_bytes(&self) -> Vec<u8> {
        vec![self.pack()]
    }
}
