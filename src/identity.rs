//! Member identities.
//!
//! Every voter and membership candidate is a 32-byte `MemberId`. Operators
//! refer to members by a human label (hashed with SHA-256 under a fixed
//! domain tag) or by the 64-character hex form printed in status output.
//!
//! # Properties
//!
//! - **Determinism**: the same label always yields the same id
//! - **Collision Resistance**: distinct labels yield distinct ids
//! - **Round-trip**: `MemberId::from_str(&id.to_string()) == Ok(id)`

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Domain separation tag for label hashing.
const LABEL_DOMAIN: &[u8] = b"multisig-gate-member-v1";

/// A 32-byte member identity.
///
/// Serialized as a 64-character hex string in every format.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId([u8; 32]);

impl MemberId {
    /// Wrap raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derive an identity from an operator-facing label.
    pub fn from_label(label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(LABEL_DOMAIN);
        hasher.update(label.as_bytes());
        Self(hasher.finalize().into())
    }

    /// First four bytes in hex, for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemberId({})", self.short())
    }
}

impl Serialize for MemberId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for MemberId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&encoded, &mut bytes).map_err(de::Error::custom)?;
        Ok(Self(bytes))
    }
}

/// Parses a 64-character hex id; anything else is treated as a label.
impl FromStr for MemberId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 64 {
            let mut bytes = [0u8; 32];
            if hex::decode_to_slice(s, &mut bytes).is_ok() {
                return Ok(Self(bytes));
            }
        }
        Ok(Self::from_label(s))
    }
}
