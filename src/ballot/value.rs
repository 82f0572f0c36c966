//! Candidate values and anti-replay keys.

use crate::identity::MemberId;
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Debug;
use std::hash::Hash;

/// Domain separation tag for vote keys.
const VOTE_KEY_DOMAIN: &[u8] = b"multisig-gate-vote-v1";

/// Anti-replay key: SHA-256 over (voter, value, round).
pub type VoteKey = [u8; 32];

/// A value members can vote for.
pub trait BallotValue: Copy + Eq + Hash + Debug + Serialize + DeserializeOwned {
    /// Canonical encoding folded into the vote key. Must be injective.
    fn key_bytes(&self) -> Vec<u8>;
}

impl BallotValue for u64 {
    fn key_bytes(&self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }
}

/// Derive the anti-replay key for `voter` voting `value` in `round`.
///
/// Fields are fixed-width or length-prefixed so distinct triples never
/// feed the hash the same bytes.
pub fn vote_key<V: BallotValue>(voter: &MemberId, value: &V, round: u64) -> VoteKey {
    let value_bytes = value.key_bytes();
    let mut hasher = Sha256::new();
    hasher.update(VOTE_KEY_DOMAIN);
    hasher.update(voter.as_bytes());
    hasher.update((value_bytes.len() as u32).to_be_bytes());
    hasher.update(&value_bytes);
    hasher.update(round.to_be_bytes());
    hasher.finalize().into()
}
