//! Action ballots: per-value voting on a guarded action.
//!
//! - Candidates: any `BallotValue` (a number, a packed flag pair, ...)
//! - Rounds: one resolution per round; resolving advances the round
//! - Staleness: every value record is stamped with the round it counts for
//!   and is repaired on its next vote, so a round advance costs O(1) no
//!   matter how many competing values are outstanding
//! - Anti-replay: one counted vote per (voter, value, round)

pub mod action;
pub mod bool_pair;
pub mod value;

#[cfg(test)]
mod proptests;

pub use action::{ActionBallot, BallotOutcome, ValueVote, ValueVoteView, INITIAL_ROUND_VERSION};
pub use bool_pair::{BoolPair, InvalidPairKey};
pub use value::{vote_key, BallotValue, VoteKey};
