//! Threshold groups: the member sets that authorize each guarded action.
//!
//! - Membership: set-based, unique identities, never below the floor
//! - Threshold: strict majority, `floor(n/2) + 1`, recomputed on every read
//! - Changes: voted in/out by the members themselves (`membership`)
//! - Versioning: one increment per executed add or remove; an increment
//!   invalidates every pending membership proposal without touching them

pub mod membership;
pub mod threshold;

#[cfg(test)]
mod proptests;

pub use membership::{MembershipBallot, MembershipProposal, ProposalView};
pub use threshold::{
    majority, MembershipOutcome, ThresholdGroup, DEFAULT_MEMBERSHIP_FLOOR, INITIAL_GROUP_VERSION,
};
