//! Multisig Gate - threshold voting over guarded settings
//!
//! Two independent member groups each control one guarded setting: a
//! numeric parameter and a pair of boolean flags. Members vote on a value;
//! the first value to reach a strict majority of its group is dispatched to
//! an `ActionService` exactly once. Groups manage their own membership by
//! the same majority rule.
//!
//! Key principles:
//! - Threshold is always `floor(n/2) + 1` of the current member count
//! - Stale votes are invalidated by version stamps, never by sweeping
//! - A vote either applies completely or fails with no effect
//! - The collaborator's response is reported, never rolled back

pub mod ballot;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod group;
pub mod identity;
pub mod serialization;
pub mod store;

pub use ballot::{ActionBallot, BallotOutcome, BoolPair};
pub use engine::{Engine, SetupParams};
pub use error::{GateError, GateResult};
pub use gateway::{ActionService, Notification, ResponseCode, Vertical};
pub use group::{MembershipOutcome, ThresholdGroup};
pub use identity::MemberId;
