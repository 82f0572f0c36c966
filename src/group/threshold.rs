//! Threshold group.
//!
//! A unique member set with a version counter. The threshold is never
//! stored; it is derived from the current member count on every read so it
//! can never lag a membership change.

use super::membership::{MembershipBallot, ProposalView};
use crate::error::{GateError, GateResult};
use crate::identity::MemberId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Minimum member count unless configured otherwise.
pub const DEFAULT_MEMBERSHIP_FLOOR: usize = 3;

/// Version a freshly constructed group starts at.
pub const INITIAL_GROUP_VERSION: u64 = 1;

/// Strict majority of `n`: `floor(n/2) + 1`.
pub const fn majority(n: usize) -> usize {
    n / 2 + 1
}

/// Result of a membership vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipOutcome {
    /// Vote counted, threshold not reached.
    Pending { votes: usize, threshold: usize },
    /// Candidate inserted; `group_version` is the new version.
    Added { member: MemberId, group_version: u64 },
    /// Member removed; `group_version` is the new version.
    Removed { member: MemberId, group_version: u64 },
}

/// A set of members that approves changes by strict majority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdGroup {
    members: BTreeSet<MemberId>,
    version: u64,
    floor: usize,
    additions: MembershipBallot,
    removals: MembershipBallot,
}

impl ThresholdGroup {
    /// Build a group with the default floor of three.
    pub fn new<I>(initial: I) -> GateResult<Self>
    where
        I: IntoIterator<Item = MemberId>,
    {
        Self::with_floor(initial, DEFAULT_MEMBERSHIP_FLOOR)
    }

    /// Build a group that may never shrink below `floor` members.
    ///
    /// The floor may only be raised above [`DEFAULT_MEMBERSHIP_FLOOR`].
    /// Fails with `InvalidConfiguration` on duplicate identities, a floor
    /// below the default, or fewer than `floor` members.
    pub fn with_floor<I>(initial: I, floor: usize) -> GateResult<Self>
    where
        I: IntoIterator<Item = MemberId>,
    {
        if floor < DEFAULT_MEMBERSHIP_FLOOR {
            return Err(GateError::InvalidConfiguration(format!(
                "membership floor {} is below the minimum of {}",
                floor, DEFAULT_MEMBERSHIP_FLOOR
            )));
        }

        let mut members = BTreeSet::new();
        for member in initial {
            if !members.insert(member) {
                return Err(GateError::InvalidConfiguration(format!(
                    "duplicate member {}",
                    member
                )));
            }
        }

        if members.len() < floor {
            return Err(GateError::InvalidConfiguration(format!(
                "{} members given, at least {} required",
                members.len(),
                floor
            )));
        }

        Ok(Self {
            members,
            version: INITIAL_GROUP_VERSION,
            floor,
            additions: MembershipBallot::new(),
            removals: MembershipBallot::new(),
        })
    }

    pub fn is_member(&self, identity: &MemberId) -> bool {
        self.members.contains(identity)
    }

    /// Fail with `OnlyMember` unless `caller` belongs to the group.
    pub fn ensure_member(&self, caller: &MemberId) -> GateResult<()> {
        if self.is_member(caller) {
            Ok(())
        } else {
            Err(GateError::OnlyMember { member: *caller })
        }
    }

    /// Members in identity order.
    pub fn members(&self) -> impl Iterator<Item = &MemberId> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Current group version.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn floor(&self) -> usize {
        self.floor
    }

    /// Votes required to resolve anything bound to this group.
    pub fn threshold(&self) -> usize {
        majority(self.members.len())
    }

    /// Vote to admit `candidate`.
    ///
    /// The candidate is inserted once the vote count reaches the threshold
    /// of the current member set, and the group version advances.
    pub fn vote_to_add(
        &mut self,
        caller: &MemberId,
        candidate: &MemberId,
    ) -> GateResult<MembershipOutcome> {
        self.ensure_member(caller)?;
        if self.is_member(candidate) {
            return Err(GateError::AlreadyMember { member: *candidate });
        }

        let threshold = self.threshold();
        let votes = self.additions.tally_with(candidate, caller, self.version)?;

        self.additions.record(*candidate, *caller, self.version);
        if votes < threshold {
            tracing::debug!(
                candidate = %candidate.short(),
                voter = %caller.short(),
                votes,
                threshold,
                "add vote recorded"
            );
            return Ok(MembershipOutcome::Pending { votes, threshold });
        }

        self.members.insert(*candidate);
        self.version += 1;
        tracing::info!(
            member = %candidate.short(),
            group_version = self.version,
            size = self.members.len(),
            "member added"
        );
        Ok(MembershipOutcome::Added {
            member: *candidate,
            group_version: self.version,
        })
    }

    /// Vote to remove `member`.
    ///
    /// The floor is checked when the vote would resolve the removal, not
    /// when earlier votes are cast: the group may have shrunk in between.
    /// A resolving vote that would breach the floor is rejected and not
    /// recorded.
    pub fn vote_to_remove(
        &mut self,
        caller: &MemberId,
        member: &MemberId,
    ) -> GateResult<MembershipOutcome> {
        self.ensure_member(caller)?;
        if !self.is_member(member) {
            return Err(GateError::NotAMember { member: *member });
        }

        let threshold = self.threshold();
        let votes = self.removals.tally_with(member, caller, self.version)?;

        if votes < threshold {
            self.removals.record(*member, *caller, self.version);
            tracing::debug!(
                candidate = %member.short(),
                voter = %caller.short(),
                votes,
                threshold,
                "remove vote recorded"
            );
            return Ok(MembershipOutcome::Pending { votes, threshold });
        }

        let remaining = self.members.len() - 1;
        if remaining < self.floor {
            return Err(GateError::MembershipFloorViolation {
                floor: self.floor,
                remaining,
            });
        }

        self.removals.record(*member, *caller, self.version);
        self.members.remove(member);
        self.version += 1;
        tracing::info!(
            member = %member.short(),
            group_version = self.version,
            size = self.members.len(),
            "member removed"
        );
        Ok(MembershipOutcome::Removed {
            member: *member,
            group_version: self.version,
        })
    }

    /// Stored add proposal for `candidate`.
    pub fn pending_addition(&self, candidate: &MemberId) -> Option<ProposalView> {
        self.additions.view(candidate)
    }

    /// Stored remove proposal for `member`.
    pub fn pending_removal(&self, member: &MemberId) -> Option<ProposalView> {
        self.removals.view(member)
    }

    /// Whether `voter` has a counted add vote for `candidate` in this version.
    pub fn has_voted_to_add(&self, voter: &MemberId, candidate: &MemberId) -> bool {
        self.additions
            .proposal(candidate)
            .is_some_and(|p| p.has_voted(voter, self.version))
    }

    /// Whether `voter` has a counted remove vote for `member` in this version.
    pub fn has_voted_to_remove(&self, voter: &MemberId, member: &MemberId) -> bool {
        self.removals
            .proposal(member)
            .is_some_and(|p| p.has_voted(voter, self.version))
    }
}
