//! Membership ballots.
//!
//! One ballot tracks additions, another removals. Each candidate gets a
//! `MembershipProposal` the first time anyone votes for it. A proposal is
//! stamped with the group version its votes were collected under; when the
//! group version moves on, the proposal is stale and is reset in place on
//! the next vote for that candidate. Nothing is ever swept eagerly.

use crate::error::{GateError, GateResult};
use crate::identity::MemberId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Votes collected for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipProposal {
    /// Distinct members who voted under `proposed_at_version`.
    pub votes: usize,
    /// Group version the vote count belongs to.
    pub proposed_at_version: u64,
    /// Members who voted; only meaningful while the stamp is current.
    voters: BTreeSet<MemberId>,
}

impl MembershipProposal {
    fn new(version: u64) -> Self {
        Self {
            votes: 0,
            proposed_at_version: version,
            voters: BTreeSet::new(),
        }
    }

    fn reset(&mut self, version: u64) {
        self.votes = 0;
        self.proposed_at_version = version;
        self.voters.clear();
    }

    /// Whether `member` voted under `version`.
    pub fn has_voted(&self, member: &MemberId, version: u64) -> bool {
        self.proposed_at_version == version && self.voters.contains(member)
    }
}

/// Read-only view of a pending proposal.
///
/// Counts are reported as stored: compare `proposed_at_version` with the
/// group version to tell whether they still count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalView {
    pub votes: usize,
    pub proposed_at_version: u64,
}

/// Per-candidate vote ledger for one direction (add or remove).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipBallot {
    proposals: HashMap<MemberId, MembershipProposal>,
}

impl MembershipBallot {
    /// Create an empty ballot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Vote count `candidate` would reach if `voter`'s vote were recorded
    /// under `version`. Does not mutate.
    pub fn tally_with(
        &self,
        candidate: &MemberId,
        voter: &MemberId,
        version: u64,
    ) -> GateResult<usize> {
        match self.proposals.get(candidate) {
            Some(proposal) if proposal.proposed_at_version == version => {
                if proposal.voters.contains(voter) {
                    Err(GateError::AlreadyVoted { voter: *voter })
                } else {
                    Ok(proposal.votes + 1)
                }
            }
            // Unseen or stale: the vote starts a fresh count.
            _ => Ok(1),
        }
    }

    /// Record `voter`'s vote for `candidate` under `version`, returning the
    /// new count. Callers check `tally_with` first.
    pub fn record(&mut self, candidate: MemberId, voter: MemberId, version: u64) -> usize {
        let proposal = self
            .proposals
            .entry(candidate)
            .or_insert_with(|| MembershipProposal::new(version));

        if proposal.proposed_at_version != version {
            tracing::trace!(
                candidate = %candidate.short(),
                stale = proposal.proposed_at_version,
                current = version,
                "resetting stale membership proposal"
            );
            proposal.reset(version);
        }

        if proposal.voters.insert(voter) {
            proposal.votes += 1;
        }
        proposal.votes
    }

    /// Stored proposal for `candidate`, stale or not.
    pub fn proposal(&self, candidate: &MemberId) -> Option<&MembershipProposal> {
        self.proposals.get(candidate)
    }

    /// View of the stored proposal for `candidate`.
    pub fn view(&self, candidate: &MemberId) -> Option<ProposalView> {
        self.proposals.get(candidate).map(|p| ProposalView {
            votes: p.votes,
            proposed_at_version: p.proposed_at_version,
        })
    }

    /// Number of materialized proposals (current and stale).
    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }
}
