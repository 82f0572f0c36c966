//! Generic action ballot.
//!
//! Vote processing for one value:
//! 1. The bound group confirms the voter is a member
//! 2. The value's record is looked up, or materialized on first use
//! 3. A record stamped with an older round is reset in place
//! 4. The anti-replay key `(voter, value, round)` must be new
//! 5. Reaching the group threshold dispatches the value and advances the
//!    round; every other record is now stale but left untouched
//!
//! Every check that can fail runs before the first write, so a rejected
//! vote leaves the ballot exactly as it was.

use super::value::{vote_key, BallotValue, VoteKey};
use crate::error::{GateError, GateResult};
use crate::group::ThresholdGroup;
use crate::identity::MemberId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Round a fresh ballot starts at.
pub const INITIAL_ROUND_VERSION: u64 = 1;

/// Votes collected for one candidate value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueVote {
    /// Distinct voters for this value in `proposed_at_version`.
    pub votes: usize,
    /// Round in which the vote set was last reset.
    pub proposed_at_version: u64,
    voted_keys: HashSet<VoteKey>,
}

impl ValueVote {
    fn new(round: u64) -> Self {
        Self {
            votes: 0,
            proposed_at_version: round,
            voted_keys: HashSet::new(),
        }
    }

    fn is_stale(&self, round: u64) -> bool {
        self.proposed_at_version != round
    }

    fn reset(&mut self, round: u64) {
        self.votes = 0;
        self.proposed_at_version = round;
        self.voted_keys.clear();
    }
}

/// Read-only view of a value record, reported as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueVoteView {
    pub votes: usize,
    pub proposed_at_version: u64,
}

/// Result of a counted vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallotOutcome<V, R> {
    /// Counted, below threshold.
    Pending {
        value: V,
        votes: usize,
        threshold: usize,
    },
    /// Threshold reached in `round`; `response` is what dispatch returned.
    Resolved {
        value: V,
        votes: usize,
        round: u64,
        response: R,
    },
}

/// Per-value vote ledger for one guarded action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "V: BallotValue")]
pub struct ActionBallot<V: BallotValue> {
    round_version: u64,
    records: HashMap<V, ValueVote>,
}

impl<V: BallotValue> Default for ActionBallot<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: BallotValue> ActionBallot<V> {
    /// Create a ballot at round one with no records.
    pub fn new() -> Self {
        Self {
            round_version: INITIAL_ROUND_VERSION,
            records: HashMap::new(),
        }
    }

    /// Current round.
    pub fn round_version(&self) -> u64 {
        self.round_version
    }

    /// Cast `voter`'s vote for `value`.
    ///
    /// `group` supplies membership and the live threshold. When the vote
    /// brings `value` to the threshold, `dispatch` is called with it and the
    /// round advances; both happen in this call or neither does.
    pub fn vote_for<R, F>(
        &mut self,
        group: &ThresholdGroup,
        voter: &MemberId,
        value: V,
        dispatch: F,
    ) -> GateResult<BallotOutcome<V, R>>
    where
        F: FnOnce(V) -> R,
    {
        group.ensure_member(voter)?;

        let round = self.round_version;
        let key = vote_key(voter, &value, round);
        if let Some(record) = self.records.get(&value) {
            if !record.is_stale(round) && record.voted_keys.contains(&key) {
                return Err(GateError::AlreadyVoted { voter: *voter });
            }
        }

        let record = self
            .records
            .entry(value)
            .or_insert_with(|| ValueVote::new(round));
        if record.is_stale(round) {
            tracing::trace!(
                ?value,
                stale = record.proposed_at_version,
                current = round,
                "resetting stale value record"
            );
            record.reset(round);
        }
        record.voted_keys.insert(key);
        record.votes += 1;
        let votes = record.votes;

        let threshold = group.threshold();
        tracing::debug!(?value, voter = %voter.short(), votes, threshold, round, "vote recorded");
        if votes < threshold {
            return Ok(BallotOutcome::Pending {
                value,
                votes,
                threshold,
            });
        }

        let response = dispatch(value);
        self.round_version += 1;
        tracing::info!(?value, votes, round, next_round = self.round_version, "value resolved");
        Ok(BallotOutcome::Resolved {
            value,
            votes,
            round,
            response,
        })
    }

    /// Stored record for `value`, stale or not.
    pub fn value_votes(&self, value: &V) -> Option<ValueVoteView> {
        self.records.get(value).map(|r| ValueVoteView {
            votes: r.votes,
            proposed_at_version: r.proposed_at_version,
        })
    }

    /// Votes `value` holds in the current round (zero when stale or unseen).
    pub fn current_votes(&self, value: &V) -> usize {
        match self.records.get(value) {
            Some(record) if !record.is_stale(self.round_version) => record.votes,
            _ => 0,
        }
    }

    /// Whether `voter` has a counted vote for `value` in the current round.
    pub fn has_voted(&self, voter: &MemberId, value: &V) -> bool {
        let round = self.round_version;
        self.records.get(value).is_some_and(|record| {
            !record.is_stale(round) && record.voted_keys.contains(&vote_key(voter, value, round))
        })
    }

    /// Number of materialized value records, stale ones included.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: u8) -> MemberId {
        MemberId::from_bytes([id; 32])
    }

    fn group_of(n: u8) -> ThresholdGroup {
        ThresholdGroup::new((1..=n).map(member)).unwrap()
    }

    fn vote(
        ballot: &mut ActionBallot<u64>,
        group: &ThresholdGroup,
        voter: u8,
        value: u64,
    ) -> GateResult<BallotOutcome<u64, u64>> {
        ballot.vote_for(group, &member(voter), value, |v| v)
    }

    #[test]
    fn test_new_ballot_is_idle() {
        let ballot = ActionBallot::<u64>::new();
        assert_eq!(ballot.round_version(), INITIAL_ROUND_VERSION);
        assert_eq!(ballot.record_count(), 0);
        assert_eq!(ballot.value_votes(&5), None);
    }

    #[test]
    fn test_resolves_at_threshold() {
        let group = group_of(3);
        let mut ballot = ActionBallot::new();
        let mut dispatched = Vec::new();

        let first = ballot
            .vote_for(&group, &member(1), 111u64, |v| dispatched.push(v))
            .unwrap();
        assert_eq!(
            first,
            BallotOutcome::Pending {
                value: 111,
                votes: 1,
                threshold: 2
            }
        );
        assert!(dispatched.is_empty());

        let second = ballot
            .vote_for(&group, &member(2), 111u64, |v| dispatched.push(v))
            .unwrap();
        assert!(matches!(
            second,
            BallotOutcome::Resolved {
                value: 111,
                votes: 2,
                round: 1,
                ..
            }
        ));
        assert_eq!(dispatched, vec![111]);
        assert_eq!(ballot.round_version(), 2);
    }

    #[test]
    fn test_double_vote_rejected_without_change() {
        let group = group_of(5);
        let mut ballot = ActionBallot::new();
        vote(&mut ballot, &group, 1, 7).unwrap();
        let before = ballot.clone();

        assert_eq!(
            vote(&mut ballot, &group, 1, 7),
            Err(GateError::AlreadyVoted { voter: member(1) })
        );
        assert_eq!(ballot, before);
    }

    #[test]
    fn test_voter_may_back_several_values() {
        let group = group_of(5);
        let mut ballot = ActionBallot::new();
        vote(&mut ballot, &group, 1, 7).unwrap();
        vote(&mut ballot, &group, 1, 8).unwrap();

        assert!(ballot.has_voted(&member(1), &7));
        assert!(ballot.has_voted(&member(1), &8));
        assert_eq!(ballot.current_votes(&7), 1);
        assert_eq!(ballot.current_votes(&8), 1);
    }

    #[test]
    fn test_non_member_rejected_without_change() {
        let group = group_of(3);
        let mut ballot = ActionBallot::new();
        vote(&mut ballot, &group, 1, 7).unwrap();
        let before = ballot.clone();

        assert_eq!(
            vote(&mut ballot, &group, 9, 7),
            Err(GateError::OnlyMember { member: member(9) })
        );
        assert_eq!(ballot, before);
    }

    #[test]
    fn test_dispatch_not_called_on_rejection() {
        let group = group_of(3);
        let mut ballot = ActionBallot::new();
        vote(&mut ballot, &group, 1, 7).unwrap();

        let mut called = false;
        let result = ballot.vote_for(&group, &member(1), 7, |_| called = true);
        assert!(result.is_err());
        assert!(!called);
        assert_eq!(ballot.round_version(), 1);
    }

    #[test]
    fn test_competing_values_first_to_threshold_wins() {
        let group = group_of(3);
        let mut ballot = ActionBallot::new();

        vote(&mut ballot, &group, 1, 200).unwrap();
        vote(&mut ballot, &group, 2, 300).unwrap();
        vote(&mut ballot, &group, 3, 400).unwrap();
        assert_eq!(ballot.round_version(), 1);

        let outcome = vote(&mut ballot, &group, 1, 300).unwrap();
        assert!(matches!(
            outcome,
            BallotOutcome::Resolved {
                value: 300,
                response: 300,
                ..
            }
        ));
        assert_eq!(ballot.round_version(), 2);

        // Losers keep their stored counts but no longer count.
        assert_eq!(
            ballot.value_votes(&200),
            Some(ValueVoteView {
                votes: 1,
                proposed_at_version: 1
            })
        );
        assert_eq!(ballot.current_votes(&200), 0);
        assert!(!ballot.has_voted(&member(1), &200));

        // A fresh vote for 200 starts over at one and does not resolve.
        let outcome = vote(&mut ballot, &group, 2, 200).unwrap();
        assert_eq!(
            outcome,
            BallotOutcome::Pending {
                value: 200,
                votes: 1,
                threshold: 2
            }
        );
        assert_eq!(ballot.round_version(), 2);
    }

    #[test]
    fn test_revote_after_round_advance_counts() {
        let group = group_of(3);
        let mut ballot = ActionBallot::new();
        vote(&mut ballot, &group, 1, 5).unwrap();
        vote(&mut ballot, &group, 2, 5).unwrap();
        assert_eq!(ballot.round_version(), 2);

        // Same voter, same value, new round.
        let outcome = vote(&mut ballot, &group, 1, 5).unwrap();
        assert!(matches!(outcome, BallotOutcome::Pending { votes: 1, .. }));
        assert!(ballot.has_voted(&member(1), &5));
    }

    #[test]
    fn test_threshold_read_live_from_group() {
        let mut group = group_of(3);
        let mut ballot = ActionBallot::new();
        vote(&mut ballot, &group, 1, 9).unwrap();

        // Grow the group to four; the threshold becomes three.
        group.vote_to_add(&member(1), &member(4)).unwrap();
        group.vote_to_add(&member(2), &member(4)).unwrap();
        assert_eq!(group.threshold(), 3);

        let outcome = vote(&mut ballot, &group, 2, 9).unwrap();
        assert_eq!(
            outcome,
            BallotOutcome::Pending {
                value: 9,
                votes: 2,
                threshold: 3
            }
        );
        assert!(matches!(
            vote(&mut ballot, &group, 4, 9).unwrap(),
            BallotOutcome::Resolved { votes: 3, .. }
        ));
    }

    #[test]
    fn test_round_advance_touches_no_other_record() {
        let group = group_of(3);
        let mut ballot = ActionBallot::new();
        for value in 0..100u64 {
            vote(&mut ballot, &group, 1, value).unwrap();
        }
        let stored: Vec<_> = (0..100u64).map(|v| ballot.value_votes(&v)).collect();

        vote(&mut ballot, &group, 2, 42).unwrap();
        assert_eq!(ballot.round_version(), 2);

        for value in (0..100u64).filter(|v| *v != 42) {
            assert_eq!(ballot.value_votes(&value), stored[value as usize]);
        }
    }
}
