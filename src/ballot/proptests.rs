//! Property-based tests for action ballots
//!
//! Tests for:
//! - Anti-replay: at most one counted vote per voter, value and round
//! - Resolution: exactly one round advance per resolution, dispatched once
//! - Staleness: votes never carry across a round boundary
//! - Packing: flag-pair keys are a bijection

use super::action::{ActionBallot, BallotOutcome};
use super::bool_pair::BoolPair;
use super::value::vote_key;
use crate::error::GateError;
use crate::group::ThresholdGroup;
use crate::identity::MemberId;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

fn member(id: u8) -> MemberId {
    MemberId::from_bytes([id; 32])
}

fn group_of(n: u8) -> ThresholdGroup {
    ThresholdGroup::new((1..=n).map(member)).unwrap()
}

// ============================================================================
// BALLOT PROPERTY TESTS
// ============================================================================

proptest! {
    /// Property: replaying a vote in the same round always fails
    #[test]
    fn replay_in_same_round_fails(
        n in 3u8..10,
        votes in prop::collection::vec((1u8..10, 0u64..8), 1..200),
    ) {
        let group = group_of(n);
        let mut ballot = ActionBallot::<u64>::new();
        let mut counted: HashSet<(u8, u64, u64)> = HashSet::new();

        for (voter, value) in votes {
            let round = ballot.round_version();
            let result = ballot.vote_for(&group, &member(voter), value, |_| ());
            match result {
                Ok(_) => {
                    prop_assert!(voter <= n);
                    prop_assert!(counted.insert((voter, value, round)), "vote counted twice");
                }
                Err(GateError::AlreadyVoted { .. }) => {
                    prop_assert!(counted.contains(&(voter, value, round)));
                }
                Err(GateError::OnlyMember { .. }) => prop_assert!(voter > n),
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }
    }

    /// Property: the round advances exactly once per resolution, and the
    /// resolving value is the one that was dispatched
    #[test]
    fn one_dispatch_per_round(
        n in 3u8..8,
        votes in prop::collection::vec((1u8..8, 0u64..4), 1..300),
    ) {
        let group = group_of(n);
        let mut ballot = ActionBallot::<u64>::new();
        let mut dispatched = Vec::new();

        for (voter, value) in votes {
            let before = ballot.round_version();
            let result = ballot.vote_for(&group, &member(voter), value, |v| {
                dispatched.push(v);
                v
            });
            match result {
                Ok(BallotOutcome::Resolved { value: resolved, response, round, votes }) => {
                    prop_assert_eq!(resolved, value);
                    prop_assert_eq!(response, value);
                    prop_assert_eq!(round, before);
                    prop_assert_eq!(votes, group.threshold());
                    prop_assert_eq!(ballot.round_version(), before + 1);
                }
                _ => prop_assert_eq!(ballot.round_version(), before),
            }
        }
        prop_assert_eq!(ballot.round_version(), 1 + dispatched.len() as u64);
    }

    /// Property: the count a value reports equals the distinct voters for it
    /// since the last round advance
    #[test]
    fn counts_match_distinct_voters_this_round(
        votes in prop::collection::vec((1u8..8, 0u64..6), 1..300),
    ) {
        let group = group_of(7);
        let mut ballot = ActionBallot::<u64>::new();
        let mut model: HashMap<u64, HashSet<u8>> = HashMap::new();

        for (voter, value) in votes {
            let result = ballot.vote_for(&group, &member(voter), value, |_| ());
            match result {
                Ok(BallotOutcome::Resolved { .. }) => model.clear(),
                Ok(BallotOutcome::Pending { .. }) => {
                    model.entry(value).or_default().insert(voter);
                }
                Err(_) => {}
            }
            for v in 0u64..6 {
                let expected = model.get(&v).map_or(0, |voters| voters.len());
                prop_assert_eq!(ballot.current_votes(&v), expected);
            }
        }
    }
}

// ============================================================================
// KEY PROPERTY TESTS
// ============================================================================

proptest! {
    /// Property: vote keys differ whenever any field differs
    #[test]
    fn vote_keys_are_injective(
        a in (any::<u8>(), any::<u64>(), any::<u64>()),
        b in (any::<u8>(), any::<u64>(), any::<u64>()),
    ) {
        let ka = vote_key(&member(a.0), &a.1, a.2);
        let kb = vote_key(&member(b.0), &b.1, b.2);
        prop_assert_eq!(ka == kb, a == b);
    }

    /// Property: flag-pair packing round-trips and stays within two bits
    #[test]
    fn pair_packing_bijective(flag_a in any::<bool>(), flag_b in any::<bool>()) {
        let pair = BoolPair::new(flag_a, flag_b);
        let key = pair.pack();
        prop_assert!(key <= 0b11);
        prop_assert_eq!(BoolPair::unpack(key), Ok(pair));
        prop_assert_eq!(key & 1 == 1, flag_a);
        prop_assert_eq!(key & 2 == 2, flag_b);
    }
}
