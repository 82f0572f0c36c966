//! Property-based tests for threshold groups
//!
//! Tests for:
//! - Threshold: strict majority for every size at or above the floor
//! - Rejections: failed votes leave the group byte-for-byte unchanged
//! - Floor: no sequence of votes shrinks a group below its floor

use super::threshold::{majority, MembershipOutcome, ThresholdGroup};
use crate::identity::MemberId;
use proptest::prelude::*;

fn member(id: u8) -> MemberId {
    MemberId::from_bytes([id; 32])
}

fn group_of(n: u8) -> ThresholdGroup {
    ThresholdGroup::new((1..=n).map(member)).unwrap()
}

// ============================================================================
// THRESHOLD PROPERTY TESTS
// ============================================================================

proptest! {
    /// Property: threshold(n) == floor(n/2) + 1
    #[test]
    fn threshold_is_floor_half_plus_one(n in 3u8..=200) {
        let group = group_of(n);
        prop_assert_eq!(group.threshold(), n as usize / 2 + 1);
        prop_assert_eq!(group.threshold(), majority(n as usize));
    }

    /// Property: threshold is a strict majority (more than half, at most all)
    #[test]
    fn threshold_is_strict_majority(n in 1usize..10_000) {
        let t = majority(n);
        prop_assert!(2 * t > n);
        prop_assert!(t <= n);
        prop_assert!(2 * (t - 1) <= n);
    }
}

// ============================================================================
// REJECTION PROPERTY TESTS
// ============================================================================

proptest! {
    /// Property: non-member votes fail and change nothing
    #[test]
    fn non_member_vote_changes_nothing(
        n in 3u8..20,
        outsider in 100u8..200,
        target in 1u8..20,
    ) {
        let mut group = group_of(n);
        let before = group.clone();

        prop_assert!(group.vote_to_add(&member(outsider), &member(target.wrapping_add(n))).is_err());
        prop_assert!(group.vote_to_remove(&member(outsider), &member(target)).is_err());
        prop_assert_eq!(group, before);
    }
}

// ============================================================================
// FLOOR PROPERTY TESTS
// ============================================================================

proptest! {
    /// Property: arbitrary removal votes never breach the floor
    #[test]
    fn removals_never_breach_floor(
        n in 3u8..12,
        votes in prop::collection::vec((1u8..12, 1u8..12), 0..200),
    ) {
        let mut group = group_of(n);
        let mut version = group.version();

        for (voter, target) in votes {
            let result = group.vote_to_remove(&member(voter), &member(target));
            if let Ok(MembershipOutcome::Removed { group_version, .. }) = result {
                prop_assert_eq!(group_version, version + 1);
                version = group_version;
            }
            prop_assert!(group.len() >= group.floor());
            prop_assert_eq!(group.version(), version);
        }
    }
}
