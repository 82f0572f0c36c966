//! Vote commands.
//!
//! Each command loads the engine, casts one vote and saves the state only
//! if the vote was accepted. A rejected vote leaves the state file as it was.

use super::config::GateConfig;
use super::{open_engine, persist};
use multisig_gate::gateway::{ActionOutcome, Vertical};
use multisig_gate::identity::MemberId;
use multisig_gate::{BallotOutcome, MembershipOutcome};
use std::error::Error;
use std::fmt::Display;

/// Vote to add `candidate` to `vertical`'s group
pub fn add(
    config: &GateConfig,
    vertical: Vertical,
    voter: MemberId,
    candidate: MemberId,
) -> Result<(), Box<dyn Error>> {
    let mut engine = open_engine(config)?;
    let outcome = engine.vote_to_add(vertical, &voter, &candidate)?;
    persist(config, &engine)?;

    println!("{}", describe_membership(vertical, &outcome));
    Ok(())
}

/// Vote to remove `member` from `vertical`'s group
pub fn remove(
    config: &GateConfig,
    vertical: Vertical,
    voter: MemberId,
    member: MemberId,
) -> Result<(), Box<dyn Error>> {
    let mut engine = open_engine(config)?;
    let outcome = engine.vote_to_remove(vertical, &voter, &member)?;
    persist(config, &engine)?;

    println!("{}", describe_membership(vertical, &outcome));
    Ok(())
}

/// Vote for a new guarded parameter value
pub fn parameter(config: &GateConfig, voter: MemberId, value: u64) -> Result<(), Box<dyn Error>> {
    let mut engine = open_engine(config)?;
    let outcome = engine.vote_parameter(&voter, value)?;
    persist(config, &engine)?;

    println!("{}", describe_action(Vertical::Parameter, &outcome));
    Ok(())
}

/// Vote for a new guarded flag pair
pub fn flags(
    config: &GateConfig,
    voter: MemberId,
    flag_a: bool,
    flag_b: bool,
) -> Result<(), Box<dyn Error>> {
    let mut engine = open_engine(config)?;
    let outcome = engine.vote_flags(&voter, flag_a, flag_b)?;
    persist(config, &engine)?;

    println!("{}", describe_action(Vertical::Flags, &outcome));
    Ok(())
}

fn describe_membership(vertical: Vertical, outcome: &MembershipOutcome) -> String {
    match outcome {
        MembershipOutcome::Pending { votes, threshold } => {
            format!("🗳️  Vote recorded ({}): {}/{}", vertical, votes, threshold)
        }
        MembershipOutcome::Added {
            member,
            group_version,
        } => format!(
            "✅ {} added to {} group (group version {})",
            member, vertical, group_version
        ),
        MembershipOutcome::Removed {
            member,
            group_version,
        } => format!(
            "✅ {} removed from {} group (group version {})",
            member, vertical, group_version
        ),
    }
}

fn describe_action<V: Display>(vertical: Vertical, outcome: &ActionOutcome<V>) -> String {
    match outcome {
        BallotOutcome::Pending {
            value,
            votes,
            threshold,
        } => format!(
            "🗳️  Vote recorded for {} {}: {}/{}",
            vertical, value, votes, threshold
        ),
        BallotOutcome::Resolved {
            value,
            votes,
            round,
            response,
        } if response.is_success() => format!(
            "✅ {} {} resolved in round {} with {} votes: {}",
            vertical, value, round, votes, response
        ),
        BallotOutcome::Resolved {
            value,
            votes,
            round,
            response,
        } => format!(
            "⚠️  {} {} resolved in round {} with {} votes, service answered {}",
            vertical, value, round, votes, response
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multisig_gate::ballot::BoolPair;
    use multisig_gate::gateway::ResponseCode;
    use multisig_gate::store;
    use tempfile::TempDir;

    fn ids(labels: &[&str]) -> Vec<MemberId> {
        labels.iter().map(|l| MemberId::from_label(l)).collect()
    }

    fn initialized(dir: &TempDir) -> GateConfig {
        let config = GateConfig::new(dir.path().join("state.cbor"));
        super::super::init::execute(
            &config,
            ids(&["a", "b", "c"]),
            ids(&["d", "e", "f"]),
            MemberId::from_label("admin"),
        )
        .unwrap();
        config
    }

    #[test]
    fn test_votes_persist_between_calls() {
        let dir = TempDir::new().unwrap();
        let config = initialized(&dir);

        parameter(&config, MemberId::from_label("a"), 7).unwrap();
        parameter(&config, MemberId::from_label("b"), 7).unwrap();

        let engine = open_engine(&config).unwrap();
        assert_eq!(engine.service().parameter, Some(7));
        assert_eq!(engine.round_version(Vertical::Parameter), Ok(2));
    }

    #[test]
    fn test_rejected_vote_leaves_state_untouched() {
        let dir = TempDir::new().unwrap();
        let config = initialized(&dir);
        let before = std::fs::read(&config.state.path).unwrap();

        let result = parameter(&config, MemberId::from_label("d"), 7);
        assert!(result.unwrap_err().to_string().contains("not a member"));

        assert_eq!(std::fs::read(&config.state.path).unwrap(), before);
    }

    #[test]
    fn test_disabled_service_still_resolves() {
        let dir = TempDir::new().unwrap();
        let mut config = initialized(&dir);
        config.service.enabled = false;

        flags(&config, MemberId::from_label("d"), true, true).unwrap();
        flags(&config, MemberId::from_label("e"), true, true).unwrap();

        let engine = store::load_engine(&config.state.path, config.service_policy()).unwrap();
        assert_eq!(engine.service().flags, None);
        assert_eq!(engine.round_version(Vertical::Flags), Ok(2));
    }

    #[test]
    fn test_membership_vote_round_trip() {
        let dir = TempDir::new().unwrap();
        let config = initialized(&dir);

        add(&config, Vertical::Flags, MemberId::from_label("d"), MemberId::from_label("g")).unwrap();
        add(&config, Vertical::Flags, MemberId::from_label("e"), MemberId::from_label("g")).unwrap();

        let engine = open_engine(&config).unwrap();
        assert_eq!(
            engine.is_member(Vertical::Flags, &MemberId::from_label("g")),
            Ok(true)
        );
        assert_eq!(engine.threshold(Vertical::Flags), Ok(3));
    }

    #[test]
    fn test_describe_action() {
        let pending: ActionOutcome<u64> = BallotOutcome::Pending {
            value: 5,
            votes: 1,
            threshold: 2,
        };
        assert!(describe_action(Vertical::Parameter, &pending).contains("1/2"));

        let refused: ActionOutcome<BoolPair> = BallotOutcome::Resolved {
            value: BoolPair::new(true, false),
            votes: 2,
            round: 1,
            response: ResponseCode::RequestDisabled,
        };
        let text = describe_action(Vertical::Flags, &refused);
        assert!(text.contains("REQUEST_DISABLED"));
        assert!(text.contains("(true, false)"));
    }
}
