//! Action gateway: the two guarded actions and their single call-out.
//!
//! Owns one ballot per vertical (numeric parameter, flag pair) and the
//! notification log. Voting logic lives in `ballot`; the gateway only wires
//! a resolved value to the `ActionService` and records what happened. The
//! group a ballot is bound to is passed in by the caller, so both verticals
//! may share one group or use their own.

pub mod events;
pub mod mock;
pub mod traits;

pub use events::{EventLog, EventRecord, Notification};
pub use mock::{DispatchedAction, RecordingService};
pub use traits::{ActionService, ResponseCode};

use crate::ballot::{ActionBallot, BallotOutcome, BoolPair};
use crate::error::GateResult;
use crate::group::ThresholdGroup;
use crate::identity::MemberId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of an action vote; `Resolved` carries the collaborator response.
pub type ActionOutcome<V> = BallotOutcome<V, ResponseCode>;

/// The two independent guarded actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vertical {
    /// Guarded numeric parameter.
    Parameter,
    /// Guarded flag pair.
    Flags,
}

impl Vertical {
    pub const ALL: [Vertical; 2] = [Vertical::Parameter, Vertical::Flags];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parameter => "parameter",
            Self::Flags => "flags",
        }
    }
}

impl fmt::Display for Vertical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vertical {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parameter" => Ok(Self::Parameter),
            "flags" => Ok(Self::Flags),
            other => Err(format!(
                "unknown vertical '{}', expected 'parameter' or 'flags'",
                other
            )),
        }
    }
}

/// Ballots for both verticals plus the notification log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionGateway {
    parameter: ActionBallot<u64>,
    flags: ActionBallot<BoolPair>,
    events: EventLog,
}

impl ActionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vote for a numeric parameter value; dispatches on resolution.
    pub fn vote_parameter<S>(
        &mut self,
        group: &ThresholdGroup,
        service: &mut S,
        voter: &MemberId,
        value: u64,
    ) -> GateResult<ActionOutcome<u64>>
    where
        S: ActionService + ?Sized,
    {
        let outcome = self
            .parameter
            .vote_for(group, voter, value, |v| service.set_guarded_parameter(v))?;

        self.events.push(Notification::ParameterVoted {
            voter: *voter,
            value,
        });
        if let BallotOutcome::Resolved { response, .. } = outcome {
            log_response(Vertical::Parameter, response);
            self.events
                .push(Notification::ParameterResolved { value, response });
        }
        Ok(outcome)
    }

    /// Vote for a flag pair; dispatches on resolution.
    pub fn vote_flags<S>(
        &mut self,
        group: &ThresholdGroup,
        service: &mut S,
        voter: &MemberId,
        pair: BoolPair,
    ) -> GateResult<ActionOutcome<BoolPair>>
    where
        S: ActionService + ?Sized,
    {
        let outcome = self.flags.vote_for(group, voter, pair, |p| {
            service.set_guarded_flags(p.flag_a, p.flag_b)
        })?;

        self.events.push(Notification::FlagsVoted {
            voter: *voter,
            flag_a: pair.flag_a,
            flag_b: pair.flag_b,
        });
        if let BallotOutcome::Resolved { response, .. } = outcome {
            log_response(Vertical::Flags, response);
            self.events.push(Notification::FlagsResolved {
                flag_a: pair.flag_a,
                flag_b: pair.flag_b,
                response,
            });
        }
        Ok(outcome)
    }

    /// Record a notification raised outside the action ballots.
    pub fn notify(&mut self, notification: Notification) -> u64 {
        self.events.push(notification)
    }

    pub fn parameter_ballot(&self) -> &ActionBallot<u64> {
        &self.parameter
    }

    pub fn flags_ballot(&self) -> &ActionBallot<BoolPair> {
        &self.flags
    }

    /// Current round of `vertical`'s ballot.
    pub fn round_version(&self, vertical: Vertical) -> u64 {
        match vertical {
            Vertical::Parameter => self.parameter.round_version(),
            Vertical::Flags => self.flags.round_version(),
        }
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }
}

fn log_response(vertical: Vertical, response: ResponseCode) {
    if response.is_success() {
        tracing::info!(%vertical, %response, "action dispatched");
    } else {
        tracing::warn!(%vertical, %response, "collaborator rejected dispatched action");
    }
}
