//! Multisig voting engine.
//!
//! Top-level entry point: one-time setup, the vote operations for both
//! verticals, and read-only views. Until `initialize` succeeds every
//! operation fails with `NotReady`.
//!
//! Vertical binding:
//! - `Vertical::Parameter`: parameter group + numeric ballot
//! - `Vertical::Flags`: flags group + flag-pair ballot
//!
//! The two verticals share no mutable state.

use crate::ballot::{BoolPair, ValueVoteView};
use crate::error::{GateError, GateResult};
use crate::gateway::{
    ActionGateway, ActionOutcome, ActionService, EventRecord, Notification, Vertical,
};
use crate::group::{MembershipOutcome, ProposalView, ThresholdGroup, DEFAULT_MEMBERSHIP_FLOOR};
use crate::identity::MemberId;
use serde::{Deserialize, Serialize};

/// One-time setup parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupParams {
    pub parameter_members: Vec<MemberId>,
    pub flags_members: Vec<MemberId>,
    /// Identity reserved for the upgrade mechanism; never votes.
    pub admin: MemberId,
    pub membership_floor: usize,
}

impl SetupParams {
    /// Setup with the default membership floor.
    pub fn new(
        parameter_members: Vec<MemberId>,
        flags_members: Vec<MemberId>,
        admin: MemberId,
    ) -> Self {
        Self {
            parameter_members,
            flags_members,
            admin,
            membership_floor: DEFAULT_MEMBERSHIP_FLOOR,
        }
    }

    /// Raise the membership floor. `initialize` rejects anything below
    /// [`DEFAULT_MEMBERSHIP_FLOOR`].
    pub fn with_floor(mut self, membership_floor: usize) -> Self {
        self.membership_floor = membership_floor;
        self
    }
}

/// State that exists once setup has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    admin: MemberId,
    parameter_group: ThresholdGroup,
    flags_group: ThresholdGroup,
    gateway: ActionGateway,
}

impl EngineState {
    fn group(&self, vertical: Vertical) -> &ThresholdGroup {
        match vertical {
            Vertical::Parameter => &self.parameter_group,
            Vertical::Flags => &self.flags_group,
        }
    }

    fn group_mut(&mut self, vertical: Vertical) -> &mut ThresholdGroup {
        match vertical {
            Vertical::Parameter => &mut self.parameter_group,
            Vertical::Flags => &mut self.flags_group,
        }
    }
}

/// The engine, generic over the collaborator that performs actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engine<S> {
    service: S,
    state: Option<EngineState>,
}

impl<S: ActionService> Engine<S> {
    /// Create an engine that has not been set up yet.
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_some()
    }

    /// Run the one-time setup.
    ///
    /// Both member lists must hold at least `membership_floor` unique
    /// identities. A second call fails with `AlreadyInitialized`.
    pub fn initialize(&mut self, params: SetupParams) -> GateResult<()> {
        if self.state.is_some() {
            return Err(GateError::AlreadyInitialized);
        }

        let parameter_group =
            ThresholdGroup::with_floor(params.parameter_members, params.membership_floor)?;
        let flags_group =
            ThresholdGroup::with_floor(params.flags_members, params.membership_floor)?;

        tracing::info!(
            parameter_members = parameter_group.len(),
            flags_members = flags_group.len(),
            floor = params.membership_floor,
            admin = %params.admin.short(),
            "engine initialized"
        );
        self.state = Some(EngineState {
            admin: params.admin,
            parameter_group,
            flags_group,
            gateway: ActionGateway::new(),
        });
        Ok(())
    }

    fn ready(&self) -> GateResult<&EngineState> {
        self.state.as_ref().ok_or(GateError::NotReady)
    }

    // ------------------------------------------------------------------
    // Membership votes
    // ------------------------------------------------------------------

    /// Vote to add `candidate` to `vertical`'s group.
    pub fn vote_to_add(
        &mut self,
        vertical: Vertical,
        caller: &MemberId,
        candidate: &MemberId,
    ) -> GateResult<MembershipOutcome> {
        let state = self.state.as_mut().ok_or(GateError::NotReady)?;
        let outcome = state.group_mut(vertical).vote_to_add(caller, candidate)?;

        state.gateway.notify(Notification::MemberAddVoted {
            vertical,
            voter: *caller,
            candidate: *candidate,
        });
        if let MembershipOutcome::Added {
            member,
            group_version,
        } = outcome
        {
            state.gateway.notify(Notification::MemberAdded {
                vertical,
                member,
                group_version,
            });
        }
        Ok(outcome)
    }

    /// Vote to remove `member` from `vertical`'s group.
    pub fn vote_to_remove(
        &mut self,
        vertical: Vertical,
        caller: &MemberId,
        member: &MemberId,
    ) -> GateResult<MembershipOutcome> {
        let state = self.state.as_mut().ok_or(GateError::NotReady)?;
        let outcome = state.group_mut(vertical).vote_to_remove(caller, member)?;

        state.gateway.notify(Notification::MemberRemoveVoted {
            vertical,
            voter: *caller,
            member: *member,
        });
        if let MembershipOutcome::Removed {
            member,
            group_version,
        } = outcome
        {
            state.gateway.notify(Notification::MemberRemoved {
                vertical,
                member,
                group_version,
            });
        }
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Action votes
    // ------------------------------------------------------------------

    /// Vote for a new value of the guarded numeric parameter.
    pub fn vote_parameter(&mut self, voter: &MemberId, value: u64) -> GateResult<ActionOutcome<u64>> {
        let Self { service, state } = self;
        let state = state.as_mut().ok_or(GateError::NotReady)?;
        state
            .gateway
            .vote_parameter(&state.parameter_group, service, voter, value)
    }

    /// Vote for a new guarded flag pair.
    pub fn vote_flags(
        &mut self,
        voter: &MemberId,
        flag_a: bool,
        flag_b: bool,
    ) -> GateResult<ActionOutcome<BoolPair>> {
        let Self { service, state } = self;
        let state = state.as_mut().ok_or(GateError::NotReady)?;
        state.gateway.vote_flags(
            &state.flags_group,
            service,
            voter,
            BoolPair::new(flag_a, flag_b),
        )
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Identity reserved for the upgrade mechanism.
    pub fn admin(&self) -> GateResult<MemberId> {
        Ok(self.ready()?.admin)
    }

    pub fn member_count(&self, vertical: Vertical) -> GateResult<usize> {
        Ok(self.ready()?.group(vertical).len())
    }

    pub fn members(&self, vertical: Vertical) -> GateResult<Vec<MemberId>> {
        Ok(self.ready()?.group(vertical).members().copied().collect())
    }

    pub fn is_member(&self, vertical: Vertical, identity: &MemberId) -> GateResult<bool> {
        Ok(self.ready()?.group(vertical).is_member(identity))
    }

    pub fn threshold(&self, vertical: Vertical) -> GateResult<usize> {
        Ok(self.ready()?.group(vertical).threshold())
    }

    pub fn group_version(&self, vertical: Vertical) -> GateResult<u64> {
        Ok(self.ready()?.group(vertical).version())
    }

    pub fn membership_floor(&self, vertical: Vertical) -> GateResult<usize> {
        Ok(self.ready()?.group(vertical).floor())
    }

    /// Stored add proposal for `candidate`, as last written.
    pub fn pending_addition(
        &self,
        vertical: Vertical,
        candidate: &MemberId,
    ) -> GateResult<Option<ProposalView>> {
        Ok(self.ready()?.group(vertical).pending_addition(candidate))
    }

    /// Stored remove proposal for `member`, as last written.
    pub fn pending_removal(
        &self,
        vertical: Vertical,
        member: &MemberId,
    ) -> GateResult<Option<ProposalView>> {
        Ok(self.ready()?.group(vertical).pending_removal(member))
    }

    pub fn round_version(&self, vertical: Vertical) -> GateResult<u64> {
        Ok(self.ready()?.gateway.round_version(vertical))
    }

    /// Stored record for a numeric value, as last written.
    pub fn parameter_votes(&self, value: u64) -> GateResult<Option<ValueVoteView>> {
        Ok(self.ready()?.gateway.parameter_ballot().value_votes(&value))
    }

    /// Stored record for a flag pair, as last written.
    pub fn flag_votes(&self, flag_a: bool, flag_b: bool) -> GateResult<Option<ValueVoteView>> {
        Ok(self
            .ready()?
            .gateway
            .flags_ballot()
            .value_votes(&BoolPair::new(flag_a, flag_b)))
    }

    pub fn has_voted_for_parameter(&self, voter: &MemberId, value: u64) -> GateResult<bool> {
        Ok(self.ready()?.gateway.parameter_ballot().has_voted(voter, &value))
    }

    pub fn has_voted_for_flags(
        &self,
        voter: &MemberId,
        flag_a: bool,
        flag_b: bool,
    ) -> GateResult<bool> {
        Ok(self
            .ready()?
            .gateway
            .flags_ballot()
            .has_voted(voter, &BoolPair::new(flag_a, flag_b)))
    }

    /// Notifications with a sequence number greater than `seq`.
    pub fn events_since(&self, seq: u64) -> GateResult<&[EventRecord]> {
        Ok(self.ready()?.gateway.events().since(seq))
    }

    /// Post-setup state, without the collaborator.
    pub fn state_snapshot(&self) -> Option<&EngineState> {
        self.state.as_ref()
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }
}
