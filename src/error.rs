//! Engine errors.
//!
//! Every variant aborts the vote-processing unit that raised it before any
//! state is touched. Collaborator response codes are not errors; they
//! travel in notifications (see `gateway::ResponseCode`).

use crate::identity::MemberId;

/// Engine result type.
pub type GateResult<T> = Result<T, GateError>;

/// Engine errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("engine not initialized")]
    NotReady,

    #[error("engine already initialized")]
    AlreadyInitialized,

    #[error("caller {member:?} is not a member of the group")]
    OnlyMember { member: MemberId },

    #[error("{voter:?} already voted for this candidate in the current round")]
    AlreadyVoted { voter: MemberId },

    #[error("removal would leave {remaining} members, floor is {floor}")]
    MembershipFloorViolation { floor: usize, remaining: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{member:?} is already a member")]
    AlreadyMember { member: MemberId },

    #[error("{member:?} is not a member")]
    NotAMember { member: MemberId },
}
