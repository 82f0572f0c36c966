//! Notification log.
//!
//! Append-only record of what the engine did, for off-engine tooling:
//! - Immutable once written (no deletion, no rewriting)
//! - Ordered by a sequence number starting at 1
//! - Identities appear as `MemberId`, never as operator labels
//! - Never trimmed: the log is persisted whole with the engine state, so
//!   the state file grows with every notification

use super::traits::ResponseCode;
use super::Vertical;
use crate::identity::MemberId;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Something the engine did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// Vote cast for a numeric value.
    ParameterVoted { voter: MemberId, value: u64 },
    /// Numeric action resolved and dispatched.
    ParameterResolved { value: u64, response: ResponseCode },
    /// Vote cast for a flag pair.
    FlagsVoted {
        voter: MemberId,
        flag_a: bool,
        flag_b: bool,
    },
    /// Flag-pair action resolved and dispatched.
    FlagsResolved {
        flag_a: bool,
        flag_b: bool,
        response: ResponseCode,
    },
    MemberAddVoted {
        vertical: Vertical,
        voter: MemberId,
        candidate: MemberId,
    },
    MemberRemoveVoted {
        vertical: Vertical,
        voter: MemberId,
        member: MemberId,
    },
    MemberAdded {
        vertical: Vertical,
        member: MemberId,
        group_version: u64,
    },
    MemberRemoved {
        vertical: Vertical,
        member: MemberId,
        group_version: u64,
    },
}

/// A logged notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the log, starting at 1.
    pub seq: u64,
    /// Unix timestamp (seconds since epoch).
    pub recorded_at: u64,
    pub notification: Notification,
}

/// Append-only notification log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification and return its sequence number.
    pub fn push(&mut self, notification: Notification) -> u64 {
        let seq = self.records.len() as u64 + 1;
        let recorded_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.records.push(EventRecord {
            seq,
            recorded_at,
            notification,
        });
        seq
    }

    /// Records with a sequence number greater than `seq`.
    pub fn since(&self, seq: u64) -> &[EventRecord] {
        let start = (seq as usize).min(self.records.len());
        &self.records[start..]
    }

    pub fn all(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&EventRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
