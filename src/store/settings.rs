//! Locally applied guarded settings.

use crate::ballot::BoolPair;
use crate::gateway::{ActionService, ResponseCode};
use serde::{Deserialize, Serialize};

/// Operator policy for the local collaborator. Not persisted; taken from
/// the config file on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServicePolicy {
    /// When false every request is answered with `RequestDisabled`.
    pub enabled: bool,
    /// Largest numeric parameter accepted; larger values are `InvalidValue`.
    pub max_parameter: Option<u64>,
}

impl Default for ServicePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            max_parameter: None,
        }
    }
}

/// The guarded parameter and flag pair as last applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSettings {
    #[serde(skip)]
    policy: ServicePolicy,
    /// Current numeric parameter, if ever set.
    pub parameter: Option<u64>,
    /// Current flag pair, if ever set.
    pub flags: Option<BoolPair>,
    /// Successful applications so far.
    #[serde(default)]
    pub applied: u64,
}

impl LocalSettings {
    pub fn new(policy: ServicePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> ServicePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ServicePolicy) {
        self.policy = policy;
    }
}

impl ActionService for LocalSettings {
    fn set_guarded_parameter(&mut self, value: u64) -> ResponseCode {
        if !self.policy.enabled {
            return ResponseCode::RequestDisabled;
        }
        if self.policy.max_parameter.is_some_and(|max| value > max) {
            return ResponseCode::InvalidValue;
        }
        self.parameter = Some(value);
        self.applied += 1;
        ResponseCode::Success
    }

    fn set_guarded_flags(&mut self, flag_a: bool, flag_b: bool) -> ResponseCode {
        if !self.policy.enabled {
            return ResponseCode::RequestDisabled;
        }
        self.flags = Some(BoolPair::new(flag_a, flag_b));
        self.applied += 1;
        ResponseCode::Success
    }
}
