//! Collaborator trait abstraction.
//!
//! The service that actually changes the guarded parameter and flags sits
//! behind `ActionService` so the engine can be driven by `RecordingService`
//! in tests and by `store::LocalSettings` from the CLI.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Response returned by the collaborator for every dispatched action.
///
/// Anything other than `Success` is reported in notifications; it does
/// not undo the resolution or the round advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseCode {
    Success,
    UnauthorizedCaller,
    InvalidValue,
    RequestDisabled,
    ReleaseDisabled,
    EnvironmentDisabled,
    GenericError,
}

impl ResponseCode {
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "SUCCESS",
            Self::UnauthorizedCaller => "UNAUTHORIZED_CALLER",
            Self::InvalidValue => "INVALID_VALUE",
            Self::RequestDisabled => "REQUEST_DISABLED",
            Self::ReleaseDisabled => "RELEASE_DISABLED",
            Self::EnvironmentDisabled => "ENVIRONMENT_DISABLED",
            Self::GenericError => "GENERIC_ERROR",
        };
        f.write_str(name)
    }
}

/// The external action performer.
///
/// Calls are synchronous and return immediately with a response code.
pub trait ActionService {
    /// Apply a new value for the guarded numeric parameter.
    fn set_guarded_parameter(&mut self, value: u64) -> ResponseCode;

    /// Apply a new guarded flag pair.
    fn set_guarded_flags(&mut self, flag_a: bool, flag_b: bool) -> ResponseCode;
}

impl<S: ActionService + ?Sized> ActionService for &mut S {
    fn set_guarded_parameter(&mut self, value: u64) -> ResponseCode {
        (**self).set_guarded_parameter(value)
    }

    fn set_guarded_flags(&mut self, flag_a: bool, flag_b: bool) -> ResponseCode {
        (**self).set_guarded_flags(flag_a, flag_b)
    }
}

impl<S: ActionService + ?Sized> ActionService for Box<S> {
    fn set_guarded_parameter(&mut self, value: u64) -> ResponseCode {
        (**self).set_guarded_parameter(value)
    }

    fn set_guarded_flags(&mut self, flag_a: bool, flag_b: bool) -> ResponseCode {
        (**self).set_guarded_flags(flag_a, flag_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_code_display() {
        assert_eq!(ResponseCode::Success.to_string(), "SUCCESS");
        assert_eq!(
            ResponseCode::EnvironmentDisabled.to_string(),
            "ENVIRONMENT_DISABLED"
        );
    }

    #[test]
    fn test_response_code_serialization_matches_display() {
        for code in [
            ResponseCode::Success,
            ResponseCode::UnauthorizedCaller,
            ResponseCode::InvalidValue,
            ResponseCode::RequestDisabled,
            ResponseCode::ReleaseDisabled,
            ResponseCode::EnvironmentDisabled,
            ResponseCode::GenericError,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code));
        }
    }

    #[test]
    fn test_only_success_is_success() {
        assert!(ResponseCode::Success.is_success());
        assert!(!ResponseCode::GenericError.is_success());
    }
}
