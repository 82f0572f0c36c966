//! Recording collaborator for tests.
//!
//! Records every dispatched action in order and answers with a configurable
//! response code.

use super::traits::{ActionService, ResponseCode};
use crate::ballot::BoolPair;

/// An action the collaborator was asked to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchedAction {
    Parameter(u64),
    Flags(BoolPair),
}

/// Collaborator that remembers what it was asked to do.
#[derive(Debug, Clone)]
pub struct RecordingService {
    response: ResponseCode,
    dispatched: Vec<DispatchedAction>,
}

impl RecordingService {
    /// Create a service that answers `Success`.
    pub fn new() -> Self {
        Self::responding(ResponseCode::Success)
    }

    /// Create a service that answers `response` to everything.
    pub fn responding(response: ResponseCode) -> Self {
        Self {
            response,
            dispatched: Vec::new(),
        }
    }

    /// Change the response for subsequent calls.
    pub fn set_response(&mut self, response: ResponseCode) {
        self.response = response;
    }

    /// Get dispatched actions for assertions.
    pub fn dispatched(&self) -> &[DispatchedAction] {
        &self.dispatched
    }

    /// Numeric values dispatched so far.
    pub fn parameters(&self) -> Vec<u64> {
        self.dispatched
            .iter()
            .filter_map(|action| match action {
                DispatchedAction::Parameter(value) => Some(*value),
                DispatchedAction::Flags(_) => None,
            })
            .collect()
    }

    /// Flag pairs dispatched so far.
    pub fn flag_pairs(&self) -> Vec<BoolPair> {
        self.dispatched
            .iter()
            .filter_map(|action| match action {
                DispatchedAction::Flags(pair) => Some(*pair),
                DispatchedAction::Parameter(_) => None,
            })
            .collect()
    }
}

impl Default for RecordingService {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionService for RecordingService {
    fn set_guarded_parameter(&mut self, value: u64) -> ResponseCode {
        self.dispatched.push(DispatchedAction::Parameter(value));
        self.response
    }

    fn set_guarded_flags(&mut self, flag_a: bool, flag_b: bool) -> ResponseCode {
        self.dispatched
            .push(DispatchedAction::Flags(BoolPair::new(flag_a, flag_b)));
        self.response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut service = RecordingService::new();
        assert_eq!(service.set_guarded_parameter(5), ResponseCode::Success);
        assert_eq!(service.set_guarded_flags(true, false), ResponseCode::Success);
        assert_eq!(service.set_guarded_parameter(6), ResponseCode::Success);

        assert_eq!(
            service.dispatched(),
            &[
                DispatchedAction::Parameter(5),
                DispatchedAction::Flags(BoolPair::new(true, false)),
                DispatchedAction::Parameter(6),
            ]
        );
        assert_eq!(service.parameters(), vec![5, 6]);
        assert_eq!(service.flag_pairs(), vec![BoolPair::new(true, false)]);
    }

    #[test]
    fn test_configured_response() {
        let mut service = RecordingService::responding(ResponseCode::ReleaseDisabled);
        assert_eq!(service.set_guarded_parameter(1), ResponseCode::ReleaseDisabled);

        service.set_response(ResponseCode::Success);
        assert_eq!(service.set_guarded_flags(false, false), ResponseCode::Success);
        assert_eq!(service.dispatched().len(), 2);
    }
}
