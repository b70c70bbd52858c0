//! Error types for instruction building and session dispatch

use crate::identifier::Identifier;
use crate::session::SessionState;

/// Errors raised by the checked builders and the session
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstructionError {
    /// Two edited rules claim the same persisted id
    #[error("duplicate rule id '{id}' at positions {first} and {second}")]
    DuplicateRuleId {
        /// Shared id
        id: Identifier,
        /// Index of first occurrence
        first: usize,
        /// Index of second occurrence
        second: usize,
    },

    /// Edited rule carries an id the segment does not have
    #[error("rule id '{0}' does not exist on the segment")]
    UnknownRuleId(Identifier),

    /// Session used out of order
    #[error("session is {actual:?}, expected {expected:?}")]
    InvalidState {
        /// State the operation requires
        expected: SessionState,
        /// Current state
        actual: SessionState,
    },
}
