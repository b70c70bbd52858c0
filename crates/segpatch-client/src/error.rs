//! Error types for patch submission

use crate::config::ConfigError;
use segpatch_core::InstructionError;

/// Errors from a [`PatchSender`](crate::PatchSender)
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// Request could not be sent or the response could not be read
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server refused the patch
    #[error("patch rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// Client misconfigured
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl PatchError {
    /// Create rejection error
    #[inline]
    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Check if the same request could succeed later
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Rejected { status, .. } => *status >= 500 || *status == 429,
            Self::Config(_) => false,
        }
    }
}

/// Errors from a segment edit submit
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// Form values could not be turned into instructions
    #[error("invalid edit: {0}")]
    Instruction(#[from] InstructionError),

    /// Patch failed
    #[error(transparent)]
    Patch(#[from] PatchError),
}

impl EditError {
    /// Message to show the user
    ///
    /// For server rejections this is the server's message verbatim.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Patch(PatchError::Rejected { message, .. }) => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use segpatch_core::Identifier;

    #[test]
    fn rejected_retryable_by_status() {
        assert!(PatchError::rejected(503, "down").is_retryable());
        assert!(PatchError::rejected(429, "slow down").is_retryable());
        assert!(!PatchError::rejected(400, "bad clause").is_retryable());
    }

    #[test]
    fn user_message_is_server_message() {
        let err = EditError::from(PatchError::rejected(400, "clause not found"));
        assert_eq!(err.user_message(), "clause not found");
    }

    #[test]
    fn user_message_for_invalid_edit() {
        let err = EditError::from(InstructionError::UnknownRuleId(Identifier::new("x")));
        assert_eq!(
            err.user_message(),
            "invalid edit: rule id 'x' does not exist on the segment"
        );
    }
}
