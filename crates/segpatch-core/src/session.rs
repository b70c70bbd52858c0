//! Instruction accumulator for one submit cycle
//!
//! [`PatchSession`] collects instructions from the builders and hands the
//! whole batch to exactly one of two handlers: the commit handler when there
//! is something to send, the empty handler otherwise.
//!
//! # State machine
//! ```text
//! Idle --reset--> Accumulating --dispatch--> Evaluating --+--empty--> Idle
//!                                                        +--non-empty--> Committing --resolved--> Idle
//! ```
//!
//! The session never retries and never inspects the commit outcome; it only
//! passes it back. One session serves one submit at a time, which `&mut self`
//! on [`PatchSession::dispatch`] enforces.

use crate::error::InstructionError;
use crate::instruction::{Instruction, InstructionBatch};
use std::future::Future;

/// Lifecycle position of a [`PatchSession`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No diff pass in progress
    #[default]
    Idle,

    /// Builders are appending instructions
    Accumulating,

    /// Deciding between commit and empty
    Evaluating,

    /// Commit handler is running
    Committing,
}

/// Which handler a dispatch fired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch<T> {
    /// Nothing accumulated; the empty handler ran
    Empty,

    /// The commit handler ran and resolved with this value
    Committed(T),
}

impl<T> Dispatch<T> {
    /// Check if dispatch found no changes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Committed value, if any
    #[inline]
    #[must_use]
    pub fn committed(self) -> Option<T> {
        match self {
            Self::Committed(value) => Some(value),
            Self::Empty => None,
        }
    }
}

/// Per-submit instruction accumulator
#[derive(Debug, Default)]
pub struct PatchSession {
    batch: InstructionBatch,
    state: SessionState,
}

impl PatchSession {
    /// Create idle session
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard pending instructions and start a diff pass
    ///
    /// Idempotent; also recovers a session whose dispatch future was dropped
    /// while committing.
    pub fn reset(&mut self) {
        self.batch.clear();
        self.state = SessionState::Accumulating;
    }

    /// Append instructions in order
    ///
    /// # Errors
    /// Returns [`InstructionError::InvalidState`] unless [`reset`](Self::reset)
    /// started a diff pass.
    pub fn add_instructions(
        &mut self,
        instructions: impl IntoIterator<Item = Instruction>,
    ) -> Result<(), InstructionError> {
        if self.state != SessionState::Accumulating {
            return Err(InstructionError::InvalidState {
                expected: SessionState::Accumulating,
                actual: self.state,
            });
        }
        self.batch.extend(instructions);
        Ok(())
    }

    /// Check if anything would be committed
    #[inline]
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.batch.is_empty()
    }

    /// Instructions accumulated so far
    #[inline]
    #[must_use]
    pub fn pending(&self) -> &InstructionBatch {
        &self.batch
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Hand the batch to exactly one handler
    ///
    /// The batch is moved out before either handler runs, so it is consumed
    /// once and discarded whatever the commit resolves to. `on_empty` runs
    /// synchronously; `on_commit`'s future is awaited and its result returned
    /// unchanged.
    ///
    /// # Errors
    /// Returns the commit handler's error as is.
    pub async fn dispatch<C, Fut, T, E, G>(
        &mut self,
        on_commit: C,
        on_empty: G,
    ) -> Result<Dispatch<T>, E>
    where
        C: FnOnce(InstructionBatch) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        G: FnOnce(),
    {
        self.state = SessionState::Evaluating;
        let batch = std::mem::take(&mut self.batch);

        if batch.is_empty() {
            tracing::debug!("no pending instructions");
            self.state = SessionState::Idle;
            on_empty();
            return Ok(Dispatch::Empty);
        }

        tracing::info!(instructions = batch.len(), "committing instruction batch");
        self.state = SessionState::Committing;
        let result = on_commit(batch).await;
        self.state = SessionState::Idle;
        result.map(Dispatch::Committed)
    }
}
