//! Segment edit submit flow
//!
//! On every submit the editor re-diffs the current form against the
//! snapshot, so a retry after a failed PATCH never resends a stale batch.

use crate::error::{EditError, PatchError};
use crate::sender::{PatchResponse, PatchSender};
use segpatch_core::{
    accumulate_segment_changes, Dispatch, InstructionBatch, PatchSession, SegmentForm,
    SegmentSnapshot,
};

/// Result of a successful submit
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Form matched the snapshot; no request was made
    NoChanges,

    /// Patch applied
    Saved {
        /// Instructions that were sent
        instructions: InstructionBatch,
        /// Server response
        response: PatchResponse,
    },
}

impl EditOutcome {
    /// Check if a request was made
    #[inline]
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// Edit dialog controller for one segment
///
/// Owns its [`PatchSession`]; `submit` takes `&mut self`, so a second submit
/// cannot start while one is in flight.
#[derive(Debug)]
pub struct SegmentEditor<S> {
    sender: S,
    session: PatchSession,
}

impl<S: PatchSender> SegmentEditor<S> {
    /// Create editor
    #[inline]
    #[must_use]
    pub fn new(sender: S) -> Self {
        Self {
            sender,
            session: PatchSession::new(),
        }
    }

    /// Sender in use
    #[inline]
    #[must_use]
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Compute the instructions a submit would send, without sending
    ///
    /// # Errors
    /// Returns [`EditError::Instruction`] if the edited rules have duplicate
    /// or unknown ids.
    pub fn preview(
        &mut self,
        snapshot: &SegmentSnapshot,
        form: &SegmentForm,
    ) -> Result<InstructionBatch, EditError> {
        accumulate_segment_changes(&mut self.session, snapshot, form)?;
        let batch = self.session.pending().clone();
        self.session.reset();
        Ok(batch)
    }

    /// Diff the form and send the resulting batch
    ///
    /// Returns [`EditOutcome::NoChanges`] without touching the network when
    /// nothing changed.
    ///
    /// # Errors
    /// Returns [`EditError::Instruction`] for invalid rule ids and
    /// [`EditError::Patch`] when the sender fails. Nothing is retained either way.
    pub async fn submit(
        &mut self,
        snapshot: &SegmentSnapshot,
        form: &SegmentForm,
    ) -> Result<EditOutcome, EditError> {
        accumulate_segment_changes(&mut self.session, snapshot, form)?;

        let segment = &snapshot.identifier;
        let sender = &self.sender;
        let dispatched = self
            .session
            .dispatch(
                |batch| async move {
                    let payload = batch.into_payload();
                    let response = sender.send_patch(segment, &payload).await?;
                    Ok::<_, PatchError>((InstructionBatch::from(payload.instructions), response))
                },
                || tracing::info!(%segment, "no changes to save"),
            )
            .await;

        match dispatched {
            Ok(Dispatch::Empty) => Ok(EditOutcome::NoChanges),
            Ok(Dispatch::Committed((instructions, response))) => {
                tracing::info!(
                    %segment,
                    instructions = instructions.len(),
                    status = response.status,
                    "segment saved"
                );
                Ok(EditOutcome::Saved {
                    instructions,
                    response,
                })
            }
            Err(e) => {
                tracing::warn!(%segment, error = %e, "segment save failed");
                Err(e.into())
            }
        }
    }
}
