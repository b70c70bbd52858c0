//! Testing utilities for the segpatch workspace
//!
//! Shared fixtures and an in-memory [`PatchSender`].

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use segpatch_client::{PatchError, PatchResponse, PatchSender};
use segpatch_core::{Identifier, PatchPayload, Rule, SegmentSnapshot, Target};

/// Snapshot with two included targets, one excluded target and two clauses
pub fn sample_snapshot() -> SegmentSnapshot {
    SegmentSnapshot {
        identifier: Identifier::new("beta_users"),
        name: "Beta users".to_string(),
        included: vec![
            Target::new("alice").with_name("Alice"),
            Target::new("bob").with_name("Bob"),
        ],
        excluded: vec![Target::new("mallory")],
        rules: vec![
            Rule::new("c1", "email", "ends_with", ["@example.com"]),
            Rule::new("c2", "country", "in", ["DE", "FR"]).with_negate(false),
        ],
    }
}

/// Recorded call to [`RecordingSender`]
#[derive(Debug, Clone, PartialEq)]
pub struct SentPatch {
    pub segment: Identifier,
    pub payload: PatchPayload,
}

/// [`PatchSender`] that records every call
///
/// Answers 200, or rejects with the configured status and message.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<SentPatch>>,
    reject: Mutex<Option<(u16, String)>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sender that rejects every patch
    pub fn rejecting(status: u16, message: impl Into<String>) -> Self {
        let sender = Self::default();
        sender.set_reject(Some((status, message.into())));
        sender
    }

    /// Change rejection behaviour for later calls
    pub fn set_reject(&self, reject: Option<(u16, String)>) {
        *self.reject.lock() = reject;
    }

    pub fn sent(&self) -> Vec<SentPatch> {
        self.sent.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl PatchSender for RecordingSender {
    async fn send_patch(
        &self,
        segment: &Identifier,
        payload: &PatchPayload,
    ) -> Result<PatchResponse, PatchError> {
        self.sent.lock().push(SentPatch {
            segment: segment.clone(),
            payload: payload.clone(),
        });

        match self.reject.lock().clone() {
            Some((status, message)) => Err(PatchError::rejected(status, message)),
            None => Ok(PatchResponse {
                status: 200,
                body: None,
            }),
        }
    }
}
