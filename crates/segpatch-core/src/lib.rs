//! Segment Patch Core
//!
//! Turns an edited segment form into the minimal ordered list of PATCH
//! instructions against the segment's persisted state.
//!
//! # Core Concepts
//!
//! - [`diff`]: Set difference over ordered key lists
//! - [`build_list_instructions`]: Include/exclude list changes (at most one add, one remove)
//! - [`build_rule_instructions`]: Clause removals, additions and updates
//! - [`PatchSession`]: Accumulates instructions and dispatches the batch once
//! - [`accumulate_segment_changes`]: One full diff pass of a segment into a session
//! - [`Instruction`] / [`PatchPayload`]: What goes over the wire
//!
//! # Example
//!
//! ```rust,ignore
//! use segpatch_core::{build_list_instructions, build_rule_instructions, ListKind, PatchSession};
//!
//! let mut session = PatchSession::new();
//! session.reset();
//! session.add_instructions(build_list_instructions(ListKind::Include, &snapshot.included, &form.included))?;
//! session.add_instructions(build_rule_instructions(&snapshot.rules, &form.rules))?;
//!
//! session
//!     .dispatch(|batch| sender.send_patch(&segment, &batch.into_payload()), || close())
//!     .await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod diff;
mod error;
mod identifier;
mod instruction;
mod model;
mod rules;
mod segment;
mod session;
mod targets;

// Re-exports
pub use diff::{diff, diff_by, Diff};
pub use error::InstructionError;
pub use identifier::Identifier;
pub use instruction::{Instruction, InstructionBatch, PatchPayload};
pub use model::{Rule, SegmentForm, SegmentSnapshot, Selection, Target};
pub use rules::{build_rule_instructions, check_rule_ids, try_build_rule_instructions};
pub use segment::accumulate_segment_changes;
pub use session::{Dispatch, PatchSession, SessionState};
pub use targets::{build_list_instructions, build_target_instructions, ListKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
