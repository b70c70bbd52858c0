//! Segment Patch Client
//!
//! Sends instruction batches to the segment PATCH endpoint and drives the
//! edit dialog's submit cycle.
//!
//! # Example
//!
//! ```rust,ignore
//! use segpatch_client::{HttpPatchSender, PatchClientConfig, SegmentEditor, EditOutcome};
//!
//! let config = PatchClientConfig::load("segpatch.toml")?;
//! let mut editor = SegmentEditor::new(HttpPatchSender::new(config)?);
//!
//! match editor.submit(&snapshot, &form).await {
//!     Ok(EditOutcome::NoChanges) => close_dialog(),
//!     Ok(EditOutcome::Saved { .. }) => { toast_success(); refetch(); close_dialog() }
//!     Err(e) => toast_error(e.user_message()),
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod editor;
mod error;
mod sender;

pub use config::{ConfigError, PatchClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use editor::{EditOutcome, SegmentEditor};
pub use error::{EditError, PatchError};
pub use sender::{extract_error_message, HttpPatchSender, PatchResponse, PatchSender};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
