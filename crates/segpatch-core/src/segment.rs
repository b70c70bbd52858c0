//! One diff pass over a whole segment

use crate::error::InstructionError;
use crate::model::{SegmentForm, SegmentSnapshot};
use crate::rules::try_build_rule_instructions;
use crate::session::PatchSession;
use crate::targets::{build_list_instructions, ListKind};

/// Reset `session` and fill it with every change between snapshot and form
///
/// Include list, exclude list, then rules. Rule ids are checked before
/// anything is added, so on error the session is left empty.
///
/// # Errors
/// Returns [`InstructionError::DuplicateRuleId`] or
/// [`InstructionError::UnknownRuleId`] for invalid edited rules.
pub fn accumulate_segment_changes(
    session: &mut PatchSession,
    snapshot: &SegmentSnapshot,
    form: &SegmentForm,
) -> Result<(), InstructionError> {
    session.reset();

    let rules = try_build_rule_instructions(&snapshot.rules, &form.rules)?;
    session.add_instructions(build_list_instructions(
        ListKind::Include,
        &snapshot.included,
        &form.included,
    ))?;
    session.add_instructions(build_list_instructions(
        ListKind::Exclude,
        &snapshot.excluded,
        &form.excluded,
    ))?;
    session.add_instructions(rules)?;
    Ok(())
}
