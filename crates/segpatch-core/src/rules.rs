//! Clause instruction builder
//!
//! Compares persisted rules against edited rules by id and emits, in this
//! order:
//! 1. `removeClause` for every persisted rule whose id is gone
//! 2. `addClause` for every rule without an id
//! 3. `updateClause` for every rule whose id persists but whose content changed
//!
//! Content comparison includes `negate`, while `updateClause` never carries
//! it. A rule whose `negate` alone changed therefore yields an update that
//! does not change `negate` on the server.

use crate::error::InstructionError;
use crate::identifier::Identifier;
use crate::instruction::Instruction;
use crate::model::Rule;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Persisted rules keyed by id, in fetch order
fn index_by_id(rules: &[Rule]) -> IndexMap<&Identifier, &Rule> {
    rules.iter().map(|r| (&r.id, r)).collect()
}

/// Diff persisted rules against edited rules
///
/// An edited rule with a non-empty id that matches no persisted rule falls in
/// none of the three buckets and is dropped. Use
/// [`try_build_rule_instructions`] to reject such input instead.
#[must_use]
pub fn build_rule_instructions(existing: &[Rule], desired: &[Rule]) -> Vec<Instruction> {
    let persisted = index_by_id(existing);
    let kept: HashSet<&Identifier> = desired
        .iter()
        .filter(|r| r.is_persisted())
        .map(|r| &r.id)
        .collect();

    let removed = persisted
        .keys()
        .filter(|id| !kept.contains(*id))
        .map(|id| Instruction::remove_clause((*id).clone()));

    let added = desired
        .iter()
        .filter(|r| !r.is_persisted())
        .map(Instruction::add_clause);

    let updated = desired
        .iter()
        .filter(|r| r.is_persisted())
        .filter_map(|r| match persisted.get(&r.id) {
            Some(before) if !before.content_eq(r) => Some(Instruction::update_clause(r)),
            Some(_) => None,
            None => {
                tracing::warn!(id = %r.id, "dropping edited rule with unknown id");
                None
            }
        });

    let instructions: Vec<Instruction> = removed.chain(added).chain(updated).collect();
    tracing::debug!(
        existing = existing.len(),
        desired = desired.len(),
        emitted = instructions.len(),
        "diffed rules"
    );
    instructions
}

/// Validate edited rule ids against the persisted rules
///
/// # Errors
/// - [`InstructionError::DuplicateRuleId`] if two edited rules share a non-empty id
/// - [`InstructionError::UnknownRuleId`] if an edited rule's id is not persisted
pub fn check_rule_ids(existing: &[Rule], desired: &[Rule]) -> Result<(), InstructionError> {
    let persisted = index_by_id(existing);
    let mut seen: IndexMap<&Identifier, usize> = IndexMap::with_capacity(desired.len());

    for (position, rule) in desired.iter().enumerate() {
        if !rule.is_persisted() {
            continue;
        }
        if let Some(&first) = seen.get(&rule.id) {
            return Err(InstructionError::DuplicateRuleId {
                id: rule.id.clone(),
                first,
                second: position,
            });
        }
        if !persisted.contains_key(&rule.id) {
            return Err(InstructionError::UnknownRuleId(rule.id.clone()));
        }
        seen.insert(&rule.id, position);
    }
    Ok(())
}

/// [`check_rule_ids`] followed by [`build_rule_instructions`]
///
/// # Errors
/// Propagates [`check_rule_ids`] failures; no instructions are built then.
pub fn try_build_rule_instructions(
    existing: &[Rule],
    desired: &[Rule],
) -> Result<Vec<Instruction>, InstructionError> {
    check_rule_ids(existing, desired)?;
    Ok(build_rule_instructions(existing, desired))
}
