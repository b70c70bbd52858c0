//! Include/exclude list instruction builder

use crate::diff::diff_by;
use crate::identifier::Identifier;
use crate::instruction::Instruction;
use crate::model::{Selection, Target};

/// Which individual-target list of a segment is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// Explicitly included targets
    Include,

    /// Explicitly excluded targets
    Exclude,
}

impl ListKind {
    /// Add instruction for this list
    #[must_use]
    pub fn add_instruction(self, identifiers: Vec<Identifier>) -> Instruction {
        match self {
            Self::Include => Instruction::AddToIncludeList { identifiers },
            Self::Exclude => Instruction::AddToExcludeList { identifiers },
        }
    }

    /// Remove instruction for this list
    #[must_use]
    pub fn remove_instruction(self, identifiers: Vec<Identifier>) -> Instruction {
        match self {
            Self::Include => Instruction::RemoveFromIncludeList { identifiers },
            Self::Exclude => Instruction::RemoveFromExcludeList { identifiers },
        }
    }
}

/// Diff existing targets against selections
///
/// Emits `make_add(added)` when something was selected and
/// `make_remove(removed)` when something was deselected, in that order.
/// Never emits an instruction with an empty id list, so the result holds at
/// most two instructions.
#[must_use]
pub fn build_target_instructions<A, R>(
    existing: &[Target],
    selections: &[Selection],
    make_add: A,
    make_remove: R,
) -> Vec<Instruction>
where
    A: FnOnce(Vec<Identifier>) -> Instruction,
    R: FnOnce(Vec<Identifier>) -> Instruction,
{
    let d = diff_by(
        existing,
        selections,
        |t| t.identifier.clone(),
        |s| s.value.clone(),
    );

    let mut instructions = Vec::with_capacity(2);
    if !d.added.is_empty() {
        instructions.push(make_add(d.added));
    }
    if !d.removed.is_empty() {
        instructions.push(make_remove(d.removed));
    }
    instructions
}

/// [`build_target_instructions`] with the constructors of `kind`
#[must_use]
pub fn build_list_instructions(
    kind: ListKind,
    existing: &[Target],
    selections: &[Selection],
) -> Vec<Instruction> {
    let instructions = build_target_instructions(
        existing,
        selections,
        |ids| kind.add_instruction(ids),
        |ids| kind.remove_instruction(ids),
    );
    tracing::debug!(
        ?kind,
        existing = existing.len(),
        selected = selections.len(),
        emitted = instructions.len(),
        "diffed target list"
    );
    instructions
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn targets(ids: &[&str]) -> Vec<Target> {
        ids.iter().map(|id| Target::new(*id)).collect()
    }

    fn selections(ids: &[&str]) -> Vec<Selection> {
        ids.iter().map(|id| Selection::new(*id, *id)).collect()
    }

    fn ids(raw: &[&str]) -> Vec<Identifier> {
        raw.iter().map(|id| Identifier::new(*id)).collect()
    }

    #[test]
    fn unchanged_selection_emits_nothing() {
        let out = build_list_instructions(
            ListKind::Include,
            &targets(&["t1", "t2"]),
            &selections(&["t2", "t1"]),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn add_precedes_remove() {
        let out = build_list_instructions(
            ListKind::Include,
            &targets(&["t1", "t2"]),
            &selections(&["t2", "t3", "t4"]),
        );
        assert_eq!(
            out,
            vec![
                Instruction::AddToIncludeList {
                    identifiers: ids(&["t3", "t4"])
                },
                Instruction::RemoveFromIncludeList {
                    identifiers: ids(&["t1"])
                },
            ]
        );
    }

    #[test]
    fn exclude_list_uses_exclude_kinds() {
        let out = build_list_instructions(ListKind::Exclude, &targets(&["a"]), &selections(&[]));
        assert_eq!(
            out,
            vec![Instruction::RemoveFromExcludeList {
                identifiers: ids(&["a"])
            }]
        );
    }

    #[test]
    fn custom_constructors_are_used() {
        let out = build_target_instructions(
            &[],
            &selections(&["x"]),
            |ids| Instruction::AddToExcludeList { identifiers: ids },
            |_| unreachable!("nothing removed"),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind(), "addToExcludeList");
    }

    #[test]
    fn same_id_in_both_lists_is_not_checked() {
        let both = selections(&["t1"]);
        let mut out = build_list_instructions(ListKind::Include, &[], &both);
        out.extend(build_list_instructions(ListKind::Exclude, &[], &both));
        assert_eq!(out.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_at_most_two_non_empty_instructions(
            existing in proptest::collection::vec("[a-e]", 0..8),
            selected in proptest::collection::vec("[a-e]", 0..8),
        ) {
            let existing: Vec<Target> = existing.into_iter().map(Target::new).collect();
            let selected: Vec<Selection> =
                selected.into_iter().map(|s| Selection::new(s.clone(), s)).collect();

            let out = build_list_instructions(ListKind::Include, &existing, &selected);
            prop_assert!(out.len() <= 2);
            for ins in &out {
                match ins {
                    Instruction::AddToIncludeList { identifiers }
                    | Instruction::RemoveFromIncludeList { identifiers } => {
                        prop_assert!(!identifiers.is_empty());
                    }
                    other => prop_assert!(false, "unexpected instruction {:?}", other),
                }
            }
        }
    }
}
