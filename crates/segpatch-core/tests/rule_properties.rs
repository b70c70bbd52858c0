use proptest::prelude::*;
use segpatch_core::{build_rule_instructions, Instruction, Rule};

fn persisted_rules() -> impl Strategy<Value = Vec<Rule>> {
    proptest::collection::vec(("[a-c]", proptest::collection::vec("[x-z]", 1..3)), 0..6).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (attr, values))| Rule::new(format!("c{i}"), attr, "in", values))
                .collect()
        },
    )
}

/// Per persisted rule: drop it, keep it, or edit its values
#[derive(Debug, Clone, Copy)]
enum Edit {
    Drop,
    Keep,
    Change,
}

fn edits() -> impl Strategy<Value = Edit> {
    prop_oneof![Just(Edit::Drop), Just(Edit::Keep), Just(Edit::Change)]
}

fn rank(ins: &Instruction) -> u8 {
    match ins {
        Instruction::RemoveClause { .. } => 0,
        Instruction::AddClause { .. } => 1,
        Instruction::UpdateClause { .. } => 2,
        other => panic!("unexpected instruction {other:?}"),
    }
}

proptest! {
    #[test]
    fn prop_rule_instructions_match_edits(
        existing in persisted_rules(),
        plan in proptest::collection::vec(edits(), 6),
        new_rules in 0usize..3,
    ) {
        let mut desired = Vec::new();
        let (mut dropped, mut changed) = (0, 0);
        for (rule, edit) in existing.iter().zip(plan.iter()) {
            match edit {
                Edit::Drop => dropped += 1,
                Edit::Keep => desired.push(rule.clone()),
                Edit::Change => {
                    let mut edited = rule.clone();
                    edited.values.push("changed".to_string());
                    desired.push(edited);
                    changed += 1;
                }
            }
        }
        for i in 0..new_rules {
            desired.push(Rule::new_unsaved(format!("new{i}"), "equal", ["v"]));
        }

        let out = build_rule_instructions(&existing, &desired);

        let count = |r: u8| out.iter().filter(|i| rank(i) == r).count();
        prop_assert_eq!(count(0), dropped);
        prop_assert_eq!(count(1), new_rules);
        prop_assert_eq!(count(2), changed);

        let ranks: Vec<u8> = out.iter().map(rank).collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        prop_assert_eq!(ranks, sorted);
    }

    #[test]
    fn prop_identical_rules_emit_nothing(existing in persisted_rules()) {
        prop_assert!(build_rule_instructions(&existing, &existing).is_empty());
    }
}

#[test]
fn removal_example() {
    let existing = vec![
        Rule::new("123", "a", "op", ["v"]),
        Rule::new("xyz", "a", "op", ["v"]),
        Rule::new("abc", "a", "op", ["v"]),
    ];
    let desired = vec![Rule::new("xyz", "a", "op", ["v"])];

    let out = build_rule_instructions(&existing, &desired);
    assert_eq!(
        serde_json::to_value(&out).unwrap(),
        serde_json::json!([
            { "kind": "removeClause", "parameters": { "clauseID": "123" } },
            { "kind": "removeClause", "parameters": { "clauseID": "abc" } }
        ])
    );
}
