use orgchart_hierarchy::{
    ancestors, build_group_tree, build_tree, forest_size, is_descendant, GroupNode, TreeNode,
};
use orgchart_record::{Dimension, Record, RecordId};
use orgchart_test_utils::{chain, group_shapes, identities, record, record_in, sample_org, shapes};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

const LABELS: usize = 6;

fn label(i: usize) -> String {
    match i {
        i if i < LABELS => format!("r{i}"),
        i if i == LABELS => String::new(),
        _ => "ghost".to_string(),
    }
}

fn department(i: usize) -> &'static str {
    ["Eng", "Sales", "Ops", ""][i % 4]
}

prop_compose! {
    fn arb_record()(identity in 0..=LABELS, parent in 0..=LABELS + 1, dept in 0..4usize) -> Record {
        record_in(&label(identity), &label(parent), department(dept), "")
    }
}

fn arb_records() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(arb_record(), 0..24)
}

fn ids(forest: &[TreeNode]) -> Vec<RecordId> {
    forest
        .iter()
        .flat_map(TreeNode::iter)
        .map(|node| node.record().id)
        .collect()
}

/// Last record for each trimmed identity
fn latest(records: &[Record]) -> HashMap<&str, &Record> {
    records
        .iter()
        .filter(|r| r.has_identity())
        .map(|r| (r.key(), r))
        .collect()
}

fn naive_is_descendant(candidate: &str, target: &str, records: &[Record]) -> bool {
    let candidate = candidate.trim();
    if candidate == target.trim() {
        return true;
    }
    let by_identity = latest(records);
    let mut current = target.trim().to_string();
    for _ in 0..=records.len() + 1 {
        let Some(parent) = by_identity.get(current.as_str()).and_then(|r| r.parent_key()) else {
            return false;
        };
        if parent == candidate {
            return true;
        }
        current = parent.to_string();
    }
    false
}

fn group_labels(forest: &[GroupNode]) -> Vec<String> {
    let mut labels = Vec::new();
    let mut stack: Vec<&GroupNode> = forest.iter().collect();
    while let Some(node) = stack.pop() {
        labels.push(node.label().to_string());
        stack.extend(node.children());
    }
    labels
}

proptest! {
    #[test]
    fn prop_every_record_appears_exactly_once(records in arb_records()) {
        let forest = build_tree(&records);
        let mut seen = ids(&forest);
        let mut expected: Vec<RecordId> = records
            .iter()
            .filter(|r| r.has_identity())
            .map(|r| r.id)
            .collect();

        seen.sort_by_key(|id| id.0);
        expected.sort_by_key(|id| id.0);
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn prop_records_without_resolvable_parent_are_roots(records in arb_records()) {
        let forest = build_tree(&records);
        let roots: HashSet<RecordId> = forest.iter().map(|n| n.record().id).collect();
        let known: HashSet<&str> = latest(&records).into_keys().collect();

        for r in records.iter().filter(|r| r.has_identity()) {
            let detached = match r.parent_key() {
                None => true,
                Some(parent) => parent == r.key() || !known.contains(parent),
            };
            if detached {
                prop_assert!(roots.contains(&r.id), "{} should be a root", r.key());
            }
        }
    }

    #[test]
    fn prop_guard_matches_bounded_walk(
        records in arb_records(),
        a in 0..=LABELS + 1,
        b in 0..=LABELS + 1,
    ) {
        let (a, b) = (label(a), label(b));
        prop_assert_eq!(
            is_descendant(&a, &b, &records),
            naive_is_descendant(&a, &b, &records)
        );
    }

    #[test]
    fn prop_guard_is_reflexive(records in arb_records(), x in "[a-z ]{0,6}") {
        prop_assert!(is_descendant(&x, &x, &records));
    }

    #[test]
    fn prop_ancestor_walk_is_bounded(records in arb_records(), start in 0..=LABELS) {
        prop_assert!(ancestors(&label(start), &records).count() <= records.len() + 1);
    }

    #[test]
    fn prop_group_forest_partitions_records(records in arb_records()) {
        let forest = build_group_tree(&records, Dimension::Department);
        let labels = group_labels(&forest);
        let distinct: HashSet<&String> = labels.iter().collect();

        prop_assert_eq!(distinct.len(), labels.len());
        prop_assert_eq!(forest.iter().map(GroupNode::headcount).sum::<usize>(), records.len());
    }
}

#[test]
fn empty_inputs_give_empty_forests() {
    assert!(build_tree(&[]).is_empty());
    assert!(build_group_tree(&[], Dimension::Department).is_empty());
    assert!(build_group_tree(&[], Dimension::Team).is_empty());
}

#[test]
fn reporting_chain_example() {
    let records = vec![record("CEO", ""), record("VP", "CEO"), record("Eng", "VP")];
    assert_eq!(shapes(&build_tree(&records)), vec!["CEO(VP(Eng))"]);
}

#[test]
fn mutual_reports_keep_one_root() {
    let records = vec![record("A", "B"), record("B", "A")];
    let forest = build_tree(&records);

    assert_eq!(forest.len(), 1);
    assert_eq!(forest_size(&forest), 2);
    assert_eq!(forest[0].children().len(), 1);
    assert!(forest[0].children()[0].is_leaf());
}

#[test]
fn department_roll_up_example() {
    let records = vec![record_in("A", "", "Eng", ""), record_in("B", "A", "Sales", "")];
    assert_eq!(
        group_shapes(&build_group_tree(&records, Dimension::Department)),
        vec!["Eng(Sales)"]
    );
}

#[test]
fn sample_org_views() {
    let records = sample_org();
    let forest = build_tree(&records);

    assert_eq!(
        shapes(&forest),
        vec!["CEO(CTO(Platform Lead(SRE)),CFO)", "Advisor"]
    );
    assert_eq!(forest[0].branch_identities(), vec!["CEO", "CTO", "Platform Lead"]);
    assert_eq!(forest[0].depth(), 4);

    assert_eq!(
        group_shapes(&build_group_tree(&records, Dimension::Department)),
        vec!["Exec(Engineering,Finance)", "Unassigned"]
    );
    assert_eq!(
        group_shapes(&build_group_tree(&records, Dimension::Team)),
        vec!["Leadership(Platform)", "Unassigned"]
    );
}

#[test]
fn long_chain_builds_without_recursion() {
    let records = chain(2_000);
    let forest = build_tree(&records);

    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].depth(), 2_000);
    assert_eq!(identities(&forest).len(), 2_000);
    assert!(is_descendant("n0", "n1999", &records));
    assert!(!is_descendant("n1999", "n0", &records));
}
