//! Group roll-up builder
//!
//! Collapses records sharing one categorical value (a department, a team)
//! into a single [`GroupNode`]. Groups have no declared parent; the parent of
//! a group is inferred from its members' reporting lines that cross into
//! another group.

use crate::forest::ClaimSet;
use crate::index::IdentityIndex;
use indexmap::IndexMap;
use orgchart_record::{Dimension, Record};
use std::collections::BTreeSet;

/// Label used for records with no value for the grouping dimension
pub const UNASSIGNED: &str = "Unassigned";

/// All records sharing one categorical value
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    label: String,
    members: Vec<Record>,
    children: Vec<GroupNode>,
}

impl GroupNode {
    /// Categorical value, or the unassigned label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Member records in input order
    #[inline]
    #[must_use]
    pub fn members(&self) -> &[Record] {
        &self.members
    }

    /// Member records ordered by identity
    #[must_use]
    pub fn sorted_members(&self) -> Vec<&Record> {
        let mut sorted: Vec<&Record> = self.members.iter().collect();
        sorted.sort_by(|a, b| a.key().cmp(b.key()));
        sorted
    }

    /// Child groups
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[GroupNode] {
        &self.children
    }

    /// Number of groups in this subtree, including this one
    #[must_use]
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(GroupNode::size).sum::<usize>()
    }

    /// Number of member records in this subtree
    #[must_use]
    pub fn headcount(&self) -> usize {
        self.members.len() + self.children.iter().map(GroupNode::headcount).sum::<usize>()
    }
}

/// Build the group forest with the default unassigned label
#[must_use]
pub fn build_group_tree(records: &[Record], dimension: Dimension) -> Vec<GroupNode> {
    build_group_tree_labeled(records, dimension, UNASSIGNED)
}

/// Build the group forest
///
/// 1. Records are partitioned by their trimmed value for `dimension`, in
///    order of first appearance; empty values go to `unassigned_label`.
/// 2. Every record whose resolved parent lies in another group sets its
///    group's parent to that group. Later records overwrite earlier ones.
/// 3. Groups are claimed under their parent group in group order, refusing
///    self-loops and claims that would close a loop.
/// 4. Unclaimed groups become roots.
#[must_use]
pub fn build_group_tree_labeled(
    records: &[Record],
    dimension: Dimension,
    unassigned_label: &str,
) -> Vec<GroupNode> {
    if records.is_empty() {
        return Vec::new();
    }

    let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();
    let mut group_of = Vec::with_capacity(records.len());
    for (pos, record) in records.iter().enumerate() {
        let label = record.group(dimension).unwrap_or(unassigned_label);
        let entry = groups.entry(label);
        group_of.push(entry.index());
        entry.or_default().push(pos);
    }

    let index = IdentityIndex::new(records);
    let mut parent_group: Vec<Option<usize>> = vec![None; groups.len()];
    for pos in 0..records.len() {
        let Some(parent) = index.resolve_parent(records, pos) else {
            continue;
        };
        let (own, theirs) = (group_of[pos], group_of[parent]);
        if own != theirs {
            parent_group[own] = Some(theirs);
        }
    }

    let mut claims = ClaimSet::new(groups.len());
    for (group, parent) in parent_group.iter().enumerate() {
        let Some(parent) = *parent else {
            continue;
        };
        if let Err(refusal) = claims.claim(group, parent) {
            tracing::debug!(
                group = groups.get_index(group).map(|(l, _)| *l),
                parent = groups.get_index(parent).map(|(l, _)| *l),
                ?refusal,
                "group edge left detached"
            );
        }
    }

    claims.assemble(claims.roots(), |group, children| {
        let (label, positions) = groups
            .get_index(group)
            .map(|(label, positions)| (*label, positions.as_slice()))
            .unwrap_or_default();
        GroupNode {
            label: label.to_string(),
            members: positions.iter().map(|&pos| records[pos].clone()).collect(),
            children,
        }
    })
}

/// Distinct non-empty values for a dimension, sorted
#[must_use]
pub fn distinct_group_values(records: &[Record], dimension: Dimension) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| record.group(dimension))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
