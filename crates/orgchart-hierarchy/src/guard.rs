//! Cycle guard
//!
//! Answers "would making `P` the parent of `N` close a loop?" by walking the
//! declared parent chain upward from `P`. The walk tolerates data that is
//! already cyclic: it stops the first time it revisits a node.
//!
//! The guard is advisory. It never mutates anything; callers that reparent a
//! record must consult it before committing.

use crate::index::IdentityIndex;
use orgchart_record::Record;
use std::collections::HashSet;

/// Iterator over the declared ancestors of a record, nearest first
///
/// Yields trimmed parent identities as written in the data. A parent that does
/// not resolve to a record is still yielded once, then the walk ends. The walk
/// also ends when a label repeats, so it visits at most `records.len() + 1`
/// labels.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    records: &'a [Record],
    index: IdentityIndex<'a>,
    seen: HashSet<&'a str>,
    current: Option<usize>,
}

impl<'a> Ancestors<'a> {
    /// Start a walk at `identity`
    #[must_use]
    pub fn new(identity: &'a str, records: &'a [Record]) -> Self {
        let index = IdentityIndex::new(records);
        let start = identity.trim();
        let current = index.get(start);
        let mut seen = HashSet::new();
        seen.insert(start);
        Self {
            records,
            index,
            seen,
            current,
        }
    }
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.current.take()?;
        let records = self.records;
        let parent = records[pos].parent_key()?;
        if !self.seen.insert(parent) {
            return None;
        }
        self.current = self.index.get(parent);
        Some(parent)
    }
}

/// Declared ancestors of `identity`, nearest first
#[inline]
#[must_use]
pub fn ancestors<'a>(identity: &'a str, records: &'a [Record]) -> Ancestors<'a> {
    Ancestors::new(identity, records)
}

/// Whether `target` sits at or below `candidate_ancestor`
///
/// True when the two trimmed identities are equal (a record may never report
/// to itself), or when walking `target`'s parent chain reaches
/// `candidate_ancestor`. Pre-existing cycles that do not contain
/// `candidate_ancestor` yield `false`.
///
/// Before assigning `new_parent` as the parent of `record`, call
/// `is_descendant(record, new_parent, records)`; `true` means the assignment
/// would create a cycle.
#[must_use]
pub fn is_descendant(candidate_ancestor: &str, target: &str, records: &[Record]) -> bool {
    let candidate = candidate_ancestor.trim();
    if candidate == target.trim() {
        return true;
    }
    ancestors(target, records).any(|ancestor| ancestor == candidate)
}
