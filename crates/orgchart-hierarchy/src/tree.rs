//! Individual-level tree builder
//!
//! Turns the flat `identity -> parent_identity` relation into a forest of
//! owned [`TreeNode`]s in a single pass over the records.

use crate::forest::ClaimSet;
use crate::index::IdentityIndex;
use orgchart_record::Record;

/// A record and the records reporting directly to it
///
/// Children are owned, so a node has at most one parent by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    record: Record,
    children: Vec<TreeNode>,
}

impl TreeNode {
    /// The record at this node
    #[inline]
    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Trimmed identity of the record at this node
    #[inline]
    #[must_use]
    pub fn identity(&self) -> &str {
        self.record.key()
    }

    /// Direct reports, in input order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// Whether the node has no direct reports
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Split into record and children
    #[must_use]
    pub fn into_parts(self) -> (Record, Vec<TreeNode>) {
        (self.record, self.children)
    }

    /// Number of nodes in this subtree, including this one
    #[must_use]
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    /// Number of levels in this subtree (a leaf has depth 1)
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children.iter().map(|c| (c, level + 1)));
        }
        deepest
    }

    /// Pre-order iterator over this subtree
    #[must_use]
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Identities of every node in this subtree that has direct reports,
    /// in pre-order
    #[must_use]
    pub fn branch_identities(&self) -> Vec<&str> {
        self.iter()
            .filter(|node| !node.is_leaf())
            .map(TreeNode::identity)
            .collect()
    }

    /// First node in pre-order whose identity matches
    #[must_use]
    pub fn find(&self, identity: &str) -> Option<&TreeNode> {
        let identity = identity.trim();
        self.iter().find(|node| node.identity() == identity)
    }
}

/// Pre-order traversal of a [`TreeNode`] subtree
#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Total number of nodes in a forest
#[must_use]
pub fn forest_size(forest: &[TreeNode]) -> usize {
    forest.iter().map(TreeNode::size).sum()
}

/// Build the individual-level forest
///
/// 1. Records are indexed by trimmed identity; a later duplicate shadows an
///    earlier one as a parent target.
/// 2. In input order, each record with a resolvable parent other than itself
///    is claimed as that parent's child, unless the claim would close a loop
///    with claims already made.
/// 3. Unclaimed records become roots, in input order.
///
/// Every record with a non-empty identity appears exactly once. Records with
/// an empty identity are left out.
#[must_use]
pub fn build_tree(records: &[Record]) -> Vec<TreeNode> {
    if records.is_empty() {
        return Vec::new();
    }

    let index = IdentityIndex::new(records);
    let mut claims = ClaimSet::new(records.len());

    for pos in 0..records.len() {
        let Some(parent) = index.resolve_parent(records, pos) else {
            continue;
        };
        if let Err(refusal) = claims.claim(pos, parent) {
            tracing::debug!(
                identity = records[pos].key(),
                parent = records[parent].key(),
                ?refusal,
                "reporting line left detached"
            );
        }
    }

    let roots = claims.roots().filter(|&pos| records[pos].has_identity());
    claims.assemble(roots, |pos, children| TreeNode {
        record: records[pos].clone(),
        children,
    })
}
