//! Identity lookup shared by the cycle guard and both builders

use orgchart_record::Record;
use std::collections::HashMap;

/// Trimmed identity to position in a record slice
///
/// Records with an empty identity are not indexed. When several records share
/// an identity the later one wins; earlier ones can no longer be targeted as a
/// parent.
#[derive(Debug, Clone)]
pub(crate) struct IdentityIndex<'a> {
    positions: HashMap<&'a str, usize>,
}

impl<'a> IdentityIndex<'a> {
    pub(crate) fn new(records: &'a [Record]) -> Self {
        let mut positions = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if record.has_identity() {
                positions.insert(record.key(), pos);
            }
        }
        Self { positions }
    }

    /// Position of the record currently owning `identity`
    pub(crate) fn get(&self, identity: &str) -> Option<usize> {
        self.positions.get(identity.trim()).copied()
    }

    /// Position of the declared parent of `records[pos]`
    ///
    /// `None` when the record has no identity, declares no parent, declares
    /// itself, or names a parent that does not exist.
    pub(crate) fn resolve_parent(&self, records: &[Record], pos: usize) -> Option<usize> {
        let record = records.get(pos)?;
        if !record.has_identity() || record.is_self_parented() {
            return None;
        }
        record.parent_key().and_then(|parent| self.get(parent))
    }
}
