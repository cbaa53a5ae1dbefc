//! Named record snapshots

use indexmap::IndexMap;
use orgchart_record::Record;
use serde::{Deserialize, Serialize};

/// Ordered mapping from scenario name to its records
///
/// Insertion order is significant: the first entry becomes the active
/// scenario when a snapshot is loaded.
pub type Snapshot = IndexMap<String, Vec<Record>>;

/// One independent, named copy of the full record set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    name: String,
    records: Vec<Record>,
}

impl Scenario {
    /// Create a scenario
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    /// Scenario name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored records, in insertion order
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of stored records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the scenario holds no records
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Take the records out
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut Vec<Record> {
        &mut self.records
    }
}
