//! Testing utilities for the orgchart workspace
//!
//! Record builders, forest shape rendering, an in-memory partition source and
//! tracing setup.

#![allow(missing_docs)]

use indexmap::IndexMap;
use orgchart_hierarchy::{GroupNode, TreeNode};
use orgchart_record::{Dimension, Record, Row};
use orgchart_scenario::{IngestError, PartitionRef, PartitionSource, ScenarioStore, Snapshot};
use serde_json::Value;

/// Install a test-writer subscriber filtered by `RUST_LOG`; repeat calls are
/// harmless
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn record(identity: &str, parent: &str) -> Record {
    Record::new(identity).with_parent(parent)
}

pub fn record_in(identity: &str, parent: &str, department: &str, team: &str) -> Record {
    record(identity, parent)
        .with_group(Dimension::Department, department)
        .with_group(Dimension::Team, team)
}

/// `n0 <- n1 <- ... <- n{len-1}`
pub fn chain(len: usize) -> Vec<Record> {
    (0..len)
        .map(|i| {
            let parent = if i == 0 { String::new() } else { format!("n{}", i - 1) };
            record(&format!("n{i}"), &parent)
        })
        .collect()
}

/// Small org with two departments and a dangling reference
pub fn sample_org() -> Vec<Record> {
    vec![
        record_in("CEO", "", "Exec", "Leadership"),
        record_in("CTO", "CEO", "Engineering", "Leadership"),
        record_in("Platform Lead", "CTO", "Engineering", "Platform"),
        record_in("SRE", "Platform Lead", "Engineering", "Platform"),
        record_in("CFO", "CEO", "Finance", "Leadership"),
        record_in("Advisor", "Board", "", ""),
    ]
}

pub fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(column, value)| ((*column).to_string(), Value::String((*value).to_string())))
        .collect()
}

pub fn snapshot(entries: Vec<(&str, Vec<Record>)>) -> Snapshot {
    entries
        .into_iter()
        .map(|(name, records)| (name.to_string(), records))
        .collect()
}

pub fn store_with(entries: Vec<(&str, Vec<Record>)>) -> ScenarioStore {
    let mut store = ScenarioStore::new();
    store.load_snapshot(snapshot(entries));
    store
}

/// `Root(Child(Grandchild),Other)` rendering of a tree
pub fn shape(node: &TreeNode) -> String {
    render(node.identity(), node.children(), shape)
}

pub fn shapes(forest: &[TreeNode]) -> Vec<String> {
    forest.iter().map(shape).collect()
}

pub fn group_shape(node: &GroupNode) -> String {
    render(node.label(), node.children(), group_shape)
}

pub fn group_shapes(forest: &[GroupNode]) -> Vec<String> {
    forest.iter().map(group_shape).collect()
}

fn render<N>(label: &str, children: &[N], each: fn(&N) -> String) -> String {
    if children.is_empty() {
        return label.to_string();
    }
    let kids: Vec<String> = children.iter().map(each).collect();
    format!("{label}({})", kids.join(","))
}

/// Every identity in a forest, pre-order
pub fn identities(forest: &[TreeNode]) -> Vec<String> {
    forest
        .iter()
        .flat_map(TreeNode::iter)
        .map(|node| node.identity().to_string())
        .collect()
}

/// In-memory [`PartitionSource`]
///
/// Partitions are served in insertion order. A partition added with
/// [`MemorySource::with_failure`] fails to fetch.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    partitions: IndexMap<String, Result<Vec<Row>, String>>,
    discovery_error: Option<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_partition(mut self, name: &str, rows: Vec<Row>) -> Self {
        self.partitions.insert(name.to_string(), Ok(rows));
        self
    }

    pub fn with_failure(mut self, name: &str, reason: &str) -> Self {
        self.partitions.insert(name.to_string(), Err(reason.to_string()));
        self
    }

    pub fn failing_discovery(reason: &str) -> Self {
        Self {
            discovery_error: Some(reason.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl PartitionSource for MemorySource {
    async fn discover(&self) -> Result<Vec<PartitionRef>, IngestError> {
        if let Some(reason) = &self.discovery_error {
            return Err(IngestError::Discovery(reason.clone()));
        }
        Ok(self
            .partitions
            .keys()
            .enumerate()
            .map(|(i, name)| PartitionRef::new(i.to_string(), name.clone()))
            .collect())
    }

    async fn fetch(&self, partition: &PartitionRef) -> Result<Vec<Row>, IngestError> {
        match self.partitions.get(&partition.name) {
            Some(Ok(rows)) => Ok(rows.clone()),
            Some(Err(reason)) => Err(IngestError::Fetch {
                name: partition.name.clone(),
                reason: reason.clone(),
            }),
            None => Ok(Vec::new()),
        }
    }
}
