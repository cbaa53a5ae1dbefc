//! Ingestion boundary
//!
//! A [`PartitionSource`] lists named partitions (one per spreadsheet tab, for
//! example) and fetches each one as rows. [`load_partitions`] fetches every
//! partition concurrently and stages the complete [`Snapshot`] before anything
//! touches a store, so dropping the future part-way leaves the store as it
//! was.

use crate::error::IngestError;
use crate::scenario::Snapshot;
use crate::store::ScenarioStore;
use futures::future::join_all;
use indexmap::IndexMap;
use orgchart_record::{records_from_rows, Record, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Handle to one partition of a source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionRef {
    /// Source-specific key used to fetch the partition
    pub key: String,
    /// Display name; becomes the scenario name
    pub name: String,
}

impl PartitionRef {
    /// Create a partition reference
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }

    /// Partition assumed when a source reports none
    #[must_use]
    pub fn fallback() -> Self {
        Self::new("0", "Scenario 1")
    }
}

/// Source of named row partitions
#[async_trait::async_trait]
pub trait PartitionSource: Send + Sync {
    /// List the partitions, in the order they should become scenarios
    async fn discover(&self) -> Result<Vec<PartitionRef>, IngestError>;

    /// Fetch one partition's rows
    async fn fetch(&self, partition: &PartitionRef) -> Result<Vec<Row>, IngestError>;
}

/// Fetch every partition of `source` into a snapshot
///
/// Partitions are fetched concurrently. A partition that fails to fetch or
/// holds malformed rows becomes an empty scenario; it never aborts its
/// siblings. A source that reports no partitions is read as the single
/// [`PartitionRef::fallback`] partition. When two partitions share a name the
/// later one's records win and the first one's position is kept.
///
/// # Errors
/// Only a failed discovery is returned.
pub async fn load_partitions<S>(source: &S) -> Result<Snapshot, IngestError>
where
    S: PartitionSource + ?Sized,
{
    let mut partitions = source.discover().await?;
    if partitions.is_empty() {
        debug!("source reported no partitions, using fallback");
        partitions.push(PartitionRef::fallback());
    }
    info!(partitions = partitions.len(), "partitions discovered");

    let fetched = join_all(partitions.iter().map(|partition| async move {
        let records = source
            .fetch(partition)
            .await
            .and_then(|rows| Ok(records_from_rows(&rows)?));
        (partition, records)
    }))
    .await;

    let mut snapshot = Snapshot::with_capacity(fetched.len());
    for (partition, result) in fetched {
        let records = result.unwrap_or_else(|err| {
            warn!(partition = %partition.name, error = %err, "partition unreadable, loaded empty");
            Vec::new()
        });
        debug!(partition = %partition.name, records = records.len(), "partition staged");
        snapshot.insert(partition.name.clone(), records);
    }

    Ok(snapshot)
}

/// Parse a JSON document mapping scenario names to arrays of rows
///
/// A scenario whose value is not an array of row objects, or whose rows fail
/// conversion, becomes empty.
///
/// # Errors
/// [`IngestError::Document`] if the text is not a JSON object.
pub fn parse_snapshot_json(text: &str) -> Result<Snapshot, IngestError> {
    let document: IndexMap<String, Value> = serde_json::from_str(text)?;

    Ok(document
        .into_iter()
        .map(|(name, value)| {
            let records = partition_records(value).unwrap_or_else(|err| {
                warn!(partition = %name, error = %err, "partition unreadable, loaded empty");
                Vec::new()
            });
            (name, records)
        })
        .collect())
}

fn partition_records(value: Value) -> Result<Vec<Record>, IngestError> {
    let rows: Vec<Row> = serde_json::from_value(value)?;
    Ok(records_from_rows(&rows)?)
}

impl ScenarioStore {
    /// Replace every scenario with the partitions of `source`
    ///
    /// The store is only touched once all partitions are in hand.
    ///
    /// # Errors
    /// Returns the discovery error; the store is unchanged.
    pub async fn load_from<S>(&mut self, source: &S) -> Result<(), IngestError>
    where
        S: PartitionSource + ?Sized,
    {
        let snapshot = load_partitions(source).await?;
        self.load_snapshot(snapshot);
        Ok(())
    }
}
