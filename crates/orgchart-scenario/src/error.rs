//! Error types for the scenario store
//!
//! Every condition here is local and recoverable. The store is left exactly
//! as it was whenever an operation returns an error.

use orgchart_record::RowError;

/// Scenario store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No scenario with this name
    #[error("unknown scenario: {name}")]
    UnknownScenario {
        /// Requested name
        name: String,
    },

    /// No record with this identity in the working set
    #[error("unknown record: {identity}")]
    UnknownRecord {
        /// Requested identity
        identity: String,
    },

    /// Operation needs a non-empty identity
    #[error("record identity cannot be empty")]
    EmptyIdentity,

    /// Reparenting would make a record report to itself or to one of its
    /// own reports
    #[error("{identity} cannot report to {parent}: {parent} already reports to {identity}")]
    CycleRejected {
        /// Record being moved
        identity: String,
        /// Requested parent
        parent: String,
    },
}

impl StoreError {
    /// Whether the caller can continue with the store unchanged
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        true
    }

    /// Whether the error is an active refusal of a valid-looking request
    #[inline]
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::CycleRejected { .. })
    }
}

/// Ingestion boundary errors
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The source could not list its partitions
    #[error("partition discovery failed: {0}")]
    Discovery(String),

    /// One partition could not be fetched
    #[error("partition {name} could not be fetched: {reason}")]
    Fetch {
        /// Partition name
        name: String,
        /// Source-specific reason
        reason: String,
    },

    /// Rows could not be converted to records
    #[error("malformed rows: {0}")]
    Rows(#[from] RowError),

    /// Snapshot document is not valid JSON of the expected shape
    #[error("malformed snapshot document: {0}")]
    Document(#[from] serde_json::Error),
}
