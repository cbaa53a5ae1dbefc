//! Orgchart Scenario
//!
//! Keeps several named, independent copies ("scenarios") of an org data set
//! side by side and tracks which one is being edited.
//!
//! # Overview
//!
//! - [`ScenarioStore`]: load, switch, create, remove and reset scenarios;
//!   add, update, delete and reparent records in the active one
//! - [`PartitionSource`] / [`load_partitions`]: async ingestion of named row
//!   partitions into a [`Snapshot`]
//! - [`ScenarioStore::export`] / [`sanitize_partition_name`]: rows back out,
//!   per scenario
//!
//! Every mutation is immediately visible in the stored scenario; there is no
//! save step.
//!
//! # Example
//!
//! ```rust
//! use orgchart_record::Record;
//! use orgchart_scenario::{ScenarioStore, Snapshot};
//!
//! let mut snapshot = Snapshot::new();
//! snapshot.insert(
//!     "Today".to_string(),
//!     vec![Record::new("CEO"), Record::new("CTO").with_parent("CEO")],
//! );
//!
//! let mut store = ScenarioStore::new();
//! store.load_snapshot(snapshot);
//! assert!(store.create_scenario("Tomorrow"));
//!
//! store.delete_record("CTO").unwrap();
//! assert_eq!(store.len(), 1);
//!
//! store.switch_scenario("Today").unwrap();
//! assert_eq!(store.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod scenario;
pub mod store;

// Re-exports
pub use config::StoreConfig;
pub use error::{IngestError, StoreError};
pub use export::sanitize_partition_name;
pub use ingest::{load_partitions, parse_snapshot_json, PartitionRef, PartitionSource};
pub use scenario::{Scenario, Snapshot};
pub use store::{DeleteOutcome, ScenarioStore};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for scenario operations
    pub use crate::{PartitionSource, ScenarioStore, Snapshot, StoreConfig, StoreError};
    pub use orgchart_hierarchy::prelude::*;
    pub use orgchart_record::RecordPatch;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
