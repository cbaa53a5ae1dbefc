//! Orgchart Record Model
//!
//! Typed person records for reporting-line hierarchies.
//!
//! # Core Concepts
//!
//! - [`Record`]: one person, keyed by a human label (`identity`) that other
//!   records reference through `parent_identity`
//! - [`RecordId`]: stable surrogate id minted at ingestion
//! - [`Dimension`]: categorical field records can be rolled up by
//! - [`RecordPatch`]: partial update applied by the scenario store
//! - [`Row`]: the tabular boundary, see [`row`]
//!
//! # Example
//!
//! ```rust
//! use orgchart_record::{Dimension, Record};
//!
//! let cto = Record::new("CTO")
//!     .with_parent("CEO")
//!     .with_group(Dimension::Department, "Engineering");
//!
//! assert_eq!(cto.parent_key(), Some("CEO"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod patch;
mod record;
pub mod row;

// Re-exports
pub use patch::RecordPatch;
pub use record::{Attribute, Dimension, Record, RecordId, UnknownDimension};
pub use row::{records_from_rows, rows_from_json, rows_from_records, Row, RowError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
