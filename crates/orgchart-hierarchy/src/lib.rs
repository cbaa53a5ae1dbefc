//! Orgchart Hierarchy
//!
//! Reconstructs rooted hierarchies from flat `identity -> parent_identity`
//! records.
//!
//! # Overview
//!
//! - [`build_tree`]: individual-level forest of [`TreeNode`]s
//! - [`build_group_tree`]: roll-up forest of [`GroupNode`]s for one
//!   [`Dimension`](orgchart_record::Dimension)
//! - [`is_descendant`]: advisory cycle check run before any reparenting
//!
//! Both builders are pure functions of a record slice and always return a
//! valid forest, even for cyclic input: a record (or group) is claimed as a
//! child at most once, and a claim that would close a loop is skipped.
//!
//! # Example
//!
//! ```rust
//! use orgchart_hierarchy::{build_tree, is_descendant};
//! use orgchart_record::Record;
//!
//! let records = vec![
//!     Record::new("CEO"),
//!     Record::new("VP").with_parent("CEO"),
//!     Record::new("Eng").with_parent("VP"),
//! ];
//!
//! let forest = build_tree(&records);
//! assert_eq!(forest.len(), 1);
//! assert_eq!(forest[0].identity(), "CEO");
//!
//! // CEO may not report to Eng: Eng already sits below CEO
//! assert!(is_descendant("CEO", "Eng", &records));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod forest;
mod index;

pub mod group;
pub mod guard;
pub mod tree;

// Re-exports
pub use group::{
    build_group_tree, build_group_tree_labeled, distinct_group_values, GroupNode, UNASSIGNED,
};
pub use guard::{ancestors, is_descendant, Ancestors};
pub use tree::{build_tree, forest_size, PreOrder, TreeNode};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for hierarchy operations
    pub use crate::{
        build_group_tree, build_tree, is_descendant, GroupNode, TreeNode, UNASSIGNED,
    };
    pub use orgchart_record::{Dimension, Record};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
