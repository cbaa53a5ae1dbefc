//! Partial record updates
//!
//! A [`RecordPatch`] carries only the fields an edit touches. Applying it
//! merges those fields into an existing [`Record`]; the record's surrogate id
//! never changes.

use crate::record::{Attribute, Dimension, Record};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::BTreeMap;

/// Field-level update for a record
///
/// Empty strings clear optional fields (`display_name`, `parent_identity`,
/// group values); `None` leaves them untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    /// New identity (rename)
    pub identity: Option<String>,

    /// New display name
    pub display_name: Option<String>,

    /// New parent identity
    pub parent_identity: Option<String>,

    /// Group values to merge
    pub group_keys: BTreeMap<Dimension, String>,

    /// Annotations to merge by name
    pub attributes: Vec<Attribute>,

    /// Extra columns to merge
    pub extra: IndexMap<String, Value>,
}

impl RecordPatch {
    /// Create an empty patch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename the record
    #[must_use]
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Change the display name
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Change the parent; an empty value makes the record a root
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_identity = Some(parent.into());
        self
    }

    /// Change one group value
    #[must_use]
    pub fn with_group(mut self, dimension: Dimension, value: impl Into<String>) -> Self {
        self.group_keys.insert(dimension, value.into());
        self
    }

    /// Change one annotation
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    /// Whether applying the patch would change nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identity.is_none()
            && self.display_name.is_none()
            && self.parent_identity.is_none()
            && self.group_keys.is_empty()
            && self.attributes.is_empty()
            && self.extra.is_empty()
    }

    /// Merge the patch into a record
    pub fn apply(&self, record: &mut Record) {
        if let Some(identity) = &self.identity {
            record.identity.clone_from(identity);
        }
        if let Some(name) = &self.display_name {
            record.display_name = if name.trim().is_empty() {
                None
            } else {
                Some(name.clone())
            };
        }
        if let Some(parent) = &self.parent_identity {
            record.parent_identity = if parent.trim().is_empty() {
                None
            } else {
                Some(parent.clone())
            };
        }
        for (dimension, value) in &self.group_keys {
            record.set_group(*dimension, value.clone());
        }
        for attribute in &self.attributes {
            record.set_attribute(attribute.name.clone(), attribute.value.clone());
        }
        for (column, value) in &self.extra {
            record.extra.insert(column.clone(), value.clone());
        }
    }
}
