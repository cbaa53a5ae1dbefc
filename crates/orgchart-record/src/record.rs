//! Record - one person in a reporting-line data set
//!
//! A [`Record`] carries the label used as its relational key (`identity`),
//! the label of the record it reports to (`parent_identity`), categorical
//! group values, and free-text annotations that the hierarchy logic never
//! inspects.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Internal surrogate key for a record
///
/// Minted once when a record is created or ingested. Relationship matching
/// never uses it; it only lets callers follow one record across edits that
/// rename its `identity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Mint a fresh random id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Categorical dimension a record can be rolled up by
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// The `Department` column
    Department,
    /// The `Team` column
    Team,
}

impl Dimension {
    /// Every known dimension, in column order
    pub const ALL: [Dimension; 2] = [Dimension::Department, Dimension::Team];

    /// Column name used at the row boundary
    #[inline]
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Department => "Department",
            Self::Team => "Team",
        }
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Error returned when a dimension name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dimension: {0}")]
pub struct UnknownDimension(pub String);

impl FromStr for Dimension {
    type Err = UnknownDimension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "department" | "dept" => Ok(Self::Department),
            "team" => Ok(Self::Team),
            other => Err(UnknownDimension(other.to_string())),
        }
    }
}

/// Named free-text annotation (e.g. accountabilities, metrics)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Column name
    pub name: String,
    /// Free text, carried through unchanged
    pub value: String,
}

impl Attribute {
    /// Create a new attribute
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One person in the data set
///
/// `identity` and `parent_identity` are stored verbatim. All comparisons go
/// through [`Record::key`] and [`Record::parent_key`], which trim surrounding
/// whitespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Surrogate id
    pub id: RecordId,

    /// Relational key (the job title in the tabular schema)
    pub identity: String,

    /// Person's name
    pub display_name: Option<String>,

    /// Categorical values, absent = unassigned
    pub group_keys: BTreeMap<Dimension, String>,

    /// Identity of the record this one reports to, absent = root
    pub parent_identity: Option<String>,

    /// Ordered free-text annotations
    pub attributes: Vec<Attribute>,

    /// Unrecognised columns, preserved for export
    pub extra: IndexMap<String, Value>,
}

impl Record {
    /// Create a record with the given identity and nothing else
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            identity: identity.into(),
            display_name: None,
            group_keys: BTreeMap::new(),
            parent_identity: None,
            attributes: Vec::new(),
            extra: IndexMap::new(),
        }
    }

    /// With parent identity (empty clears it)
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        let parent = parent.into();
        self.parent_identity = if parent.trim().is_empty() {
            None
        } else {
            Some(parent)
        };
        self
    }

    /// With display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// With a group value for one dimension (empty clears it)
    #[must_use]
    pub fn with_group(mut self, dimension: Dimension, value: impl Into<String>) -> Self {
        self.set_group(dimension, value);
        self
    }

    /// With an annotation, replacing any existing one of the same name
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Trimmed identity used for matching
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        self.identity.trim()
    }

    /// Whether the record can take part in the hierarchy at all
    #[inline]
    #[must_use]
    pub fn has_identity(&self) -> bool {
        !self.key().is_empty()
    }

    /// Trimmed, non-empty parent identity
    #[inline]
    #[must_use]
    pub fn parent_key(&self) -> Option<&str> {
        self.parent_identity
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Whether the record declares itself as its own parent
    #[inline]
    #[must_use]
    pub fn is_self_parented(&self) -> bool {
        self.parent_key() == Some(self.key())
    }

    /// Trimmed, non-empty group value for a dimension
    #[must_use]
    pub fn group(&self, dimension: Dimension) -> Option<&str> {
        self.group_keys
            .get(&dimension)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Set or clear a group value
    pub fn set_group(&mut self, dimension: Dimension, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.group_keys.remove(&dimension);
        } else {
            self.group_keys.insert(dimension, value);
        }
    }

    /// Annotation value by column name
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an annotation in place, keeping its position when it exists
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_trimmed() {
        let record = Record::new("  VP Eng ").with_parent(" CEO\t");
        assert_eq!(record.key(), "VP Eng");
        assert_eq!(record.parent_key(), Some("CEO"));
        assert_eq!(record.identity, "  VP Eng ");
    }

    #[test]
    fn blank_parent_is_root() {
        let record = Record::new("CEO").with_parent("   ");
        assert_eq!(record.parent_identity, None);
        assert_eq!(record.parent_key(), None);

        let mut raw = Record::new("CEO");
        raw.parent_identity = Some("  ".into());
        assert_eq!(raw.parent_key(), None);
    }

    #[test]
    fn empty_identity_is_detected() {
        assert!(!Record::new("").has_identity());
        assert!(!Record::new("   ").has_identity());
        assert!(Record::new("x").has_identity());
    }

    #[test]
    fn self_parent_detected_after_trim() {
        let record = Record::new("CTO").with_parent(" CTO ");
        assert!(record.is_self_parented());
    }

    #[test]
    fn whitespace_group_is_unassigned() {
        let mut record = Record::new("a").with_group(Dimension::Team, "Core");
        assert_eq!(record.group(Dimension::Team), Some("Core"));
        assert_eq!(record.group(Dimension::Department), None);

        record.group_keys.insert(Dimension::Department, "  ".into());
        assert_eq!(record.group(Dimension::Department), None);

        record.set_group(Dimension::Team, "");
        assert!(!record.group_keys.contains_key(&Dimension::Team));
    }

    #[test]
    fn attribute_replaced_in_place() {
        let mut record = Record::new("a")
            .with_attribute("Accountabilities", "hiring")
            .with_attribute("Metrics", "NPS");
        record.set_attribute("Accountabilities", "budget");

        assert_eq!(record.attributes[0], Attribute::new("Accountabilities", "budget"));
        assert_eq!(record.attribute("Metrics"), Some("NPS"));
        assert_eq!(record.attribute("Other"), None);
    }

    #[test]
    fn dimension_parses_loosely() {
        assert_eq!("Department".parse::<Dimension>(), Ok(Dimension::Department));
        assert_eq!(" team ".parse::<Dimension>(), Ok(Dimension::Team));
        assert!("floor".parse::<Dimension>().is_err());
    }

    #[test]
    fn fresh_ids_differ() {
        assert_ne!(Record::new("a").id, Record::new("a").id);
    }
}
