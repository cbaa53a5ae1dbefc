//! Store configuration

use orgchart_hierarchy::UNASSIGNED;
use serde::{Deserialize, Serialize};

/// Scenario store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Scenario created when a mutation arrives with nothing active
    pub default_scenario: String,
    /// Group label for records without a value in the grouping dimension
    pub unassigned_label: String,
}

impl StoreConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With default scenario name
    #[inline]
    #[must_use]
    pub fn with_default_scenario(mut self, name: impl Into<String>) -> Self {
        self.default_scenario = name.into();
        self
    }

    /// With unassigned group label
    #[inline]
    #[must_use]
    pub fn with_unassigned_label(mut self, label: impl Into<String>) -> Self {
        self.unassigned_label = label.into();
        self
    }

    /// Parse from a JSON document; missing keys take their defaults
    ///
    /// # Errors
    /// Returns the `serde_json` error if the document is malformed.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_scenario: "Default".to_string(),
            unassigned_label: UNASSIGNED.to_string(),
        }
    }
}
