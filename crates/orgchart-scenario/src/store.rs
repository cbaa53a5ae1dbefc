//! Scenario store
//!
//! Holds every named scenario and tracks which one is active. The active
//! scenario *is* the working set: mutations edit its stored records in place,
//! so reading the active scenario and reading the working set can never
//! disagree.
//!
//! There is no separate working copy, so switching copies nothing. Each
//! scenario owns its `Vec<Record>`; two scenarios never alias the same
//! records, and one created from another starts as a clone. Switching away
//! and back therefore returns records equal to, and independent of, every
//! other scenario's.
//!
//! # State machine (per scenario)
//!
//! ```text
//! absent -> loaded -> (mutated)* -> dormant -> reactivated -> absent
//!             ^                                                 |
//!             +----------------- load / create -----------------+
//! ```

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::scenario::{Scenario, Snapshot};
use indexmap::IndexMap;
use orgchart_hierarchy::{
    build_group_tree_labeled, build_tree, is_descendant, GroupNode, TreeNode,
};
use orgchart_record::{Dimension, Record, RecordPatch};
use tracing::{debug, info, warn};

/// Result of a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteOutcome {
    /// Records removed (more than one when the identity was duplicated)
    pub removed: usize,
    /// Surviving records whose parent reference was cleared
    pub detached: usize,
}

/// Owner of all scenarios and the active working set
#[derive(Debug, Clone, Default)]
pub struct ScenarioStore {
    config: StoreConfig,
    scenarios: IndexMap<String, Scenario>,
    active: Option<String>,
}

impl ScenarioStore {
    /// Create an empty store with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            scenarios: IndexMap::new(),
            active: None,
        }
    }

    /// Store configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Name of the active scenario
    #[inline]
    #[must_use]
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The active working set
    #[must_use]
    pub fn records(&self) -> &[Record] {
        self.active
            .as_ref()
            .and_then(|name| self.scenarios.get(name))
            .map(Scenario::records)
            .unwrap_or_default()
    }

    /// Number of records in the working set
    #[must_use]
    pub fn len(&self) -> usize {
        self.records().len()
    }

    /// Whether the working set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// A stored scenario by name
    #[must_use]
    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.get(name)
    }

    /// Scenario names in insertion order
    pub fn scenario_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.scenarios.keys().map(String::as_str)
    }

    /// Number of stored scenarios
    #[inline]
    #[must_use]
    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }

    /// All stored scenarios in insertion order
    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> + '_ {
        self.scenarios.values()
    }

    /// Record with this trimmed identity; a later duplicate wins
    #[must_use]
    pub fn find_record(&self, identity: &str) -> Option<&Record> {
        let identity = identity.trim();
        if identity.is_empty() {
            return None;
        }
        self.records().iter().rev().find(|r| r.key() == identity)
    }

    /// Individual-level forest of the working set
    #[must_use]
    pub fn tree(&self) -> Vec<TreeNode> {
        build_tree(self.records())
    }

    /// Group forest of the working set
    #[must_use]
    pub fn group_tree(&self, dimension: Dimension) -> Vec<GroupNode> {
        build_group_tree_labeled(self.records(), dimension, &self.config.unassigned_label)
    }

    /// Replace every scenario with `snapshot`
    ///
    /// The first entry becomes active. An empty snapshot leaves the store
    /// with no active scenario and an empty working set.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) {
        self.scenarios = snapshot
            .into_iter()
            .map(|(name, records)| {
                let scenario = Scenario::new(name.clone(), records);
                (name, scenario)
            })
            .collect();
        self.active = self.scenarios.keys().next().cloned();

        info!(
            scenarios = self.scenarios.len(),
            active = ?self.active,
            records = self.len(),
            "snapshot loaded"
        );
    }

    /// Make `name` the active scenario
    ///
    /// # Errors
    /// [`StoreError::UnknownScenario`] if no such scenario exists; the active
    /// scenario is left as it was.
    pub fn switch_scenario(&mut self, name: &str) -> Result<(), StoreError> {
        if !self.scenarios.contains_key(name) {
            warn!(scenario = %name, "switch to unknown scenario ignored");
            return Err(StoreError::UnknownScenario {
                name: name.to_string(),
            });
        }
        debug!(from = ?self.active, to = %name, "switching scenario");
        self.active = Some(name.to_string());
        info!(scenario = %name, records = self.len(), "scenario activated");
        Ok(())
    }

    /// Copy the working set into a new scenario named `name` and activate it
    ///
    /// Returns `false` without touching anything if `name` already exists.
    pub fn create_scenario(&mut self, name: &str) -> bool {
        if self.scenarios.contains_key(name) {
            debug!(scenario = %name, "scenario already exists");
            return false;
        }
        let records = self.records().to_vec();
        let count = records.len();
        self.scenarios
            .insert(name.to_string(), Scenario::new(name, records));
        self.active = Some(name.to_string());
        info!(scenario = %name, records = count, "scenario created");
        true
    }

    /// Drop a scenario
    ///
    /// Removing the active scenario activates the first remaining one, or
    /// leaves the store with no active scenario.
    ///
    /// # Errors
    /// [`StoreError::UnknownScenario`] if no such scenario exists.
    pub fn remove_scenario(&mut self, name: &str) -> Result<Scenario, StoreError> {
        let Some(removed) = self.scenarios.shift_remove(name) else {
            warn!(scenario = %name, "remove of unknown scenario ignored");
            return Err(StoreError::UnknownScenario {
                name: name.to_string(),
            });
        };
        if self.active.as_deref() == Some(name) {
            self.active = self.scenarios.keys().next().cloned();
        }
        info!(scenario = %name, active = ?self.active, "scenario removed");
        Ok(removed)
    }

    /// Drop every scenario and the working set
    pub fn reset(&mut self) {
        let dropped = self.scenarios.len();
        self.scenarios.clear();
        self.active = None;
        info!(scenarios = dropped, "store reset");
    }

    /// Replace the whole working set
    pub fn set_records(&mut self, records: Vec<Record>) {
        let count = records.len();
        let working = self.working_mut();
        *working = records;
        info!(scenario = ?self.active, records = count, "working set replaced");
    }

    /// Append a record to the working set
    pub fn add_record(&mut self, record: Record) {
        let identity = record.key().to_string();
        self.working_mut().push(record);
        info!(scenario = ?self.active, identity = %identity, "record added");
    }

    /// Apply `patch` to every record whose trimmed identity is `identity`
    ///
    /// `identity` is the identity before the patch; a patch may rename the
    /// record. Returns the number of records changed.
    ///
    /// A patch that sets a parent goes through the same cycle check as
    /// [`reparent`](Self::reparent). The new parent does not have to exist.
    ///
    /// # Errors
    /// - [`StoreError::EmptyIdentity`] for a blank identity
    /// - [`StoreError::UnknownRecord`] when nothing matches
    /// - [`StoreError::CycleRejected`] if the patched record would report to
    ///   itself or to one of its own reports
    ///
    /// The store is unchanged on error.
    pub fn update_record(
        &mut self,
        identity: &str,
        patch: &RecordPatch,
    ) -> Result<usize, StoreError> {
        let identity = self.require_known(identity)?;
        self.check_patch_parent(&identity, patch)?;
        let mut changed = 0;
        for record in self.working_mut() {
            if record.key() == identity {
                patch.apply(record);
                changed += 1;
            }
        }
        info!(scenario = ?self.active, identity = %identity, changed, "record updated");
        Ok(changed)
    }

    /// Remove every record with this identity and detach its reports
    ///
    /// Surviving records that named the deleted identity as their parent
    /// become roots.
    ///
    /// # Errors
    /// [`StoreError::EmptyIdentity`] for a blank identity and
    /// [`StoreError::UnknownRecord`] when nothing matches. The store is
    /// unchanged in both cases.
    pub fn delete_record(&mut self, identity: &str) -> Result<DeleteOutcome, StoreError> {
        let identity = self.require_known(identity)?;
        let working = self.working_mut();

        let before = working.len();
        working.retain(|record| record.key() != identity);
        let removed = before - working.len();

        let mut detached = 0;
        for record in working.iter_mut() {
            if record.parent_key() == Some(identity.as_str()) {
                record.parent_identity = None;
                detached += 1;
            }
        }

        info!(
            scenario = ?self.active,
            identity = %identity,
            removed,
            detached,
            "record deleted"
        );
        Ok(DeleteOutcome { removed, detached })
    }

    /// Move a record under `new_parent`, or make it a root with `None`
    ///
    /// # Errors
    /// - [`StoreError::EmptyIdentity`] for a blank identity
    /// - [`StoreError::UnknownRecord`] if the record or the new parent is
    ///   missing
    /// - [`StoreError::CycleRejected`] if the new parent is the record itself
    ///   or already reports to it
    ///
    /// The store is unchanged on error.
    pub fn reparent(
        &mut self,
        identity: &str,
        new_parent: Option<&str>,
    ) -> Result<(), StoreError> {
        let (identity, parent) = self.check_reparent(identity, new_parent)?;
        let patch = RecordPatch::new().with_parent(parent.clone().unwrap_or_default());
        for record in self.working_mut() {
            if record.key() == identity {
                patch.apply(record);
            }
        }
        info!(
            scenario = ?self.active,
            identity = %identity,
            parent = ?parent,
            "record reparented"
        );
        Ok(())
    }

    /// Whether [`reparent`](Self::reparent) would succeed
    #[must_use]
    pub fn can_reparent(&self, identity: &str, new_parent: Option<&str>) -> bool {
        self.check_reparent(identity, new_parent).is_ok()
    }

    fn check_reparent(
        &self,
        identity: &str,
        new_parent: Option<&str>,
    ) -> Result<(String, Option<String>), StoreError> {
        let identity = self.require_known(identity)?;
        let Some(parent) = new_parent.map(str::trim).filter(|p| !p.is_empty()) else {
            return Ok((identity, None));
        };
        if is_descendant(&identity, parent, self.records()) {
            warn!(identity = %identity, parent = %parent, "reparent would create a cycle");
            return Err(StoreError::CycleRejected {
                identity,
                parent: parent.to_string(),
            });
        }
        if self.find_record(parent).is_none() {
            warn!(identity = %identity, parent = %parent, "reparent to unknown record");
            return Err(StoreError::UnknownRecord {
                identity: parent.to_string(),
            });
        }
        Ok((identity, Some(parent.to_string())))
    }

    /// Reject a patch whose new parent chain leads back to the patched record
    ///
    /// The check runs against the working set as it would look after the
    /// patch, so a rename in the same patch is taken into account.
    fn check_patch_parent(&self, identity: &str, patch: &RecordPatch) -> Result<(), StoreError> {
        let Some(parent) = patch
            .parent_identity
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
        else {
            return Ok(());
        };

        let mut preview = self.records().to_vec();
        for record in preview.iter_mut().filter(|r| r.key() == identity) {
            patch.apply(record);
        }
        let moved = patch.identity.as_deref().map_or(identity, str::trim);

        if is_descendant(moved, parent, &preview) {
            warn!(identity = %identity, parent = %parent, "update would create a cycle");
            return Err(StoreError::CycleRejected {
                identity: identity.to_string(),
                parent: parent.to_string(),
            });
        }
        Ok(())
    }

    /// Trimmed identity, if it names a record in the working set
    fn require_known(&self, identity: &str) -> Result<String, StoreError> {
        let identity = identity.trim();
        if identity.is_empty() {
            return Err(StoreError::EmptyIdentity);
        }
        if self.find_record(identity).is_none() {
            warn!(scenario = ?self.active, identity = %identity, "unknown record");
            return Err(StoreError::UnknownRecord {
                identity: identity.to_string(),
            });
        }
        Ok(identity.to_string())
    }

    /// Records of the active scenario, creating the default scenario when
    /// nothing is active
    fn working_mut(&mut self) -> &mut Vec<Record> {
        let name = match &self.active {
            Some(name) => name.clone(),
            None => {
                let name = self.config.default_scenario.clone();
                info!(scenario = %name, "no active scenario, activating default");
                self.active = Some(name.clone());
                name
            }
        };
        self.scenarios
            .entry(name.clone())
            .or_insert_with(move || Scenario::new(name, Vec::new()))
            .records_mut()
    }
}
