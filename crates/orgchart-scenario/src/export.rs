//! Export boundary
//!
//! Converts stored scenarios back into tabular rows. Partition names are
//! made safe for spreadsheet tabs: at most 31 characters, none of
//! `\ / * ? : [ ]`, no leading or trailing apostrophe, unique ignoring case.

use crate::store::ScenarioStore;
use indexmap::IndexMap;
use orgchart_record::{rows_from_records, Row};
use std::collections::HashSet;

/// Longest allowed partition name, in characters
pub const MAX_PARTITION_NAME: usize = 31;

/// Name used when sanitizing leaves nothing
pub const FALLBACK_PARTITION_NAME: &str = "Sheet";

const FORBIDDEN: [char; 7] = ['\\', '/', '*', '?', ':', '[', ']'];

/// Make a scenario name usable as a spreadsheet tab name
#[must_use]
pub fn sanitize_partition_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { ' ' } else { c })
        .take(MAX_PARTITION_NAME)
        .collect();

    let trimmed = replaced.trim();
    let trimmed = trimmed.strip_prefix('\'').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('\'').unwrap_or(trimmed);

    if trimmed.is_empty() {
        FALLBACK_PARTITION_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Append ` (n)` to `base` until it is not in `taken`, keeping the length
/// limit
fn unique_name(base: String, taken: &HashSet<String>) -> String {
    if !taken.contains(&base.to_lowercase()) {
        return base;
    }
    let mut n = 2;
    loop {
        let suffix = format!(" ({n})");
        let room = MAX_PARTITION_NAME.saturating_sub(suffix.chars().count());
        let stem: String = base.chars().take(room).collect();
        let candidate = format!("{}{suffix}", stem.trim_end());
        if !taken.contains(&candidate.to_lowercase()) {
            return candidate;
        }
        n += 1;
    }
}

impl ScenarioStore {
    /// Every scenario as rows, keyed by scenario name
    ///
    /// Records without an identity are included.
    #[must_use]
    pub fn export(&self) -> IndexMap<String, Vec<Row>> {
        self.scenarios()
            .map(|scenario| (scenario.name().to_string(), rows_from_records(scenario.records())))
            .collect()
    }

    /// Non-empty scenarios as rows, keyed by sanitized, de-duplicated name
    #[must_use]
    pub fn export_sanitized(&self) -> IndexMap<String, Vec<Row>> {
        let mut taken = HashSet::new();
        let mut out = IndexMap::new();

        for scenario in self.scenarios() {
            if scenario.is_empty() {
                tracing::debug!(scenario = %scenario.name(), "empty scenario skipped on export");
                continue;
            }
            let name = unique_name(sanitize_partition_name(scenario.name()), &taken);
            taken.insert(name.to_lowercase());
            out.insert(name, rows_from_records(scenario.records()));
        }

        tracing::info!(partitions = out.len(), "scenarios exported");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Snapshot;
    use orgchart_record::row::TITLE;
    use orgchart_record::Record;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    #[test]
    fn forbidden_characters_become_spaces() {
        assert_eq!(sanitize_partition_name("Q1/Q2: plan*"), "Q1 Q2  plan");
        assert_eq!(sanitize_partition_name("[draft]"), "draft");
    }

    #[test]
    fn long_names_are_truncated() {
        let name = "a".repeat(40);
        assert_eq!(sanitize_partition_name(&name).chars().count(), 31);
    }

    #[test]
    fn apostrophes_are_stripped_at_the_ends() {
        assert_eq!(sanitize_partition_name("'Plan'"), "Plan");
        assert_eq!(sanitize_partition_name("Bob's"), "Bob's");
    }

    #[test]
    fn blank_names_fall_back() {
        assert_eq!(sanitize_partition_name(""), "Sheet");
        assert_eq!(sanitize_partition_name("???"), "Sheet");
        assert_eq!(sanitize_partition_name("'"), "Sheet");
    }

    fn store(entries: &[(&str, Vec<Record>)]) -> ScenarioStore {
        let snapshot: Snapshot = entries
            .iter()
            .map(|(name, records)| ((*name).to_string(), records.clone()))
            .collect();
        let mut store = ScenarioStore::new();
        store.load_snapshot(snapshot);
        store
    }

    #[test]
    fn export_keeps_every_scenario_and_record() {
        let store = store(&[
            ("Now", vec![Record::new("CEO"), Record::new("")]),
            ("Empty", Vec::new()),
        ]);
        let exported = store.export();

        assert_eq!(exported.keys().collect::<Vec<_>>(), vec!["Now", "Empty"]);
        assert_eq!(exported["Now"].len(), 2);
        assert_eq!(exported["Now"][1][TITLE], Value::String(String::new()));
    }

    #[test]
    fn sanitized_export_skips_empty_and_dedups() {
        let store = store(&[
            ("Plan/A", vec![Record::new("CEO")]),
            ("Plan:A", vec![Record::new("CFO")]),
            ("Empty", Vec::new()),
            ("plan a", vec![Record::new("COO")]),
        ]);
        let exported = store.export_sanitized();

        assert_eq!(
            exported.keys().collect::<Vec<_>>(),
            vec!["Plan A", "Plan A (2)", "plan a (3)"]
        );
    }

    #[test]
    fn dedup_suffix_respects_length_limit() {
        let long = "x".repeat(31);
        let longer = format!("{long}y");
        let store = store(&[
            (long.as_str(), vec![Record::new("a")]),
            (longer.as_str(), vec![Record::new("b")]),
        ]);
        let names: Vec<String> = store.export_sanitized().into_keys().collect();

        assert_eq!(names[0], long);
        assert_eq!(names[1], format!("{} (2)", "x".repeat(27)));
    }
}
