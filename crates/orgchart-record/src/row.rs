//! Tabular row boundary
//!
//! Rows come from spreadsheet-like sources as ordered column/value maps.
//! Recognised columns map onto [`Record`] fields; everything else is kept in
//! [`Record::extra`] so that an export reproduces what was loaded.

use crate::patch::RecordPatch;
use crate::record::{Dimension, Record};
use indexmap::IndexMap;
use serde_json::Value;

/// One tabular row: column name to cell value, in column order
pub type Row = IndexMap<String, Value>;

/// `Name` column
pub const NAME: &str = "Name";
/// `Title` column, the relational key
pub const TITLE: &str = "Title";
/// `Department` column
pub const DEPARTMENT: &str = "Department";
/// `Team` column
pub const TEAM: &str = "Team";
/// `Reporting To` column, the parent key
pub const REPORTING_TO: &str = "Reporting To";
/// `Accountabilities` column
pub const ACCOUNTABILITIES: &str = "Accountabilities";
/// `Metrics` column
pub const METRICS: &str = "Metrics";

/// Recognised columns in export order
pub const COLUMNS: [&str; 7] = [
    NAME,
    TITLE,
    DEPARTMENT,
    TEAM,
    REPORTING_TO,
    ACCOUNTABILITIES,
    METRICS,
];

const ANNOTATION_COLUMNS: [&str; 2] = [ACCOUNTABILITIES, METRICS];

/// Row conversion errors
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    /// A recognised column holds an array or object
    #[error("column `{column}` holds a nested value")]
    NestedValue {
        /// Offending column
        column: String,
    },

    /// Error located at a specific row
    #[error("row {index}: {source}")]
    AtRow {
        /// Zero-based row index
        index: usize,
        /// Underlying error
        #[source]
        source: Box<RowError>,
    },

    /// Input is not a JSON array of objects
    #[error("malformed row data: {0}")]
    Json(#[from] serde_json::Error),
}

fn cell_text(column: &str, value: &Value) -> Result<Option<String>, RowError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(RowError::NestedValue {
            column: column.to_string(),
        }),
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|s| !s.trim().is_empty())
}

fn dimension_of(column: &str) -> Option<Dimension> {
    Dimension::ALL.into_iter().find(|d| d.column() == column)
}

impl Record {
    /// Build a record from a row, minting a fresh surrogate id
    ///
    /// A missing `Title` yields a record with an empty identity; such records
    /// are kept for export but take no part in the hierarchy.
    ///
    /// # Errors
    /// Returns [`RowError::NestedValue`] if a recognised column holds an
    /// array or object.
    pub fn from_row(row: &Row) -> Result<Self, RowError> {
        let mut record = Record::new(String::new());

        for (column, value) in row {
            let column = column.as_str();
            if let Some(dimension) = dimension_of(column) {
                if let Some(text) = cell_text(column, value)? {
                    record.set_group(dimension, text);
                }
                continue;
            }
            match column {
                TITLE => record.identity = cell_text(column, value)?.unwrap_or_default(),
                NAME => record.display_name = non_blank(cell_text(column, value)?),
                REPORTING_TO => record.parent_identity = non_blank(cell_text(column, value)?),
                ACCOUNTABILITIES | METRICS => {
                    if let Some(text) = non_blank(cell_text(column, value)?) {
                        record.set_attribute(column, text);
                    }
                }
                _ => {
                    record.extra.insert(column.to_string(), value.clone());
                }
            }
        }

        Ok(record)
    }

    /// Convert back to a row
    ///
    /// Every recognised column is emitted (empty string when absent), then
    /// any non-standard annotations, then the preserved extra columns.
    #[must_use]
    pub fn to_row(&self) -> Row {
        let text = |s: Option<&str>| Value::String(s.unwrap_or_default().to_string());
        let mut row = Row::with_capacity(COLUMNS.len() + self.extra.len());

        row.insert(NAME.into(), text(self.display_name.as_deref()));
        row.insert(TITLE.into(), Value::String(self.identity.clone()));
        for dimension in Dimension::ALL {
            let raw = self.group_keys.get(&dimension).map(String::as_str);
            row.insert(dimension.column().into(), text(raw));
        }
        row.insert(REPORTING_TO.into(), text(self.parent_identity.as_deref()));
        for column in ANNOTATION_COLUMNS {
            row.insert(column.into(), text(self.attribute(column)));
        }
        for attribute in &self.attributes {
            if !ANNOTATION_COLUMNS.contains(&attribute.name.as_str()) {
                row.insert(attribute.name.clone(), Value::String(attribute.value.clone()));
            }
        }
        for (column, value) in &self.extra {
            row.entry(column.clone()).or_insert_with(|| value.clone());
        }

        row
    }
}

impl RecordPatch {
    /// Build a patch from the columns a row carries
    ///
    /// Columns absent from the row are left untouched when the patch is
    /// applied; `null` cells are ignored.
    ///
    /// # Errors
    /// Returns [`RowError::NestedValue`] if a recognised column holds an
    /// array or object.
    pub fn from_row(row: &Row) -> Result<Self, RowError> {
        let mut patch = RecordPatch::new();

        for (column, value) in row {
            let column = column.as_str();
            if let Some(dimension) = dimension_of(column) {
                if let Some(text) = cell_text(column, value)? {
                    patch.group_keys.insert(dimension, text);
                }
                continue;
            }
            match column {
                TITLE => patch.identity = cell_text(column, value)?,
                NAME => patch.display_name = cell_text(column, value)?,
                REPORTING_TO => patch.parent_identity = cell_text(column, value)?,
                ACCOUNTABILITIES | METRICS => {
                    if let Some(text) = cell_text(column, value)? {
                        patch = patch.with_attribute(column, text);
                    }
                }
                _ => {
                    patch.extra.insert(column.to_string(), value.clone());
                }
            }
        }

        Ok(patch)
    }
}

/// Parse a JSON array of row objects, keeping column order
///
/// # Errors
/// Returns [`RowError::Json`] if the text is not an array of objects.
pub fn rows_from_json(text: &str) -> Result<Vec<Row>, RowError> {
    Ok(serde_json::from_str(text)?)
}

/// Convert rows into records
///
/// # Errors
/// Returns [`RowError::AtRow`] naming the first row that fails conversion.
pub fn records_from_rows(rows: &[Row]) -> Result<Vec<Record>, RowError> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            Record::from_row(row).map_err(|e| RowError::AtRow {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}

/// Convert records back into rows
#[must_use]
pub fn rows_from_records(records: &[Record]) -> Vec<Row> {
    records.iter().map(Record::to_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn row(value: Value) -> Row {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn recognised_columns_map_to_fields() {
        let record = Record::from_row(&row(json!({
            "Name": "Grace",
            "Title": "CTO",
            "Department": "Engineering",
            "Team": "",
            "Reporting To": "CEO",
            "Accountabilities": "Architecture",
            "Metrics": "",
        })))
        .unwrap();

        assert_eq!(record.identity, "CTO");
        assert_eq!(record.display_name.as_deref(), Some("Grace"));
        assert_eq!(record.group(Dimension::Department), Some("Engineering"));
        assert_eq!(record.group(Dimension::Team), None);
        assert_eq!(record.parent_key(), Some("CEO"));
        assert_eq!(record.attribute("Accountabilities"), Some("Architecture"));
        assert_eq!(record.attribute("Metrics"), None);
        assert!(record.extra.is_empty());
    }

    #[test]
    fn missing_title_is_kept_with_empty_identity() {
        let record = Record::from_row(&row(json!({ "Name": "Nobody" }))).unwrap();
        assert!(!record.has_identity());
    }

    #[test]
    fn unknown_columns_survive_round_trip() {
        let source = rows_from_json(
            r#"[{"Title":"CEO","Location":"Berlin","Headcount":3,"Reporting To":""}]"#,
        )
        .unwrap();
        let records = records_from_rows(&source).unwrap();
        let exported = records[0].to_row();

        assert_eq!(exported["Location"], json!("Berlin"));
        assert_eq!(exported["Headcount"], json!(3));
        assert_eq!(exported[REPORTING_TO], json!(""));

        let columns: Vec<&str> = exported.keys().map(String::as_str).collect();
        assert_eq!(&columns[..7], &COLUMNS[..]);
        assert_eq!(&columns[7..], &["Location", "Headcount"]);
    }

    #[test]
    fn export_reimports_to_same_fields() {
        let original = Record::new("VP Sales")
            .with_parent("CEO")
            .with_name("Lin")
            .with_group(Dimension::Department, "Sales")
            .with_attribute("Metrics", "ARR");
        let again = Record::from_row(&original.to_row()).unwrap();

        assert_eq!(again.identity, original.identity);
        assert_eq!(again.parent_identity, original.parent_identity);
        assert_eq!(again.display_name, original.display_name);
        assert_eq!(again.group_keys, original.group_keys);
        assert_eq!(again.attributes, original.attributes);
        assert_ne!(again.id, original.id);
    }

    #[test]
    fn numeric_title_is_stringified() {
        let record = Record::from_row(&row(json!({ "Title": 42 }))).unwrap();
        assert_eq!(record.identity, "42");
    }

    #[test]
    fn nested_value_is_rejected_with_row_index() {
        let rows = vec![
            row(json!({ "Title": "ok" })),
            row(json!({ "Title": ["not", "text"] })),
        ];
        let err = records_from_rows(&rows).unwrap_err();

        assert!(matches!(err, RowError::AtRow { index: 1, .. }));
        assert!(err.to_string().contains("Title"));
    }

    #[test]
    fn non_array_json_is_rejected() {
        assert!(matches!(rows_from_json("{}"), Err(RowError::Json(_))));
    }

    #[test]
    fn patch_from_row_only_touches_present_columns() {
        let patch = RecordPatch::from_row(&row(json!({
            "Title": "Head of Ops",
            "Reporting To": "",
            "Team": "Ops",
        })))
        .unwrap();

        assert_eq!(patch.identity.as_deref(), Some("Head of Ops"));
        assert_eq!(patch.parent_identity.as_deref(), Some(""));
        assert_eq!(patch.display_name, None);
        assert_eq!(patch.group_keys.get(&Dimension::Team).map(String::as_str), Some("Ops"));

        let mut record = Record::new("Ops Lead").with_parent("COO").with_name("Sam");
        patch.apply(&mut record);
        assert_eq!(record.identity, "Head of Ops");
        assert_eq!(record.parent_identity, None);
        assert_eq!(record.display_name.as_deref(), Some("Sam"));
    }
}
