use orgchart_record::row::COLUMNS;
use orgchart_record::{records_from_rows, rows_from_records, Record, Row};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::Value;

fn arb_cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[ a-zA-Z]{0,8}".prop_map(Value::String),
        Just(Value::Null),
        (0..1_000i64).prop_map(Value::from),
        any::<bool>().prop_map(Value::Bool),
    ]
}

prop_compose! {
    fn arb_row()(
        cells in prop::collection::vec(proptest::option::of(arb_cell()), COLUMNS.len()),
        office in proptest::option::of(arb_cell()),
    ) -> Row {
        let mut row: Row = COLUMNS
            .iter()
            .zip(cells)
            .filter_map(|(column, cell)| cell.map(|cell| ((*column).to_string(), cell)))
            .collect();
        if let Some(office) = office {
            row.insert("Office".to_string(), office);
        }
        row
    }
}

proptest! {
    #[test]
    fn prop_export_reimports_to_same_records(rows in prop::collection::vec(arb_row(), 0..8)) {
        let first = records_from_rows(&rows).unwrap();
        let second = records_from_rows(&rows_from_records(&first)).unwrap();

        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            prop_assert_eq!(a.to_row(), b.to_row());
            // only the surrogate id is minted afresh
            prop_assert_eq!(&Record { id: b.id, ..a.clone() }, b);
        }
    }

    #[test]
    fn prop_export_has_fixed_header(rows in prop::collection::vec(arb_row(), 1..8)) {
        let records = records_from_rows(&rows).unwrap();
        for row in rows_from_records(&records) {
            let header: Vec<&str> = row.keys().take(COLUMNS.len()).map(String::as_str).collect();
            prop_assert_eq!(header, COLUMNS.to_vec());
        }
    }
}

#[test]
fn blank_optional_cells_stay_absent_after_reimport() {
    let rows = vec![[("Title", "CTO"), ("Name", "  "), ("Team", "")]
        .into_iter()
        .map(|(column, value)| (column.to_string(), Value::from(value)))
        .collect::<Row>()];
    let records = records_from_rows(&rows).unwrap();
    let again = records_from_rows(&rows_from_records(&records)).unwrap();

    assert_eq!(again[0].identity, "CTO");
    assert_eq!(again[0].display_name, None);
    assert!(again[0].group_keys.is_empty());
}
