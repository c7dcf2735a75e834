// Export then re-read over generated tables.

use casekit_io_xlsx::{SpecXlsxWriteOptions, export_dataset, read_workbook_bytes};
use casekit_table::{Dataset, EnumCellValue};
use proptest::prelude::*;

const TUP_POOL_COLUMNS: [&str; 8] = [
    "counterpartyName",
    "caseId",
    "completedDate",
    "rubix_Score",
    "MCA_CIN",
    "case type",
    "region",
    "株式会社",
];

fn strategy_cell() -> impl Strategy<Value = EnumCellValue> {
    prop_oneof![
        Just(EnumCellValue::None),
        Just(EnumCellValue::from("")),
        "[A-Za-z0-9][A-Za-z0-9 ]{0,8}[A-Za-z0-9]".prop_map(EnumCellValue::from),
        (-1e6f64..1e6).prop_map(EnumCellValue::Number),
        (-1000i64..1000).prop_map(|n| EnumCellValue::Number(n as f64)),
        any::<bool>().prop_map(EnumCellValue::Boolean),
        (1.0f64..80_000.0).prop_map(EnumCellValue::DateTime),
    ]
}

fn strategy_dataset() -> impl Strategy<Value = Dataset> {
    (
        prop::sample::subsequence(TUP_POOL_COLUMNS.to_vec(), 1..=TUP_POOL_COLUMNS.len()),
        0usize..10,
    )
        .prop_flat_map(|(l_cols, n_rows)| {
            let n_width = l_cols.len();
            prop::collection::vec(prop::collection::vec(strategy_cell(), n_rows), n_width)
                .prop_map(move |values_by_col| {
                    Dataset::new(
                        l_cols
                            .iter()
                            .map(ToString::to_string)
                            .zip(values_by_col)
                            .collect(),
                    )
                    .unwrap()
                })
        })
}

/// Empty text reads back blank; trailing all-blank rows leave no trace in the sheet.
fn derive_expected(ds: &Dataset) -> Dataset {
    let mut l_rows: Vec<Vec<EnumCellValue>> = ds
        .rows()
        .map(|row| {
            row.into_iter()
                .map(|value| match value {
                    EnumCellValue::String(s) if s.is_empty() => EnumCellValue::None,
                    other => other.clone(),
                })
                .collect()
        })
        .collect();
    while l_rows
        .last()
        .is_some_and(|row| row.iter().all(EnumCellValue::is_none))
    {
        l_rows.pop();
    }
    Dataset::from_rows(ds.column_names().to_vec(), l_rows).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn export_then_read_keeps_names_and_values(ds in strategy_dataset()) {
        let export = export_dataset(&ds, &SpecXlsxWriteOptions::default()).unwrap();
        let read = read_workbook_bytes(&export.bytes).unwrap();

        prop_assert_eq!(read.sheet_name.as_str(), "Filtered");
        prop_assert_eq!(read.dataset.column_names(), ds.column_names());
        prop_assert_eq!(read.dataset, derive_expected(&ds));
    }

    #[test]
    fn export_keeps_rows_with_any_value(ds in strategy_dataset()) {
        let is_filled = |value: &EnumCellValue| !value.is_none() && value.as_str() != Some("");
        let l_rows: Vec<Vec<&EnumCellValue>> = ds.rows().collect();
        let n_rows_last_value = l_rows
            .iter()
            .rposition(|row| row.iter().any(|value| is_filled(value)))
            .map_or(0, |n_idx| n_idx + 1);

        let export = export_dataset(&ds, &SpecXlsxWriteOptions::default()).unwrap();
        let read = read_workbook_bytes(&export.bytes).unwrap();
        prop_assert_eq!(read.dataset.height(), n_rows_last_value);
    }
}
