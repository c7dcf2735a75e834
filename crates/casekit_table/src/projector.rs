//! Row filter, column reconciliation and projection.
//!
//! Every function here is pure: inputs in, new table out.

use std::collections::BTreeSet;

use crate::dataset::Dataset;
use crate::report::ReportProjection;
use crate::spec::{
    DatasetError, EnumCellValue, EnumFilterOutcome, EnumProjectionIssue, SpecColumnReconciliation,
    SpecFilter, SpecProjectionOptions, SpecProjectionResult, SpecSelections,
};

/// Keep rows whose filter-column text equals the target, ignoring case.
///
/// Passes the table through unchanged when the column is absent or the
/// choice is `Both`. Non-text cells never match.
pub fn apply_filter(dataset: Dataset, spec_filter: &SpecFilter) -> (Dataset, EnumFilterOutcome) {
    let Some(values) = dataset.column(&spec_filter.column) else {
        log::debug!(
            "Filter column {:?} not found; rows pass through",
            spec_filter.column
        );
        return (
            dataset,
            EnumFilterOutcome::ColumnMissing {
                column: spec_filter.column.clone(),
            },
        );
    };
    let Some(c_target) = spec_filter.case_type.target() else {
        return (dataset, EnumFilterOutcome::Bypassed);
    };

    let c_target_lower = c_target.to_lowercase();
    let l_idx_keep: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, value)| is_text_match(value, &c_target_lower))
        .map(|(n_idx, _)| n_idx)
        .collect();

    let n_rows_kept = l_idx_keep.len();
    let n_rows_dropped = dataset.height() - n_rows_kept;
    log::debug!(
        "Filter {:?} == {c_target:?}: kept {n_rows_kept}, dropped {n_rows_dropped}",
        spec_filter.column
    );

    (
        dataset.take_rows(&l_idx_keep),
        EnumFilterOutcome::Applied {
            n_rows_kept,
            n_rows_dropped,
        },
    )
}

fn is_text_match(value: &EnumCellValue, target_lower: &str) -> bool {
    match value {
        EnumCellValue::String(s) => s.to_lowercase() == target_lower,
        _ => false,
    }
}

/// Order required columns then extras, keeping only names the table has.
///
/// Repeated names collapse to their first occurrence.
pub fn reconcile_columns(
    dataset: &Dataset,
    columns_required: &[String],
    columns_extra: &[String],
) -> SpecColumnReconciliation {
    let mut set_seen: BTreeSet<&str> = BTreeSet::new();
    let mut columns_ordered = Vec::new();
    for c_name in columns_required.iter().chain(columns_extra) {
        if dataset.contains_column(c_name) && set_seen.insert(c_name.as_str()) {
            columns_ordered.push(c_name.clone());
        }
    }

    let columns_required_missing = columns_required
        .iter()
        .filter(|c_name| !dataset.contains_column(c_name))
        .cloned()
        .collect::<Vec<_>>();

    SpecColumnReconciliation {
        columns_ordered,
        columns_required_missing,
    }
}

/// Narrow `dataset` to `columns`, in order, keeping every row.
pub fn project(dataset: &Dataset, columns: &[String]) -> Result<Dataset, DatasetError> {
    dataset.select_columns(columns)
}

/// Columns a user may add on top of the required ones, in schema order.
pub fn select_selectable_columns(dataset: &Dataset, columns_required: &[String]) -> Vec<String> {
    dataset
        .column_names()
        .iter()
        .filter(|c_name| !columns_required.contains(c_name))
        .cloned()
        .collect()
}

/// Filter, reconcile and project one table.
pub fn project_dataset(
    dataset: Dataset,
    options: &SpecProjectionOptions,
    selections: &SpecSelections,
) -> Result<SpecProjectionResult, DatasetError> {
    let n_rows_input = dataset.height();
    let n_cols_input = dataset.width();
    let mut l_issues = Vec::new();

    let spec_filter = SpecFilter {
        column: options.column_filter.clone(),
        case_type: selections.case_type,
    };
    let (ds_filtered, filter_outcome) = apply_filter(dataset, &spec_filter);
    if let EnumFilterOutcome::ColumnMissing { column } = &filter_outcome {
        l_issues.push(EnumProjectionIssue::MissingFilterColumn {
            column: column.clone(),
        });
    }

    let reconciliation = reconcile_columns(
        &ds_filtered,
        &options.columns_required,
        &selections.columns_extra,
    );
    if !reconciliation.columns_required_missing.is_empty() {
        l_issues.push(EnumProjectionIssue::MissingRequiredColumns {
            columns: reconciliation.columns_required_missing.clone(),
        });
    }

    for issue in &l_issues {
        log::warn!("{issue}");
    }

    let ds_projected = project(&ds_filtered, &reconciliation.columns_ordered)?;
    log::debug!(
        "Projected {} rows onto {} columns",
        ds_projected.height(),
        ds_projected.width()
    );

    let report = ReportProjection {
        n_rows_input,
        n_rows_output: ds_projected.height(),
        n_cols_input,
        columns_output: reconciliation.columns_ordered,
        filter_outcome,
        issues: l_issues,
    };

    Ok(SpecProjectionResult {
        dataset: ds_projected,
        columns_required_missing: reconciliation.columns_required_missing,
        report,
    })
}
