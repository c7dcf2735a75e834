//! Stateless helper utilities used by the reader and writer kernels.

use std::collections::{BTreeMap, BTreeSet};

use casekit_table::EnumCellValue;

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{
    EnumColumnKind, SpecSheetSlice, SpecXlsxReport, SpecXlsxValuePolicy, XlsxWriteError,
};

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Convert `NaN`/`Inf` to policy string; `None` for finite values.
pub fn convert_nan_inf_to_str(x: f64, value_policy: &SpecXlsxValuePolicy) -> Option<String> {
    if x.is_nan() {
        return Some(value_policy.nan_str.clone());
    }
    if x.is_infinite() {
        return Some(if x.is_sign_positive() {
            value_policy.posinf_str.clone()
        } else {
            value_policy.neginf_str.clone()
        });
    }
    None
}

/// Map a cell onto something a worksheet can hold.
///
/// Only blanks and non-finite numbers change; every other cell keeps its type.
/// Empty text counts as blank, since a worksheet cannot store an empty string.
pub fn normalize_cell_value(
    value: &EnumCellValue,
    if_keep_missing_values: bool,
    value_policy: &SpecXlsxValuePolicy,
) -> EnumCellValue {
    match value {
        EnumCellValue::String(s) if s.is_empty() => {
            normalize_cell_value(&EnumCellValue::None, if_keep_missing_values, value_policy)
        }
        EnumCellValue::None if if_keep_missing_values => {
            EnumCellValue::String(value_policy.missing_value_str.clone())
        }
        EnumCellValue::Number(n) | EnumCellValue::DateTime(n) if !n.is_finite() => {
            if if_keep_missing_values {
                convert_nan_inf_to_str(*n, value_policy)
                    .map_or(EnumCellValue::None, EnumCellValue::String)
            } else {
                EnumCellValue::None
            }
        }
        other => other.clone(),
    }
}

/// Classify a column by the types of its non-blank cells.
pub fn derive_column_kind(values: &[EnumCellValue], if_infer_integer: bool) -> EnumColumnKind {
    let mut if_any = false;
    let mut if_all_number = true;
    let mut if_all_whole = true;
    let mut if_all_datetime = true;

    for value in values {
        match value {
            EnumCellValue::None => continue,
            EnumCellValue::Number(n) => {
                if_all_datetime = false;
                if n.fract() != 0.0 {
                    if_all_whole = false;
                }
            }
            EnumCellValue::DateTime(_) => {
                if_all_number = false;
            }
            EnumCellValue::String(_) | EnumCellValue::Boolean(_) => return EnumColumnKind::Text,
        }
        if_any = true;
    }

    if !if_any {
        return EnumColumnKind::Text;
    }
    if if_all_datetime {
        return EnumColumnKind::DateTime;
    }
    if !if_all_number {
        return EnumColumnKind::Text;
    }
    if if_infer_integer && if_all_whole {
        EnumColumnKind::Integer
    } else {
        EnumColumnKind::Decimal
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HeaderNormalization

/// Turn raw header cells into unique column names.
///
/// Blank cells become `Unnamed: {idx}`; repeats get `.1`, `.2`, ... suffixes.
pub fn normalize_header_names(header_raw: Vec<Option<String>>) -> Vec<String> {
    let l_names: Vec<String> = header_raw
        .into_iter()
        .enumerate()
        .map(|(n_idx, c_name)| c_name.unwrap_or_else(|| format!("Unnamed: {n_idx}")))
        .collect();

    let mut set_used: BTreeSet<String> = BTreeSet::new();
    let mut dict_next_suffix: BTreeMap<String, usize> = BTreeMap::new();
    let mut l_unique = Vec::with_capacity(l_names.len());

    for c_name in l_names {
        if set_used.insert(c_name.clone()) {
            l_unique.push(c_name);
            continue;
        }

        let n_suffix = dict_next_suffix.entry(c_name.clone()).or_insert(1);
        let c_candidate = loop {
            let c_candidate = format!("{c_name}.{n_suffix}");
            *n_suffix += 1;
            if !set_used.contains(&c_candidate) {
                break c_candidate;
            }
        };
        set_used.insert(c_candidate.clone());
        l_unique.push(c_candidate);
    }

    l_unique
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Split logical table range into Excel-compliant sheet slices.
pub fn plan_sheet_slices(
    height_df: usize,
    width_df: usize,
    height_header: usize,
    sheet_name: &str,
    report: &mut SpecXlsxReport,
) -> Result<Vec<SpecSheetSlice>, XlsxWriteError> {
    if height_header == 0 {
        return Err(XlsxWriteError::InvalidLayout(
            "height_header must be >= 1.".to_string(),
        ));
    }

    let n_rows_data_max = N_NROWS_EXCEL_MAX
        .checked_sub(height_header)
        .filter(|n_rows| *n_rows > 0)
        .ok_or_else(|| {
            XlsxWriteError::InvalidLayout(format!(
                "Header too tall: height_header={height_header} exceeds Excel limit."
            ))
        })?;

    let l_col_slices = derive_contiguous_slices(width_df, N_NCOLS_EXCEL_MAX);
    let l_row_slices = derive_contiguous_slices(height_df, n_rows_data_max);
    let n_parts_total = l_col_slices.len() * l_row_slices.len();

    let mut l_sheet_parts = Vec::with_capacity(n_parts_total);
    let mut n_idx_part = 1;
    for (col_start, col_end) in &l_col_slices {
        for (row_start, row_end) in &l_row_slices {
            let c_part_sheet_name = if n_parts_total == 1 {
                sheet_name.to_string()
            } else {
                create_sheet_identifier(sheet_name, n_idx_part)
            };

            l_sheet_parts.push(SpecSheetSlice {
                sheet_name: c_part_sheet_name,
                row_start_inclusive: *row_start,
                row_end_exclusive: *row_end,
                col_start_inclusive: *col_start,
                col_end_exclusive: *col_end,
            });
            n_idx_part += 1;
        }
    }

    if n_parts_total > 1 {
        report.warn(format!(
            "Excel limit overflow: split into {} sheets (columns-first, then rows).",
            l_sheet_parts.len()
        ));
    }

    Ok(l_sheet_parts)
}

/// `[start, end)` ranges of at most `size_max` covering `n_total`; one empty range for zero.
fn derive_contiguous_slices(n_total: usize, size_max: usize) -> Vec<(usize, usize)> {
    let mut l_slices = Vec::new();
    let mut n_start = 0;
    while n_start < n_total {
        let n_end = usize::min(n_total, n_start + size_max);
        l_slices.push((n_start, n_end));
        n_start = n_end;
    }
    if l_slices.is_empty() {
        l_slices.push((0, 0));
    }
    l_slices
}

/// Create suffixed sheet name (`base_1`, `base_2`, ...), respecting length cap.
pub fn create_sheet_identifier(base_name: &str, part_idx_1based: usize) -> String {
    let c_sheet_name_suffix = format!("_{part_idx_1based}");
    let n_len_base_name_max = N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_sheet_name_suffix.len());

    let c_sheet_name_base: String = base_name
        .chars()
        .take(usize::max(1, n_len_base_name_max))
        .collect();

    format!("{c_sheet_name_base}{c_sheet_name_suffix}")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
