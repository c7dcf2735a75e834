//! XLSX writer kernel that turns a [`Dataset`] into workbook bytes.

use std::collections::{BTreeMap, BTreeSet};

use casekit_table::{Dataset, EnumCellValue, validate_unique_columns};
use rust_xlsxwriter::{
    DocProperties, ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet,
};

use crate::conf::{
    C_FILE_NAME_EXPORT, C_MIME_XLSX, C_SHEET_NAME_EXPORT, N_LEN_EXCEL_SHEET_NAME_MAX,
    derive_default_xlsx_formats,
};
use crate::spec::{
    EnumAutofitColumnsRule, EnumFmtKey, SpecAutofitCellsPolicy, SpecCellFormat, SpecSheetSlice,
    SpecXlsxExport, SpecXlsxReport, SpecXlsxWriteOptions, XlsxWriteError,
};
use crate::util::{
    derive_column_kind, normalize_cell_value, plan_sheet_slices, sanitize_sheet_name,
};

/// Per-sheet call options.
#[derive(Default, Debug, Clone)]
pub struct SpecXlsxSheetWriteOptions {
    /// Column autofit policy.
    pub policy_autofit: SpecAutofitCellsPolicy,
}

/// Stateful workbook writer.
///
/// The workbook is buffered in memory until [`Self::save_to_buffer`] is called.
pub struct XlsxWriter {
    workbook: Workbook,
    dict_fmt: BTreeMap<EnumFmtKey, SpecCellFormat>,
    write_options: SpecXlsxWriteOptions,
    set_sheet_names_existing: BTreeSet<String>,
    l_reports: Vec<SpecXlsxReport>,
}

impl XlsxWriter {
    /// Create writer bound to format presets and options.
    pub fn new(
        dict_fmt: &BTreeMap<EnumFmtKey, SpecCellFormat>,
        write_options: SpecXlsxWriteOptions,
    ) -> Result<Self, XlsxWriteError> {
        let mut workbook = Workbook::new();
        if let Some((n_year, n_month, n_day)) = write_options.creation_date {
            let dt_creation = ExcelDateTime::from_ymd(n_year, n_month, n_day)?;
            let props = DocProperties::new().set_creation_datetime(&dt_creation);
            workbook.set_properties(&props);
        }

        Ok(Self {
            workbook,
            dict_fmt: dict_fmt.clone(),
            write_options,
            set_sheet_names_existing: BTreeSet::new(),
            l_reports: Vec::new(),
        })
    }

    /// Return immutable snapshot of per-sheet write reports.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }

    /// Serialize the workbook to bytes.
    pub fn save_to_buffer(&mut self) -> Result<Vec<u8>, XlsxWriteError> {
        Ok(self.workbook.save_to_buffer()?)
    }

    /// Write one dataset as one logical sheet, split when it exceeds Excel limits.
    pub fn write_sheet(
        &mut self,
        dataset: &Dataset,
        sheet_name: &str,
        options: &SpecXlsxSheetWriteOptions,
    ) -> Result<(), XlsxWriteError> {
        validate_policy_autofit(&options.policy_autofit)?;
        validate_unique_columns(dataset.column_names())
            .map_err(|err| XlsxWriteError::InvalidLayout(err.to_string()))?;

        let if_keep_missing_values = self.write_options.keep_missing_values;
        let value_policy = self.write_options.value_policy.clone();

        let n_rows_header = 1usize;
        let mut report = SpecXlsxReport::default();
        let l_sheet_parts = plan_sheet_slices(
            dataset.height(),
            dataset.width(),
            n_rows_header,
            &sanitize_sheet_name(sheet_name, "_"),
            &mut report,
        )?;

        let fmt_header =
            derive_rust_xlsx_format(&derive_fmt_spec(&self.dict_fmt, EnumFmtKey::Header));
        let fmt_datetime =
            derive_rust_xlsx_format(&derive_fmt_spec(&self.dict_fmt, EnumFmtKey::DateTime));
        let l_fmt_data_by_col: Vec<Format> = (0..dataset.width())
            .map(|n_idx_col| {
                let values = dataset.column_at(n_idx_col).unwrap_or(&[]);
                let kind = derive_column_kind(values, self.write_options.infer_integer_cols);
                derive_rust_xlsx_format(&derive_fmt_spec(&self.dict_fmt, kind.fmt_key()))
            })
            .collect();

        let if_autofit_columns = matches!(
            options.policy_autofit.rule_columns,
            EnumAutofitColumnsRule::Header
        );

        for sheet_slice in l_sheet_parts {
            let sheet_name_unique = self.derive_unique_sheet_name(&sheet_slice.sheet_name);
            let worksheet = self.workbook.add_worksheet();
            worksheet.set_name(&sheet_name_unique)?;

            let n_width_slice = sheet_slice.col_end_exclusive - sheet_slice.col_start_inclusive;
            let mut l_width_by_col_header = vec![0usize; n_width_slice];

            for n_idx_col in 0..n_width_slice {
                let n_idx_col_abs = sheet_slice.col_start_inclusive + n_idx_col;
                let c_name = &dataset.column_names()[n_idx_col_abs];
                if c_name.is_empty() {
                    worksheet.write_blank(0, cast_col_num(n_idx_col)?, &fmt_header)?;
                } else {
                    worksheet.write_string_with_format(
                        0,
                        cast_col_num(n_idx_col)?,
                        c_name,
                        &fmt_header,
                    )?;
                }
                l_width_by_col_header[n_idx_col] = estimate_unicode_string_width(c_name);
            }

            worksheet.set_freeze_panes(cast_row_num(n_rows_header)?, 0)?;

            for n_idx_col in 0..n_width_slice {
                let n_idx_col_abs = sheet_slice.col_start_inclusive + n_idx_col;
                let values = dataset.column_at(n_idx_col_abs).unwrap_or(&[]);
                let l_values_slice =
                    &values[sheet_slice.row_start_inclusive..sheet_slice.row_end_exclusive];

                for (n_row_local, value_raw) in l_values_slice.iter().enumerate() {
                    let value =
                        normalize_cell_value(value_raw, if_keep_missing_values, &value_policy);
                    write_cell_with_format(
                        worksheet,
                        n_rows_header + n_row_local,
                        n_idx_col,
                        &value,
                        &l_fmt_data_by_col[n_idx_col_abs],
                        &fmt_datetime,
                    )?;
                }
            }

            if if_autofit_columns && n_width_slice > 0 {
                let n_min = usize::max(1, options.policy_autofit.width_cell_min);
                let n_max = usize::min(
                    255,
                    usize::max(n_min, options.policy_autofit.width_cell_max),
                );
                let n_pad = options.policy_autofit.width_cell_padding;

                for (n_idx_col, n_width_header) in l_width_by_col_header.iter().enumerate() {
                    let n_width_final =
                        usize::min(n_max, usize::max(n_min, n_width_header + n_pad));
                    worksheet.set_column_width(cast_col_num(n_idx_col)?, n_width_final as f64)?;
                }
            }

            report.sheets.push(SpecSheetSlice {
                sheet_name: sheet_name_unique,
                ..sheet_slice
            });
        }

        for c_warning in &report.warnings {
            log::warn!("{c_warning}");
        }
        log::debug!(
            "Wrote {} rows x {} columns as {} sheet(s)",
            dataset.height(),
            dataset.width(),
            report.sheets.len()
        );
        self.l_reports.push(report);
        Ok(())
    }

    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        if !self.set_sheet_names_existing.contains(name) {
            self.set_sheet_names_existing.insert(name.to_string());
            return name.to_string();
        }

        let base_name: String = name
            .chars()
            .take(usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX - 3))
            .collect();

        let mut n_idx = 2usize;
        loop {
            let candidate: String = format!("{base_name}__{n_idx}")
                .chars()
                .take(N_LEN_EXCEL_SHEET_NAME_MAX)
                .collect();
            if !self.set_sheet_names_existing.contains(&candidate) {
                self.set_sheet_names_existing.insert(candidate.clone());
                return candidate;
            }
            n_idx += 1;
        }
    }
}

/// Serialize `dataset` as a single-sheet workbook named `Filtered`.
///
/// Column order and cell types are kept; no index column is written.
pub fn export_dataset(
    dataset: &Dataset,
    write_options: &SpecXlsxWriteOptions,
) -> Result<SpecXlsxExport, XlsxWriteError> {
    let mut writer = XlsxWriter::new(&derive_default_xlsx_formats(), write_options.clone())?;
    writer.write_sheet(
        dataset,
        C_SHEET_NAME_EXPORT,
        &SpecXlsxSheetWriteOptions::default(),
    )?;
    let bytes = writer.save_to_buffer()?;
    log::info!(
        "Exported {} rows x {} columns ({} bytes)",
        dataset.height(),
        dataset.width(),
        bytes.len()
    );

    Ok(SpecXlsxExport {
        bytes,
        file_name: C_FILE_NAME_EXPORT.to_string(),
        mime_type: C_MIME_XLSX.to_string(),
        reports: writer.report(),
    })
}

fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

fn derive_fmt_spec(
    dict_fmt: &BTreeMap<EnumFmtKey, SpecCellFormat>,
    key: EnumFmtKey,
) -> SpecCellFormat {
    dict_fmt.get(&key).cloned().unwrap_or_default()
}

fn validate_policy_autofit(policy_autofit: &SpecAutofitCellsPolicy) -> Result<(), XlsxWriteError> {
    if policy_autofit.width_cell_min == 0 {
        return Err(XlsxWriteError::InvalidPolicy(
            "policy_autofit.width_cell_min must be >= 1.".to_string(),
        ));
    }
    if policy_autofit.width_cell_max < policy_autofit.width_cell_min {
        return Err(XlsxWriteError::InvalidPolicy(
            "policy_autofit.width_cell_max must be >= policy_autofit.width_cell_min.".to_string(),
        ));
    }
    Ok(())
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
    fmt_datetime: &Format,
) -> Result<(), XlsxWriteError> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumCellValue::None => {}
        EnumCellValue::String(val) => {
            worksheet.write_string_with_format(n_row, n_col, val, format)?;
        }
        EnumCellValue::Number(val) => {
            worksheet.write_number_with_format(n_row, n_col, *val, format)?;
        }
        EnumCellValue::Boolean(val) => {
            worksheet.write_boolean_with_format(n_row, n_col, *val, format)?;
        }
        EnumCellValue::DateTime(val) => {
            worksheet.write_number_with_format(n_row, n_col, *val, fmt_datetime)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    match align.trim().to_ascii_lowercase().as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn cast_row_num(value: usize) -> Result<u32, XlsxWriteError> {
    u32::try_from(value)
        .map_err(|_| XlsxWriteError::IndexOverflow(format!("row index overflow: {value}")))
}

fn cast_col_num(value: usize) -> Result<u16, XlsxWriteError> {
    u16::try_from(value)
        .map_err(|_| XlsxWriteError::IndexOverflow(format!("column index overflow: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_workbook_bytes;

    fn build_dataset() -> Dataset {
        Dataset::new(vec![
            (
                "caseId".to_string(),
                vec![EnumCellValue::from("C-1"), EnumCellValue::from("C-2")],
            ),
            (
                "rubix_Score".to_string(),
                vec![EnumCellValue::Number(7.0), EnumCellValue::Number(2.5)],
            ),
            (
                "completedDate".to_string(),
                vec![EnumCellValue::DateTime(45292.5), EnumCellValue::None],
            ),
            (
                "flag".to_string(),
                vec![EnumCellValue::Boolean(true), EnumCellValue::Boolean(false)],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_export_round_trip() {
        let ds = build_dataset();
        let export = export_dataset(&ds, &SpecXlsxWriteOptions::default()).unwrap();
        assert_eq!(export.file_name, "filtered_data.xlsx");
        assert_eq!(export.mime_type, C_MIME_XLSX);
        assert_eq!(export.reports.len(), 1);
        assert_eq!(export.reports[0].sheets[0].sheet_name, "Filtered");

        let read = read_workbook_bytes(&export.bytes).unwrap();
        assert_eq!(read.sheet_name, "Filtered");
        assert!(read.sheets_ignored.is_empty());
        assert_eq!(read.dataset, ds);
    }

    #[test]
    fn test_export_is_deterministic_across_clock_ticks() {
        let ds = build_dataset();
        let options_pinned = SpecXlsxWriteOptions::default();
        let options_now = SpecXlsxWriteOptions {
            creation_date: None,
            ..Default::default()
        };

        let pinned_first = export_dataset(&ds, &options_pinned).unwrap();
        let now_first = export_dataset(&ds, &options_now).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1_100));
        let pinned_second = export_dataset(&ds, &options_pinned).unwrap();
        let now_second = export_dataset(&ds, &options_now).unwrap();

        assert_eq!(pinned_first.bytes, pinned_second.bytes);
        assert_ne!(now_first.bytes, now_second.bytes);
    }

    #[test]
    fn test_export_empty_text_keeps_row() {
        let ds = Dataset::new(vec![(
            "caseId".to_string(),
            vec![EnumCellValue::from(""), EnumCellValue::from("C-2")],
        )])
        .unwrap();
        let export = export_dataset(&ds, &SpecXlsxWriteOptions::default()).unwrap();

        let read = read_workbook_bytes(&export.bytes).unwrap().dataset;
        assert_eq!(read.height(), 2);
        assert_eq!(read.get(0, "caseId"), Some(&EnumCellValue::None));
        assert_eq!(read.get(1, "caseId"), Some(&EnumCellValue::from("C-2")));
    }

    #[test]
    fn test_autofit_none_skips_column_widths() {
        let ds = build_dataset();
        let mut writer_fit =
            XlsxWriter::new(&derive_default_xlsx_formats(), SpecXlsxWriteOptions::default())
                .unwrap();
        writer_fit
            .write_sheet(&ds, "Cases", &SpecXlsxSheetWriteOptions::default())
            .unwrap();
        let mut writer_plain =
            XlsxWriter::new(&derive_default_xlsx_formats(), SpecXlsxWriteOptions::default())
                .unwrap();
        let options_plain = SpecXlsxSheetWriteOptions {
            policy_autofit: SpecAutofitCellsPolicy {
                rule_columns: EnumAutofitColumnsRule::None,
                ..Default::default()
            },
        };
        writer_plain.write_sheet(&ds, "Cases", &options_plain).unwrap();

        let v_fit = writer_fit.save_to_buffer().unwrap();
        let v_plain = writer_plain.save_to_buffer().unwrap();
        assert_ne!(v_fit, v_plain);
        assert_eq!(read_workbook_bytes(&v_plain).unwrap().dataset, ds);
    }

    #[test]
    fn test_export_header_only() {
        let ds = Dataset::new(vec![
            ("caseId".to_string(), vec![]),
            ("MCA_CIN".to_string(), vec![]),
        ])
        .unwrap();
        let export = export_dataset(&ds, &SpecXlsxWriteOptions::default()).unwrap();

        let read = read_workbook_bytes(&export.bytes).unwrap();
        assert_eq!(read.dataset.column_names(), ["caseId", "MCA_CIN"]);
        assert!(read.dataset.is_empty());
    }

    #[test]
    fn test_export_no_columns() {
        let export = export_dataset(&Dataset::default(), &SpecXlsxWriteOptions::default()).unwrap();
        let read = read_workbook_bytes(&export.bytes).unwrap();
        assert_eq!(read.sheet_name, "Filtered");
        assert_eq!(read.dataset.width(), 0);
    }

    #[test]
    fn test_keep_missing_values_writes_policy_text() {
        let ds = Dataset::new(vec![
            (
                "caseId".to_string(),
                vec![EnumCellValue::None, EnumCellValue::from("C-2")],
            ),
            (
                "rubix_Score".to_string(),
                vec![EnumCellValue::Number(f64::NAN), EnumCellValue::Number(1.0)],
            ),
        ])
        .unwrap();
        let options = SpecXlsxWriteOptions {
            keep_missing_values: true,
            ..Default::default()
        };
        let export = export_dataset(&ds, &options).unwrap();

        let read = read_workbook_bytes(&export.bytes).unwrap().dataset;
        assert_eq!(read.get(0, "caseId"), Some(&EnumCellValue::from("NA")));
        assert_eq!(read.get(0, "rubix_Score"), Some(&EnumCellValue::from("NaN")));
    }

    #[test]
    fn test_unique_sheet_names_across_calls() {
        let mut writer =
            XlsxWriter::new(&derive_default_xlsx_formats(), SpecXlsxWriteOptions::default())
                .unwrap();
        let ds = build_dataset();
        let options = SpecXlsxSheetWriteOptions::default();
        writer.write_sheet(&ds, "Cases", &options).unwrap();
        writer.write_sheet(&ds, "Cases", &options).unwrap();

        let l_names: Vec<String> = writer
            .report()
            .iter()
            .flat_map(|report| report.sheets.iter().map(|sheet| sheet.sheet_name.clone()))
            .collect();
        assert_eq!(l_names, vec!["Cases", "Cases__2"]);
    }

    #[test]
    fn test_invalid_autofit_policy_is_rejected() {
        let mut writer =
            XlsxWriter::new(&derive_default_xlsx_formats(), SpecXlsxWriteOptions::default())
                .unwrap();
        let options = SpecXlsxSheetWriteOptions {
            policy_autofit: SpecAutofitCellsPolicy {
                width_cell_min: 0,
                ..Default::default()
            },
        };
        assert!(matches!(
            writer.write_sheet(&build_dataset(), "Cases", &options),
            Err(XlsxWriteError::InvalidPolicy(_))
        ));
    }
}
