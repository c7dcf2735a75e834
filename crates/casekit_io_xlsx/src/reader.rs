//! First-sheet workbook reader backed by calamine.
//!
//! Accepts every format calamine detects (xlsx, xlsm, xlsb, xls, ods). The
//! first row of the used range is the header; later rows are data.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use casekit_table::{Dataset, EnumCellValue};

use crate::spec::{SpecXlsxRead, XlsxReadError};
use crate::util::normalize_header_names;

/// Read the first sheet of an in-memory workbook.
pub fn read_workbook_bytes(bytes: &[u8]) -> Result<SpecXlsxRead, XlsxReadError> {
    let workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(XlsxReadError::unreadable)?;
    read_first_sheet(workbook)
}

/// Read the first sheet of a workbook on disk.
pub fn read_workbook_path(path: &Path) -> Result<SpecXlsxRead, XlsxReadError> {
    let workbook = open_workbook_auto(path).map_err(XlsxReadError::unreadable)?;
    read_first_sheet(workbook)
}

fn read_first_sheet<RS: Read + Seek>(
    mut workbook: Sheets<RS>,
) -> Result<SpecXlsxRead, XlsxReadError> {
    let l_sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let Some(c_sheet_name) = l_sheet_names.first().cloned() else {
        return Err(XlsxReadError::NoSheets);
    };
    let sheets_ignored = l_sheet_names[1..].to_vec();
    if !sheets_ignored.is_empty() {
        log::info!(
            "Reading sheet {c_sheet_name:?}; ignoring {} other sheet(s)",
            sheets_ignored.len()
        );
    }

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(XlsxReadError::NoSheets)?
        .map_err(XlsxReadError::unreadable)?;

    let mut iter_rows = range.rows();
    let Some(row_header) = iter_rows.next() else {
        log::debug!("Sheet {c_sheet_name:?} is empty");
        return Ok(SpecXlsxRead {
            dataset: Dataset::default(),
            sheet_name: c_sheet_name,
            sheets_ignored,
        });
    };

    let l_header_raw = row_header.iter().map(derive_header_text).collect();
    let l_colnames = normalize_header_names(l_header_raw);

    let mut l_rows: Vec<Vec<EnumCellValue>> = iter_rows
        .map(|row| row.iter().map(derive_cell_value).collect())
        .collect();
    let n_rows_data = l_rows
        .iter()
        .rposition(|row| !row.iter().all(EnumCellValue::is_none))
        .map_or(0, |n_idx| n_idx + 1);
    if n_rows_data < l_rows.len() {
        log::debug!(
            "Dropped {} trailing blank row(s) in sheet {c_sheet_name:?}",
            l_rows.len() - n_rows_data
        );
        l_rows.truncate(n_rows_data);
    }

    let dataset = Dataset::from_rows(l_colnames, l_rows)?;
    log::info!(
        "Read {} rows x {} columns from sheet {c_sheet_name:?}",
        dataset.height(),
        dataset.width()
    );

    Ok(SpecXlsxRead {
        dataset,
        sheet_name: c_sheet_name,
        sheets_ignored,
    })
}

fn derive_header_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::Float(n) => Some(EnumCellValue::Number(*n).to_string()),
        Data::Bool(b) => Some(EnumCellValue::Boolean(*b).to_string()),
        _ => Some(cell.to_string()),
    }
}

fn derive_cell_value(cell: &Data) -> EnumCellValue {
    match cell {
        Data::Empty | Data::Error(_) => EnumCellValue::None,
        Data::String(s) if s.is_empty() => EnumCellValue::None,
        Data::String(s) => EnumCellValue::String(s.clone()),
        Data::Float(n) => EnumCellValue::Number(*n),
        Data::Int(n) => EnumCellValue::Number(*n as f64),
        Data::Bool(b) => EnumCellValue::Boolean(*b),
        Data::DateTime(dt) => EnumCellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => EnumCellValue::String(s.clone()),
    }
}
