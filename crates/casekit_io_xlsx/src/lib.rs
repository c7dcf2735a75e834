//! `casekit_io_xlsx` v1:
//! Rust-side spreadsheet import/export kernel for case tables.
//!
//! Architecture:
//! - `conf`   : Excel limits, export contract constants and format presets
//! - `spec`   : formats, policies, reports and errors
//! - `util`   : pure helper functions
//! - `reader` : calamine-backed first-sheet reader
//! - `frame`  : polars DataFrame / Arrow IPC input
//! - `writer` : rust_xlsxwriter-backed writer kernel
pub mod conf;
pub mod frame;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_FILE_NAME_EXPORT, C_MIME_XLSX, C_SHEET_NAME_EXPORT, N_LEN_EXCEL_SHEET_NAME_MAX,
    N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL, derive_default_xlsx_formats,
    derive_default_xlsx_write_options,
};
pub use frame::{dataset_from_dataframe, read_ipc_bytes};
pub use reader::{read_workbook_bytes, read_workbook_path};
pub use spec::{
    EnumAutofitColumnsRule, EnumColumnKind, EnumFmtKey, SpecAutofitCellsPolicy, SpecCellFormat,
    SpecSheetSlice, SpecXlsxExport, SpecXlsxRead, SpecXlsxReport, SpecXlsxValuePolicy,
    SpecXlsxWriteOptions, XlsxReadError, XlsxWriteError,
};
pub use util::{normalize_header_names, plan_sheet_slices, sanitize_sheet_name};
pub use writer::{SpecXlsxSheetWriteOptions, XlsxWriter, export_dataset};
