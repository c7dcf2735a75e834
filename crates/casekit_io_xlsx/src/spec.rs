//! Shared XLSX specification models.

use casekit_table::{Dataset, DatasetError};

use crate::conf::TUP_CREATION_DATE_PINNED;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Canonical format preset keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnumFmtKey {
    /// Generic text cell format.
    Text,
    /// Whole-number format.
    Integer,
    /// Fractional number format.
    Decimal,
    /// Date-time format.
    DateTime,
    /// Header cell format.
    Header,
}

/// Cell format specification; `None` fields inherit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Bold style.
    pub bold: Option<bool>,
    /// Horizontal alignment.
    pub align: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Number format code.
    pub num_format: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
            border: other.border.or(self.border),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
        }
    }
}

/// Dominant cell type of a column, used to pick its format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumColumnKind {
    /// Text, booleans, blanks or a mix of types.
    Text,
    /// Numbers only, all whole.
    Integer,
    /// Numbers only, some fractional.
    Decimal,
    /// Date-times only.
    DateTime,
}

impl EnumColumnKind {
    /// Preset key backing this kind.
    pub fn fmt_key(&self) -> EnumFmtKey {
        match self {
            EnumColumnKind::Text => EnumFmtKey::Text,
            EnumColumnKind::Integer => EnumFmtKey::Integer,
            EnumColumnKind::Decimal => EnumFmtKey::Decimal,
            EnumColumnKind::DateTime => EnumFmtKey::DateTime,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Replacement text for values a worksheet cannot hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxValuePolicy {
    /// Replacement text for missing value when keep-missing is enabled.
    pub missing_value_str: String,
    /// Replacement text for NaN.
    pub nan_str: String,
    /// Replacement text for positive infinity.
    pub posinf_str: String,
    /// Replacement text for negative infinity.
    pub neginf_str: String,
}

impl Default for SpecXlsxValuePolicy {
    fn default() -> Self {
        Self {
            missing_value_str: "NA".to_string(),
            nan_str: "NaN".to_string(),
            posinf_str: "Inf".to_string(),
            neginf_str: "-Inf".to_string(),
        }
    }
}

/// Autofit rule for column width inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumAutofitColumnsRule {
    /// Leave Excel's default widths.
    None,
    /// Infer width from header cells (default).
    #[default]
    Header,
}

/// Autofit policy for per-sheet write call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAutofitCellsPolicy {
    /// Autofit width inference rule.
    pub rule_columns: EnumAutofitColumnsRule,
    /// Minimum final width.
    pub width_cell_min: usize,
    /// Maximum final width.
    pub width_cell_max: usize,
    /// Width padding added after inference.
    pub width_cell_padding: usize,
}

impl Default for SpecAutofitCellsPolicy {
    fn default() -> Self {
        Self {
            rule_columns: EnumAutofitColumnsRule::Header,
            width_cell_min: 8,
            width_cell_max: 60,
            width_cell_padding: 2,
        }
    }
}

/// Writer-wide options controlling value conversion and formatting defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxWriteOptions {
    /// Value conversion policy.
    pub value_policy: SpecXlsxValuePolicy,
    /// Write missing/NaN/Inf as policy text instead of blank.
    pub keep_missing_values: bool,
    /// Give whole-number columns an integer number format.
    pub infer_integer_cols: bool,
    /// Creation date stamped into document properties; `None` stamps "now".
    pub creation_date: Option<(u16, u8, u8)>,
}

impl Default for SpecXlsxWriteOptions {
    fn default() -> Self {
        Self {
            value_policy: SpecXlsxValuePolicy::default(),
            keep_missing_values: false,
            infer_integer_cols: true,
            creation_date: Some(TUP_CREATION_DATE_PINNED),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetSpecification

/// Concrete sheet part emitted to workbook (after Excel-limit slicing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetSlice {
    /// Actual unique sheet name in workbook.
    pub sheet_name: String,
    /// Inclusive source row start.
    pub row_start_inclusive: usize,
    /// Exclusive source row end.
    pub row_end_exclusive: usize,
    /// Inclusive source column start.
    pub col_start_inclusive: usize,
    /// Exclusive source column end.
    pub col_end_exclusive: usize,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Per-write call report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Sheet slices produced by the write call.
    pub sheets: Vec<SpecSheetSlice>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

/// Export payload handed to the download collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxExport {
    /// Workbook bytes.
    pub bytes: Vec<u8>,
    /// Suggested file name.
    pub file_name: String,
    /// MIME type.
    pub mime_type: String,
    /// Per-sheet write reports.
    pub reports: Vec<SpecXlsxReport>,
}

/// Parsed first sheet of an uploaded workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecXlsxRead {
    /// Table read from the sheet.
    pub dataset: Dataset,
    /// Name of the sheet that was read.
    pub sheet_name: String,
    /// Names of sheets that were ignored.
    pub sheets_ignored: Vec<String>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Import failures.
#[derive(Debug, thiserror::Error)]
pub enum XlsxReadError {
    /// Payload is not a readable spreadsheet.
    #[error("{cause}")]
    UnreadableFile {
        /// Underlying parser message.
        cause: String,
    },
    /// Workbook has no worksheet.
    #[error("Workbook contains no sheets")]
    NoSheets,
    /// Cells could not form a valid table.
    #[error(transparent)]
    InvalidDataset(#[from] DatasetError),
}

impl XlsxReadError {
    /// Wrap any displayable parser error.
    pub fn unreadable(err: impl std::fmt::Display) -> Self {
        XlsxReadError::UnreadableFile {
            cause: err.to_string(),
        }
    }
}

/// Export failures.
#[derive(Debug, thiserror::Error)]
pub enum XlsxWriteError {
    /// rust_xlsxwriter rejected an operation.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    /// Row/column index does not fit the worksheet coordinate type.
    #[error("{0}")]
    IndexOverflow(String),
    /// Policy values are inconsistent.
    #[error("{0}")]
    InvalidPolicy(String),
    /// Sheet layout cannot be planned.
    #[error("{0}")]
    InvalidLayout(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
