//! Shared projection specification models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, TimeDelta};

use crate::conf::{C_COLUMN_CASE_TYPE, derive_default_required_columns};
use crate::dataset::Dataset;
use crate::report::ReportProjection;

////////////////////////////////////////////////////////////////////////////////
// #region CellValue

/// One spreadsheet cell as read from the source, without type coercion.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EnumCellValue {
    /// Missing/blank value.
    #[default]
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
    /// Date-time stored as an Excel serial (1900 date system).
    DateTime(f64),
}

impl EnumCellValue {
    /// Whether the cell is blank.
    pub fn is_none(&self) -> bool {
        matches!(self, EnumCellValue::None)
    }

    /// Borrow the text payload of a string cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EnumCellValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for EnumCellValue {
    fn from(value: &str) -> Self {
        EnumCellValue::String(value.to_string())
    }
}

impl From<String> for EnumCellValue {
    fn from(value: String) -> Self {
        EnumCellValue::String(value)
    }
}

impl From<f64> for EnumCellValue {
    fn from(value: f64) -> Self {
        EnumCellValue::Number(value)
    }
}

impl From<bool> for EnumCellValue {
    fn from(value: bool) -> Self {
        EnumCellValue::Boolean(value)
    }
}

impl<T: Into<EnumCellValue>> From<Option<T>> for EnumCellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(EnumCellValue::None, Into::into)
    }
}

impl fmt::Display for EnumCellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumCellValue::None => Ok(()),
            EnumCellValue::String(s) => write!(f, "{s}"),
            EnumCellValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            EnumCellValue::Boolean(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            EnumCellValue::DateTime(serial) => write!(f, "{}", format_excel_serial(*serial)),
        }
    }
}

/// Render an Excel 1900-system serial as `YYYY-MM-DD[ HH:MM:SS]`.
///
/// Serials outside the calendar range are rendered as plain numbers.
fn format_excel_serial(serial: f64) -> String {
    if !serial.is_finite() {
        return serial.to_string();
    }
    // Serials before 1900-03-01 sit on the other side of Excel's phantom 1900-02-29.
    let epoch = if serial < 60.0 {
        NaiveDate::from_ymd_opt(1899, 12, 31)
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)
    };
    let n_days = serial.floor();
    let n_secs = ((serial - n_days) * 86_400.0).round() as i64;

    let dt = epoch
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|dt| dt.checked_add_signed(TimeDelta::try_days(n_days as i64)?))
        .and_then(|dt| dt.checked_add_signed(TimeDelta::try_seconds(n_secs)?));

    match dt {
        Some(dt) if n_secs == 0 => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => serial.to_string(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Selections

/// Case-type filter choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumCaseType {
    /// Keep rows whose case type is `domestic` (any casing).
    #[default]
    Domestic,
    /// Keep rows whose case type is `international` (any casing).
    International,
    /// No filtering.
    Both,
}

impl EnumCaseType {
    /// All choices in offer order.
    pub const ALL: [EnumCaseType; 3] = [
        EnumCaseType::Domestic,
        EnumCaseType::International,
        EnumCaseType::Both,
    ];

    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnumCaseType::Domestic => "Domestic",
            EnumCaseType::International => "International",
            EnumCaseType::Both => "Both",
        }
    }

    /// Value rows must match, or `None` when no filtering applies.
    pub fn target(&self) -> Option<&'static str> {
        match self {
            EnumCaseType::Both => None,
            other => Some(other.as_str()),
        }
    }
}

impl fmt::Display for EnumCaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown case-type label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown case type {0:?}; expected one of Domestic, International, Both")]
pub struct ParseCaseTypeError(pub String);

impl FromStr for EnumCaseType {
    type Err = ParseCaseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let c_value = s.trim();
        EnumCaseType::ALL
            .into_iter()
            .find(|case_type| case_type.as_str().eq_ignore_ascii_case(c_value))
            .ok_or_else(|| ParseCaseTypeError(s.to_string()))
    }
}

/// Row filter: keep rows whose `column` matches `case_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFilter {
    /// Filter column name.
    pub column: String,
    /// Target value.
    pub case_type: EnumCaseType,
}

impl SpecFilter {
    /// Filter on the default `case type` column.
    pub fn case_type(case_type: EnumCaseType) -> Self {
        Self {
            column: C_COLUMN_CASE_TYPE.to_string(),
            case_type,
        }
    }
}

/// User selections for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecSelections {
    /// Selected case type.
    pub case_type: EnumCaseType,
    /// Extra columns, in selection order.
    pub columns_extra: Vec<String>,
}

/// Projection options; defaults carry the fixed column contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecProjectionOptions {
    /// Required columns, in output order.
    pub columns_required: Vec<String>,
    /// Filter column name.
    pub column_filter: String,
}

impl Default for SpecProjectionOptions {
    fn default() -> Self {
        Self {
            columns_required: derive_default_required_columns(),
            column_filter: C_COLUMN_CASE_TYPE.to_string(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Outcomes

/// What the filter step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumFilterOutcome {
    /// Rows were filtered.
    Applied {
        /// Rows kept.
        n_rows_kept: usize,
        /// Rows dropped.
        n_rows_dropped: usize,
    },
    /// `Both` was selected; rows pass through.
    Bypassed,
    /// Filter column absent; rows pass through.
    ColumnMissing {
        /// Name of the absent column.
        column: String,
    },
}

/// Ordered output columns and the required columns the source lacks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecColumnReconciliation {
    /// Columns to project, required first then extras.
    pub columns_ordered: Vec<String>,
    /// Required columns absent from the source schema, in required order.
    pub columns_required_missing: Vec<String>,
}

/// Final output of [`crate::projector::project_dataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpecProjectionResult {
    /// Filtered and projected table.
    pub dataset: Dataset,
    /// Required columns absent from the source schema.
    pub columns_required_missing: Vec<String>,
    /// Step report with non-fatal issues.
    pub report: ReportProjection,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Structural dataset errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    /// Column length differs from the table height.
    #[error("Column {column:?} has {n_len} values; expected {n_expected}")]
    RaggedColumn {
        /// Offending column.
        column: String,
        /// Its length.
        n_len: usize,
        /// Table height.
        n_expected: usize,
    },
    /// Row width differs from the header width.
    #[error("Row {n_idx_row} has {n_len} cells; expected {n_expected}")]
    RaggedRow {
        /// Zero-based row index.
        n_idx_row: usize,
        /// Its width.
        n_len: usize,
        /// Header width.
        n_expected: usize,
    },
    /// Same column name appears more than once.
    #[error("Duplicate column names detected: {0}")]
    DuplicateColumns(String),
    /// Column lookup failed.
    #[error("Column not found: {0:?}")]
    ColumnNotFound(String),
}

/// Non-fatal conditions surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnumProjectionIssue {
    /// Filter column absent; filter skipped.
    #[error("'{column}' column not found. Skipping filter.")]
    MissingFilterColumn {
        /// Filter column name.
        column: String,
    },
    /// Some required columns absent; they are omitted from the output.
    #[error("Missing fixed columns: {columns:?}")]
    MissingRequiredColumns {
        /// Absent required columns.
        columns: Vec<String>,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
