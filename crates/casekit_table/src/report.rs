//! Projection report model.

use std::collections::BTreeMap;
use std::fmt;

use crate::spec::{EnumFilterOutcome, EnumProjectionIssue};

/// Counters and non-fatal issues for one projection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportProjection {
    /// Rows in the source table.
    pub n_rows_input: usize,
    /// Rows after filtering.
    pub n_rows_output: usize,
    /// Columns in the source table.
    pub n_cols_input: usize,
    /// Final column list.
    pub columns_output: Vec<String>,
    /// Filter step result.
    pub filter_outcome: EnumFilterOutcome,
    /// Non-fatal issues, in the order they arose.
    pub issues: Vec<EnumProjectionIssue>,
}

impl ReportProjection {
    /// Number of collected issues.
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// User-facing message per issue.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, usize> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("n_rows_input".to_string(), self.n_rows_input);
        dict_counts.insert("n_rows_output".to_string(), self.n_rows_output);
        dict_counts.insert("n_cols_input".to_string(), self.n_cols_input);
        dict_counts.insert("n_cols_output".to_string(), self.columns_output.len());
        dict_counts.insert("n_issues".to_string(), self.issue_count());
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        let c_filter = match &self.filter_outcome {
            EnumFilterOutcome::Applied { .. } => "applied",
            EnumFilterOutcome::Bypassed => "bypassed",
            EnumFilterOutcome::ColumnMissing { .. } => "skipped",
        };
        format!(
            "{prefix} rows_in={} rows_out={} cols_in={} cols_out={} filter={c_filter} issues={}",
            dict_counts["n_rows_input"],
            dict_counts["n_rows_output"],
            dict_counts["n_cols_input"],
            dict_counts["n_cols_output"],
            dict_counts["n_issues"],
        )
    }
}

impl fmt::Display for ReportProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[PROJECT]"))
    }
}
