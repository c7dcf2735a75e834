//! `casekit_table` v1:
//! Rust-side case-table projection kernel.
//!
//! Architecture:
//! - `conf`      : required columns, filter column and case-type constants
//! - `spec`      : cell values, selections, options, outcomes and errors
//! - `dataset`   : schema-described in-memory table
//! - `projector` : filter / reconcile / project pipeline
//! - `report`    : per-invocation projection report
pub mod conf;
pub mod dataset;
pub mod projector;
pub mod report;
pub mod spec;

pub use conf::{
    C_COLUMN_CASE_TYPE, TUP_CASE_TYPES, TUP_COLUMNS_REQUIRED, derive_default_projection_options,
    derive_default_required_columns,
};
pub use dataset::{Dataset, validate_unique_columns};
pub use projector::{
    apply_filter, project, project_dataset, reconcile_columns, select_selectable_columns,
};
pub use report::ReportProjection;
pub use spec::{
    DatasetError, EnumCaseType, EnumCellValue, EnumFilterOutcome, EnumProjectionIssue,
    ParseCaseTypeError, SpecColumnReconciliation, SpecFilter, SpecProjectionOptions,
    SpecProjectionResult, SpecSelections,
};
