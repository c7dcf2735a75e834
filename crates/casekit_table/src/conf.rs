//! Projection constants and default preset factories.

use crate::spec::SpecProjectionOptions;

/// Columns every export attempts to carry, in output order.
pub const TUP_COLUMNS_REQUIRED: [&str; 6] = [
    "counterpartyName",
    "caseId",
    "completedDate",
    "rubix_Score",
    "counterparty_panNo",
    "MCA_CIN",
];

/// Categorical column used for row filtering.
pub const C_COLUMN_CASE_TYPE: &str = "case type";

/// Case-type choices, in the order they are offered to the user.
pub const TUP_CASE_TYPES: [&str; 3] = ["Domestic", "International", "Both"];

/// Build the owned required column list.
pub fn derive_default_required_columns() -> Vec<String> {
    TUP_COLUMNS_REQUIRED.iter().map(ToString::to_string).collect()
}

/// Build default projection options.
pub fn derive_default_projection_options() -> SpecProjectionOptions {
    SpecProjectionOptions::default()
}
