//! CLI constants: exit codes, environment variables and preview defaults.
//!
//! Exit codes are part of the shell contract.

/// Success.
pub const N_EXIT_SUCCESS: u8 = 0;
/// Input could not be read or parsed.
pub const N_EXIT_READ_ERROR: u8 = 1;
/// Bad arguments (clap reports these itself).
pub const N_EXIT_USAGE: u8 = 2;
/// Projection, export or output write failed.
pub const N_EXIT_WRITE_ERROR: u8 = 3;

/// Output path override.
pub const C_ENV_OUTPUT: &str = "CASEKIT_OUTPUT";
/// Case type override.
pub const C_ENV_CASE_TYPE: &str = "CASEKIT_CASE_TYPE";

/// Input path meaning "read standard input".
pub const C_INPUT_STDIN: &str = "-";
/// File extensions routed to the Arrow IPC reader.
pub const TUP_EXT_IPC: [&str; 3] = ["arrow", "ipc", "feather"];

/// Preview rows shown when not overridden.
pub const N_ROWS_PREVIEW_DEFAULT: usize = 5;
/// Preview cells wider than this are truncated.
pub const N_WIDTH_PREVIEW_CELL_MAX: usize = 32;
