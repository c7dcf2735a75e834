//! `casekit_cli` v1:
//! Invocation pipeline behind the `casekit` binary.
//!
//! Architecture:
//! - `conf`     : exit codes, environment variables and preview defaults
//! - `spec`     : input sources, invocation result and errors
//! - `pipeline` : load → project → export
//! - `preview`  : plain-text table rendering
pub mod conf;
pub mod pipeline;
pub mod preview;
pub mod spec;

pub use conf::{
    C_ENV_CASE_TYPE, C_ENV_OUTPUT, N_EXIT_READ_ERROR, N_EXIT_SUCCESS, N_EXIT_USAGE,
    N_EXIT_WRITE_ERROR, N_ROWS_PREVIEW_DEFAULT, N_WIDTH_PREVIEW_CELL_MAX,
};
pub use pipeline::{load_dataset, process_dataset, run_invocation, write_export};
pub use preview::render_preview;
pub use spec::{EnumInputKind, EnumInputSource, PipelineError, SpecInvocationResult};
