//! Invocation inputs, results and errors.

use std::path::{Path, PathBuf};

use casekit_io_xlsx::{SpecXlsxExport, XlsxReadError, XlsxWriteError};
use casekit_table::{Dataset, DatasetError, SpecProjectionResult};

use crate::conf::{C_INPUT_STDIN, N_EXIT_READ_ERROR, N_EXIT_WRITE_ERROR, TUP_EXT_IPC};

////////////////////////////////////////////////////////////////////////////////
// #region InputSpecification

/// Where the input table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumInputSource {
    /// File on disk.
    Path(PathBuf),
    /// Spreadsheet bytes on standard input.
    Stdin,
}

impl EnumInputSource {
    /// Interpret a CLI argument; `-` means standard input.
    pub fn from_arg(arg: &str) -> Self {
        if arg == C_INPUT_STDIN {
            EnumInputSource::Stdin
        } else {
            EnumInputSource::Path(PathBuf::from(arg))
        }
    }

    /// Reader selected for this source.
    pub fn kind(&self) -> EnumInputKind {
        match self {
            EnumInputSource::Path(path) => EnumInputKind::from_path(path),
            EnumInputSource::Stdin => EnumInputKind::Workbook,
        }
    }
}

/// Reader family for an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumInputKind {
    /// Any calamine-supported spreadsheet.
    Workbook,
    /// Arrow IPC / Feather v2 file.
    Ipc,
}

impl EnumInputKind {
    /// Pick the reader by file extension; unknown extensions go to calamine.
    pub fn from_path(path: &Path) -> Self {
        let if_ipc = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| TUP_EXT_IPC.iter().any(|c_ext| ext.eq_ignore_ascii_case(c_ext)));
        if if_ipc {
            EnumInputKind::Ipc
        } else {
            EnumInputKind::Workbook
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ResultSpecification

/// Everything one invocation produces.
#[derive(Debug, Clone)]
pub struct SpecInvocationResult {
    /// Table as read, before filtering.
    pub dataset_original: Dataset,
    /// Filtered and projected table with its report.
    pub projection: SpecProjectionResult,
    /// Workbook payload for the projected table.
    pub export: SpecXlsxExport,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Invocation failures, each tied to an exit code.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Input unreadable.
    #[error("Error reading file: {0}")]
    Read(XlsxReadError),
    /// Projection rejected the table.
    #[error("Projection failed: {0}")]
    Project(DatasetError),
    /// Workbook serialization failed.
    #[error("Export failed: {0}")]
    Export(XlsxWriteError),
    /// Output file could not be written.
    #[error("Failed to write {}: {cause}", .path.display())]
    WriteOutput {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        cause: std::io::Error,
    },
}

// No variant exposes a source; each message already carries its cause.
impl From<XlsxReadError> for PipelineError {
    fn from(err: XlsxReadError) -> Self {
        PipelineError::Read(err)
    }
}

impl From<DatasetError> for PipelineError {
    fn from(err: DatasetError) -> Self {
        PipelineError::Project(err)
    }
}

impl From<XlsxWriteError> for PipelineError {
    fn from(err: XlsxWriteError) -> Self {
        PipelineError::Export(err)
    }
}

impl PipelineError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Read(_) => N_EXIT_READ_ERROR,
            PipelineError::Project(_)
            | PipelineError::Export(_)
            | PipelineError::WriteOutput { .. } => N_EXIT_WRITE_ERROR,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
