//! Read → filter → reconcile → project → export, for one invocation.

use std::io::Read;
use std::path::Path;

use casekit_io_xlsx::{
    SpecXlsxWriteOptions, XlsxReadError, export_dataset, read_ipc_bytes, read_workbook_bytes,
    read_workbook_path,
};
use casekit_table::{Dataset, SpecProjectionOptions, SpecSelections, project_dataset};

use crate::spec::{EnumInputKind, EnumInputSource, PipelineError, SpecInvocationResult};

/// Load the input table.
pub fn load_dataset(source: &EnumInputSource) -> Result<Dataset, PipelineError> {
    let dataset = match (source, source.kind()) {
        (EnumInputSource::Stdin, _) => {
            let mut v_bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut v_bytes)
                .map_err(XlsxReadError::unreadable)?;
            log::debug!("Read {} bytes from stdin", v_bytes.len());
            read_workbook_bytes(&v_bytes)?.dataset
        }
        (EnumInputSource::Path(path), EnumInputKind::Ipc) => {
            let v_bytes = std::fs::read(path).map_err(XlsxReadError::unreadable)?;
            read_ipc_bytes(&v_bytes)?
        }
        (EnumInputSource::Path(path), EnumInputKind::Workbook) => {
            read_workbook_path(path)?.dataset
        }
    };
    Ok(dataset)
}

/// Project an already loaded table and serialize the result.
pub fn process_dataset(
    dataset: Dataset,
    options: &SpecProjectionOptions,
    selections: &SpecSelections,
    write_options: &SpecXlsxWriteOptions,
) -> Result<SpecInvocationResult, PipelineError> {
    let dataset_original = dataset.clone();
    let projection = project_dataset(dataset, options, selections)?;
    log::info!("{}", projection.report);

    let export = export_dataset(&projection.dataset, write_options)?;
    Ok(SpecInvocationResult {
        dataset_original,
        projection,
        export,
    })
}

/// Load, project and export in one call.
pub fn run_invocation(
    source: &EnumInputSource,
    options: &SpecProjectionOptions,
    selections: &SpecSelections,
    write_options: &SpecXlsxWriteOptions,
) -> Result<SpecInvocationResult, PipelineError> {
    let dataset = load_dataset(source)?;
    process_dataset(dataset, options, selections, write_options)
}

/// Write export bytes to `path`.
pub fn write_export(bytes: &[u8], path: &Path) -> Result<(), PipelineError> {
    std::fs::write(path, bytes).map_err(|cause| PipelineError::WriteOutput {
        path: path.to_path_buf(),
        cause,
    })?;
    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
