use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use casekit_cli::{
    C_ENV_CASE_TYPE, C_ENV_OUTPUT, EnumInputSource, N_EXIT_SUCCESS, N_EXIT_WRITE_ERROR,
    N_ROWS_PREVIEW_DEFAULT, N_WIDTH_PREVIEW_CELL_MAX, PipelineError, load_dataset,
    process_dataset, render_preview, write_export,
};
use casekit_io_xlsx::{C_FILE_NAME_EXPORT, derive_default_xlsx_write_options};
use casekit_table::{
    EnumCaseType, SpecSelections, derive_default_projection_options, select_selectable_columns,
};
use clap::{ArgAction, Parser};

/// Filter a case spreadsheet by case type and export the fixed columns plus chosen extras.
#[derive(Debug, Parser)]
#[command(name = "casekit", version)]
struct Cli {
    /// Input spreadsheet (xlsx, xlsm, xlsb, xls, ods) or Arrow IPC file; `-` reads stdin
    input: String,

    /// Case type to keep: domestic, international or both
    #[arg(long, env = C_ENV_CASE_TYPE, default_value = "domestic")]
    case_type: EnumCaseType,

    /// Extra column to include after the fixed ones (repeatable)
    #[arg(long = "extra", value_name = "COL")]
    columns_extra: Vec<String>,

    /// Output workbook path
    #[arg(short, long, env = C_ENV_OUTPUT, default_value = C_FILE_NAME_EXPORT)]
    output: PathBuf,

    /// Rows shown in each preview
    #[arg(long, default_value_t = N_ROWS_PREVIEW_DEFAULT)]
    preview_rows: usize,

    /// Print the columns selectable as extras and exit
    #[arg(long)]
    list_columns: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    casekit_log::init_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::from(N_EXIT_SUCCESS),
        Err(err) => {
            eprintln!("{err:#}");
            let n_code = err
                .downcast_ref::<PipelineError>()
                .map_or(N_EXIT_WRITE_ERROR, PipelineError::exit_code);
            ExitCode::from(n_code)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let source = EnumInputSource::from_arg(&cli.input);
    let options = derive_default_projection_options();
    let dataset = load_dataset(&source)?;

    if cli.list_columns {
        for c_name in select_selectable_columns(&dataset, &options.columns_required) {
            println!("{c_name}");
        }
        return Ok(());
    }

    let selections = SpecSelections {
        case_type: cli.case_type,
        columns_extra: cli.columns_extra.clone(),
    };
    let result = process_dataset(
        dataset,
        &options,
        &selections,
        &derive_default_xlsx_write_options(),
    )?;

    println!("Original data preview:");
    print!(
        "{}",
        render_preview(&result.dataset_original, cli.preview_rows, N_WIDTH_PREVIEW_CELL_MAX)
    );
    println!();
    println!("Filtered result ({}):", selections.case_type);
    print!(
        "{}",
        render_preview(&result.projection.dataset, cli.preview_rows, N_WIDTH_PREVIEW_CELL_MAX)
    );

    write_export(&result.export.bytes, &cli.output)
        .with_context(|| format!("Could not save {}", result.export.file_name))?;
    println!(
        "Saved {} rows x {} columns to {}",
        result.projection.dataset.height(),
        result.projection.dataset.width(),
        cli.output.display()
    );
    Ok(())
}
