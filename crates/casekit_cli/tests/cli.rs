// End-to-end tests for the `casekit` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use casekit_io_xlsx::{SpecXlsxWriteOptions, export_dataset, read_workbook_path};
use casekit_table::{Dataset, EnumCellValue, TUP_COLUMNS_REQUIRED};

fn casekit(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_casekit"));
    cmd.current_dir(dir)
        .env_remove("CASEKIT_OUTPUT")
        .env_remove("CASEKIT_CASE_TYPE")
        .env_remove("CASEKIT_LOG");
    cmd
}

fn build_dataset(if_with_case_type: bool) -> Dataset {
    let mut l_columns: Vec<(String, Vec<EnumCellValue>)> = TUP_COLUMNS_REQUIRED
        .iter()
        .map(|c_name| {
            (
                c_name.to_string(),
                (0..3)
                    .map(|n_idx| EnumCellValue::String(format!("{c_name}-{n_idx}")))
                    .collect(),
            )
        })
        .collect();
    if if_with_case_type {
        l_columns.push((
            "case type".to_string(),
            vec!["Domestic".into(), "domestic".into(), "International".into()],
        ));
    }
    l_columns.push((
        "region".to_string(),
        vec!["north".into(), "south".into(), "east".into()],
    ));
    Dataset::new(l_columns).unwrap()
}

fn write_input(dir: &Path, dataset: &Dataset) -> PathBuf {
    let export = export_dataset(dataset, &SpecXlsxWriteOptions::default()).unwrap();
    let path = dir.join("cases.xlsx");
    std::fs::write(&path, export.bytes).unwrap();
    path
}

fn assert_exit(output: &Output, n_code: i32) {
    assert_eq!(
        output.status.code(),
        Some(n_code),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn filters_and_writes_default_output() {
    let dir = tempfile::tempdir().unwrap();
    let path_input = write_input(dir.path(), &build_dataset(true));

    let output = casekit(dir.path())
        .arg(&path_input)
        .args(["--extra", "region"])
        .output()
        .unwrap();
    assert_exit(&output, 0);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Original data preview:"));
    assert!(stdout.contains("Filtered result (Domestic):"));
    assert!(stdout.contains("(2 of 2 rows)"));

    let read = read_workbook_path(&dir.path().join("filtered_data.xlsx")).unwrap();
    assert_eq!(read.sheet_name, "Filtered");
    assert_eq!(read.dataset.height(), 2);
    assert_eq!(read.dataset.column_names()[6], "region");
    assert!(!read.dataset.contains_column("case type"));
}

#[test]
fn case_type_from_env_and_custom_output() {
    let dir = tempfile::tempdir().unwrap();
    let path_input = write_input(dir.path(), &build_dataset(true));
    let path_output = dir.path().join("all.xlsx");

    let output = casekit(dir.path())
        .arg(&path_input)
        .arg("--output")
        .arg(&path_output)
        .env("CASEKIT_CASE_TYPE", "Both")
        .output()
        .unwrap();
    assert_exit(&output, 0);

    let read = read_workbook_path(&path_output).unwrap();
    assert_eq!(read.dataset.height(), 3);
    assert_eq!(read.dataset.width(), 6);
}

#[test]
fn missing_case_type_column_warns_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    let path_input = write_input(dir.path(), &build_dataset(false));

    let output = casekit(dir.path()).arg(&path_input).output().unwrap();
    assert_exit(&output, 0);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr
            .matches("'case type' column not found. Skipping filter.")
            .count(),
        1
    );

    let read = read_workbook_path(&dir.path().join("filtered_data.xlsx")).unwrap();
    assert_eq!(read.dataset.height(), 3);
}

#[test]
fn list_columns_prints_selectable_extras() {
    let dir = tempfile::tempdir().unwrap();
    let path_input = write_input(dir.path(), &build_dataset(true));

    let output = casekit(dir.path())
        .arg(&path_input)
        .arg("--list-columns")
        .output()
        .unwrap();
    assert_exit(&output, 0);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "case type\nregion\n");
    assert!(!dir.path().join("filtered_data.xlsx").exists());
}

#[test]
fn garbage_input_exits_with_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path_input = dir.path().join("broken.xlsx");
    std::fs::write(&path_input, b"this is not a spreadsheet").unwrap();

    let output = casekit(dir.path()).arg(&path_input).output().unwrap();
    assert_exit(&output, 1);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error reading file:"));
}

#[test]
fn unknown_case_type_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path_input = write_input(dir.path(), &build_dataset(true));

    let output = casekit(dir.path())
        .arg(&path_input)
        .args(["--case-type", "offshore"])
        .output()
        .unwrap();
    assert_exit(&output, 2);
}

#[test]
fn unwritable_output_exits_with_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let path_input = write_input(dir.path(), &build_dataset(true));

    let output = casekit(dir.path())
        .arg(&path_input)
        .arg("--output")
        .arg(dir.path().join("missing/dir/out.xlsx"))
        .output()
        .unwrap();
    assert_exit(&output, 3);
}
