//! Polars DataFrame and Arrow IPC input.

use std::io::Cursor;

use casekit_table::{Dataset, EnumCellValue};
use polars::prelude::{DataFrame, DataType, IpcReader, PolarsResult, SerReader, Series};

use crate::spec::XlsxReadError;

/// Decode an Arrow IPC (Feather v2) payload into a [`Dataset`].
pub fn read_ipc_bytes(bytes: &[u8]) -> Result<Dataset, XlsxReadError> {
    let df = IpcReader::new(Cursor::new(bytes))
        .finish()
        .map_err(|err| XlsxReadError::unreadable(format!("Failed to read IPC bytes: {err}")))?;
    dataset_from_dataframe(&df)
}

/// Convert a DataFrame column by column.
///
/// Booleans and strings keep their type, numeric columns become numbers, and
/// anything else is rendered as text.
pub fn dataset_from_dataframe(df: &DataFrame) -> Result<Dataset, XlsxReadError> {
    let mut l_columns = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let values = derive_cell_values_from_series(series).map_err(|err| {
            XlsxReadError::unreadable(format!("Column {:?}: {err}", series.name()))
        })?;
        l_columns.push((series.name().to_string(), values));
    }

    Ok(Dataset::new(l_columns)?)
}

fn derive_cell_values_from_series(series: &Series) -> PolarsResult<Vec<EnumCellValue>> {
    let dtype = series.dtype();
    if matches!(dtype, DataType::Boolean) {
        return Ok(series
            .bool()?
            .into_iter()
            .map(|val| val.map_or(EnumCellValue::None, EnumCellValue::Boolean))
            .collect());
    }
    if dtype.is_numeric() {
        let series_f64 = series.cast(&DataType::Float64)?;
        return Ok(series_f64
            .f64()?
            .into_iter()
            .map(|val| val.map_or(EnumCellValue::None, EnumCellValue::Number))
            .collect());
    }

    let series_str = if matches!(dtype, DataType::String) {
        series.clone()
    } else {
        series.cast(&DataType::String)?
    };
    Ok(series_str
        .str()?
        .into_iter()
        .map(|val| val.map_or(EnumCellValue::None, EnumCellValue::from))
        .collect())
}

#[cfg(test)]
mod tests {
    use polars::df;
    use polars::prelude::{IpcWriter, SerWriter};

    use super::*;

    #[test]
    fn test_dataset_from_dataframe_keeps_types() {
        let df = df!(
            "caseId" => [Some("C-1"), None],
            "rubix_Score" => [Some(3i64), Some(4)],
            "ratio" => [Some(0.5f64), None],
            "flag" => [Some(true), Some(false)],
        )
        .unwrap();

        let ds = dataset_from_dataframe(&df).unwrap();
        assert_eq!(ds.column_names(), ["caseId", "rubix_Score", "ratio", "flag"]);
        assert_eq!(ds.get(0, "caseId"), Some(&EnumCellValue::from("C-1")));
        assert_eq!(ds.get(1, "caseId"), Some(&EnumCellValue::None));
        assert_eq!(ds.get(1, "rubix_Score"), Some(&EnumCellValue::Number(4.0)));
        assert_eq!(ds.get(1, "ratio"), Some(&EnumCellValue::None));
        assert_eq!(ds.get(1, "flag"), Some(&EnumCellValue::Boolean(false)));
    }

    #[test]
    fn test_read_ipc_bytes() {
        let mut df = df!(
            "case type" => ["Domestic", "International"],
            "caseId" => ["C-1", "C-2"],
        )
        .unwrap();
        let mut v_bytes: Vec<u8> = Vec::new();
        IpcWriter::new(&mut v_bytes).finish(&mut df).unwrap();

        let ds = read_ipc_bytes(&v_bytes).unwrap();
        assert_eq!(ds.height(), 2);
        assert_eq!(ds.get(1, "case type"), Some(&EnumCellValue::from("International")));
    }

    #[test]
    fn test_read_ipc_bytes_rejects_garbage() {
        assert!(matches!(
            read_ipc_bytes(b"nope"),
            Err(XlsxReadError::UnreadableFile { .. })
        ));
    }
}
