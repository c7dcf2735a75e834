//! Schema-described in-memory table.

use std::collections::{BTreeMap, BTreeSet};

use crate::spec::{DatasetError, EnumCellValue};

/// Ordered named columns with positionally aligned rows.
///
/// Column names are unique and every column holds exactly `height()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    values_by_col: Vec<Vec<EnumCellValue>>,
    n_height: usize,
}

impl Dataset {
    /// Build from `(name, values)` pairs.
    pub fn new(columns: Vec<(String, Vec<EnumCellValue>)>) -> Result<Self, DatasetError> {
        let n_height = columns.first().map_or(0, |(_, values)| values.len());
        let (l_colnames, values_by_col): (Vec<String>, Vec<Vec<EnumCellValue>>) =
            columns.into_iter().unzip();

        validate_unique_columns(&l_colnames)?;
        for (c_name, values) in l_colnames.iter().zip(&values_by_col) {
            if values.len() != n_height {
                return Err(DatasetError::RaggedColumn {
                    column: c_name.clone(),
                    n_len: values.len(),
                    n_expected: n_height,
                });
            }
        }

        Ok(Self {
            columns: l_colnames,
            values_by_col,
            n_height,
        })
    }

    /// Build from a header and row-major cells.
    pub fn from_rows(
        columns: Vec<String>,
        rows: Vec<Vec<EnumCellValue>>,
    ) -> Result<Self, DatasetError> {
        validate_unique_columns(&columns)?;

        let n_width = columns.len();
        let n_height = rows.len();
        let mut values_by_col: Vec<Vec<EnumCellValue>> =
            (0..n_width).map(|_| Vec::with_capacity(n_height)).collect();

        for (n_idx_row, row) in rows.into_iter().enumerate() {
            if row.len() != n_width {
                return Err(DatasetError::RaggedRow {
                    n_idx_row,
                    n_len: row.len(),
                    n_expected: n_width,
                });
            }
            for (values, cell) in values_by_col.iter_mut().zip(row) {
                values.push(cell);
            }
        }

        Ok(Self {
            columns,
            values_by_col,
            n_height,
        })
    }

    /// Ordered column names.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.n_height
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_height == 0
    }

    /// Position of `name` in the schema.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c_name| c_name == name)
    }

    /// Whether `name` is part of the schema.
    pub fn contains_column(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Cells of column `name`.
    pub fn column(&self, name: &str) -> Option<&[EnumCellValue]> {
        self.index_of(name).and_then(|n_idx| self.column_at(n_idx))
    }

    /// Cells of the column at `n_idx`.
    pub fn column_at(&self, n_idx: usize) -> Option<&[EnumCellValue]> {
        self.values_by_col.get(n_idx).map(Vec::as_slice)
    }

    /// Cell at (`n_idx_row`, `name`).
    pub fn get(&self, n_idx_row: usize, name: &str) -> Option<&EnumCellValue> {
        self.column(name).and_then(|values| values.get(n_idx_row))
    }

    /// Borrowed cells of one row, in column order.
    pub fn row(&self, n_idx_row: usize) -> Option<Vec<&EnumCellValue>> {
        if n_idx_row >= self.n_height {
            return None;
        }
        Some(
            self.values_by_col
                .iter()
                .map(|values| &values[n_idx_row])
                .collect(),
        )
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&EnumCellValue>> + '_ {
        (0..self.n_height).filter_map(move |n_idx_row| self.row(n_idx_row))
    }

    /// New table holding the rows at `indices`, in the given order.
    ///
    /// Out-of-range indices are skipped.
    pub fn take_rows(&self, indices: &[usize]) -> Dataset {
        let l_indices: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|n_idx| *n_idx < self.n_height)
            .collect();

        Dataset {
            columns: self.columns.clone(),
            values_by_col: self
                .values_by_col
                .iter()
                .map(|values| l_indices.iter().map(|n_idx| values[*n_idx].clone()).collect())
                .collect(),
            n_height: l_indices.len(),
        }
    }

    /// New table holding exactly `names`, in the given order, all rows kept.
    pub fn select_columns(&self, names: &[String]) -> Result<Dataset, DatasetError> {
        validate_unique_columns(names)?;

        let mut values_by_col = Vec::with_capacity(names.len());
        for c_name in names {
            let values = self
                .column(c_name)
                .ok_or_else(|| DatasetError::ColumnNotFound(c_name.clone()))?;
            values_by_col.push(values.to_vec());
        }

        Ok(Dataset {
            columns: names.to_vec(),
            values_by_col,
            n_height: self.n_height,
        })
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Dataset {
        let n_take = usize::min(n, self.n_height);
        Dataset {
            columns: self.columns.clone(),
            values_by_col: self
                .values_by_col
                .iter()
                .map(|values| values[..n_take].to_vec())
                .collect(),
            n_height: n_take,
        }
    }
}

/// Validate that `columns` has no duplicated names.
pub fn validate_unique_columns(columns: &[String]) -> Result<(), DatasetError> {
    if columns.len() == columns.iter().collect::<BTreeSet<_>>().len() {
        return Ok(());
    }

    let mut dict_pos: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (n_idx, c_name) in columns.iter().enumerate() {
        dict_pos.entry(c_name).or_default().push(n_idx);
    }

    let c_msg = dict_pos
        .iter()
        .filter(|(_, l_pos)| l_pos.len() > 1)
        .map(|(c_name, l_pos)| format!("{c_name:?} x{} at indices {:?}", l_pos.len(), l_pos))
        .collect::<Vec<_>>()
        .join("; ");

    Err(DatasetError::DuplicateColumns(c_msg))
}
