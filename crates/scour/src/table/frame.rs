//! Column-oriented in-memory table.

use indexmap::IndexMap;

use crate::error::{Result, ScourError};

use super::value::{ColumnType, Value};

/// A mutable, column-oriented table with named columns in a fixed order.
///
/// `Clone` is a deep copy; the rule engine relies on that to leave the
/// caller's table untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: IndexMap<String, Vec<Value>>,
}

impl Table {
    /// Create an empty table (no rows, no columns).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from named columns of equal length.
    pub fn from_columns<N, V>(columns: impl IntoIterator<Item = (N, Vec<V>)>) -> Result<Self>
    where
        N: Into<String>,
        V: Into<Value>,
    {
        let mut table = Self::new();
        for (name, values) in columns {
            table.insert_column(name, values.into_iter().map(Into::into).collect())?;
        }
        Ok(table)
    }

    /// Build a table from a header row and row-major values.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); headers.len()];
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != headers.len() {
                return Err(ScourError::ShapeMismatch {
                    column: format!("row {row_idx}"),
                    expected: headers.len(),
                    actual: row.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }
        Self::from_columns(headers.into_iter().zip(columns))
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.columns.values().next().map_or(0, Vec::len)
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// True when the table has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Check whether a column exists.
    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Iterate over `(name, values)` pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Derived data type of a column.
    pub fn dtype(&self, name: &str) -> Option<ColumnType> {
        self.column(name).map(ColumnType::of)
    }

    /// Insert a column, replacing any column with the same name in place.
    ///
    /// New columns are appended. The first column of an empty table fixes
    /// the row count.
    pub fn insert_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let name = name.into();
        let replacing_only_column = self.column_count() == 1 && self.columns.contains_key(&name);
        if self.column_count() > 0 && !replacing_only_column && values.len() != self.row_count() {
            return Err(ScourError::ShapeMismatch {
                column: name,
                expected: self.row_count(),
                actual: values.len(),
            });
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.columns.get(column).and_then(|c| c.get(row))
    }

    /// One row as values in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        if index >= self.row_count() {
            return None;
        }
        Some(self.columns.values().map(|c| &c[index]).collect())
    }

    /// Copy of the rows at the given indices, in that order.
    pub fn take_rows(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| {
                let picked = indices.iter().filter_map(|&i| values.get(i).cloned()).collect();
                (name.clone(), picked)
            })
            .collect();
        Table { columns }
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Table {
        let indices: Vec<usize> = (0..n.min(self.row_count())).collect();
        self.take_rows(&indices)
    }

    /// Deterministic random sample of `n` rows without replacement.
    ///
    /// Returns a copy of the whole table when `n` is not smaller than the
    /// row count.
    pub fn sample(&self, n: usize, seed: u64) -> Table {
        let total = self.row_count();
        if n >= total {
            return self.clone();
        }
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut indices: Vec<usize> = (0..total).collect();
        // Partial Fisher-Yates: the first n slots become the sample.
        for i in 0..n {
            let j = rng.usize(i..total);
            indices.swap(i, j);
        }
        indices.truncate(n);
        self.take_rows(&indices)
    }

    /// Render the table as a markdown table (used in generator prompts).
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let names: Vec<&str> = self.column_names().collect();
        out.push_str("| ");
        out.push_str(&names.join(" | "));
        out.push_str(" |\n|");
        for _ in &names {
            out.push_str("---|");
        }
        out.push('\n');
        for row in 0..self.row_count() {
            let cells: Vec<String> = self
                .columns
                .values()
                .map(|c| c[row].to_text().replace('|', "\\|"))
                .collect();
            out.push_str("| ");
            out.push_str(&cells.join(" | "));
            out.push_str(" |\n");
        }
        out
    }
}
