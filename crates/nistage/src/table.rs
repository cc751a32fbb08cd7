//! The filepath table
//!
//! An owned rows-and-columns structure holding one row per discovered
//! file. The column set only grows across the enrichment pipeline (each
//! stage adds columns, never removes) and absent cells stay absent rather
//! than turning into empty strings.
//!
//! Tables are caller-owned values: no global cache, no shared state
//! between invocations.

use crate::error::{NistageError, Result};
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;

/// Canonical name of the path column every table carries.
pub const PATH_COLUMN: &str = "path";

/// Ordered collection of file records with a uniform column set.
#[derive(Debug, Clone, Default)]
pub struct FilepathTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl FilepathTable {
    /// Create an empty table with the given column set.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| NistageError::MissingColumn(name.to_string()))
    }

    /// Append a row. The row must be as wide as the column set, and if the
    /// table carries a path column the path cell must be non-empty.
    pub fn push_row(&mut self, row: Vec<Option<String>>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(NistageError::Config(format!(
                "row has {} cells but the table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        if let Some(idx) = self.column_index(PATH_COLUMN) {
            if row[idx].as_deref().map_or(true, |p| p.is_empty()) {
                return Err(NistageError::Config(
                    "every row needs a non-empty path".to_string(),
                ));
            }
        }
        self.rows.push(row);
        Ok(())
    }

    /// Add a new column with one value per existing row.
    ///
    /// Columns are add-only; reusing an existing name is a config error,
    /// as is a value set that does not line up with the rows.
    pub fn add_column<S: Into<String>>(
        &mut self,
        name: S,
        values: Vec<Option<String>>,
    ) -> Result<()> {
        let name = name.into();
        if self.column_index(&name).is_some() {
            return Err(NistageError::Config(format!(
                "column '{name}' already exists"
            )));
        }
        if values.len() != self.rows.len() {
            return Err(NistageError::Config(format!(
                "column '{name}' has {} values for {} rows",
                values.len(),
                self.rows.len()
            )));
        }
        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Cell by row index and column index. `None` for absent values and
    /// out-of-range rows alike.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|v| v.as_deref())
    }

    /// Cell by row index and column name; the column must exist.
    pub fn value(&self, row: usize, column: &str) -> Result<Option<&str>> {
        let idx = self.require_column(column)?;
        Ok(self.cell(row, idx))
    }

    /// All values of one column, row order preserved.
    pub fn column_values(&self, name: &str) -> Result<Vec<Option<&str>>> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|r| r[idx].as_deref()).collect())
    }

    /// Iterate rows as cell slices.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<String>]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Write the table as delimited text. Absent cells become empty
    /// fields.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(row.iter().map(|v| v.as_deref().unwrap_or("")))?;
        }
        csv_writer.flush().map_err(NistageError::Io)?;
        Ok(())
    }

    /// Export the table to a CSV file.
    pub fn to_csv_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }

    /// Table as a JSON array of row objects. Absent cells become null.
    pub fn to_json(&self) -> Value {
        let rows: Vec<Value> = self
            .rows
            .iter()
            .map(|row| {
                let object: serde_json::Map<String, Value> = self
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(name, value)| {
                        let cell = match value {
                            Some(v) => json!(v),
                            None => Value::Null,
                        };
                        (name.clone(), cell)
                    })
                    .collect();
                Value::Object(object)
            })
            .collect();
        Value::Array(rows)
    }
}
