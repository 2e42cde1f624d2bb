use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{debug, trace};

use crate::error::{ModelError, Result};

/// A CSV file loaded with every column as text.
///
/// Typed access parses on demand so that a bad cell is reported against the
/// table it came from instead of surfacing as a schema inference failure.
pub(crate) struct CsvTable {
    name: &'static str,
    path: PathBuf,
    frame: DataFrame,
}

impl CsvTable {
    pub(crate) fn read(name: &'static str, path: &Path) -> Result<Self> {
        trace!("Reading table {} from {}", name, path.display());
        if !path.is_file() {
            return Err(ModelError::DataSourceNotFound(path.to_path_buf()));
        }

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        debug!(
            "Loaded table {} with {} rows and columns {:?}",
            name,
            frame.height(),
            frame.get_column_names()
        );

        Ok(Self {
            name,
            path: path.to_path_buf(),
            frame,
        })
    }

    pub(crate) fn has_column(&self, column: &str) -> bool {
        self.frame
            .get_column_names()
            .iter()
            .any(|name| name.as_str() == column)
    }

    /// Fails with the first column of `columns` that is not present.
    pub(crate) fn require_columns(&self, columns: &[&str]) -> Result<()> {
        match columns.iter().find(|column| !self.has_column(column)) {
            Some(missing) => Err(ModelError::MissingReferenceData {
                table: self.path.display().to_string(),
                column: (*missing).to_string(),
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn text_column(&self, column: &str) -> Result<Vec<String>> {
        let series = self.series(column)?.cast(&DataType::String)?;
        let values = series
            .str()?
            .into_iter()
            .map(|value| value.unwrap_or_default().to_string())
            .collect();
        Ok(values)
    }

    /// Parses `column` as floats; NaN and infinities are rejected like text.
    pub(crate) fn float_column(&self, column: &str) -> Result<Vec<f64>> {
        let series = self.series(column)?.cast(&DataType::Float64)?;
        series
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| match value {
                Some(value) if value.is_finite() => Ok(value),
                Some(_) => Err(self.invalid(format!(
                    "row {}: column '{}' is not a finite number",
                    row + 1,
                    column
                ))),
                None => Err(self.not_numeric(column, row)),
            })
            .collect()
    }

    pub(crate) fn int_column(&self, column: &str) -> Result<Vec<i64>> {
        let series = self.series(column)?.cast(&DataType::Int64)?;
        series
            .i64()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| value.ok_or_else(|| self.not_numeric(column, row)))
            .collect()
    }

    pub(crate) fn invalid(&self, reason: String) -> ModelError {
        ModelError::InvalidReferenceData {
            table: self.name.to_string(),
            reason,
        }
    }

    fn series(&self, column: &str) -> Result<&Series> {
        self.require_columns(&[column])?;
        Ok(self.frame.column(column)?.as_materialized_series())
    }

    fn not_numeric(&self, column: &str, row: usize) -> ModelError {
        self.invalid(format!(
            "row {}: column '{}' is empty or not numeric",
            row + 1,
            column
        ))
    }
}
