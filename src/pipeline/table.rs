//! The in-memory table shared by every analysis stage

use polars::prelude::*;

use super::error::{Branch, EdaError, EdaResult};
use super::schema::{ColumnKind, Schema};

/// An immutable, classified table.
///
/// Wraps the parsed `DataFrame` together with the schema that was derived
/// from it. Nothing mutates a `Table` after construction.
#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
    schema: Schema,
}

impl Table {
    /// Build a table and classify its columns.
    pub fn new(frame: DataFrame) -> Self {
        let schema = Schema::classify(&frame);
        Self { frame, schema }
    }

    /// Build a table with an explicit schema.
    ///
    /// The schema must list exactly the frame's columns, in order.
    pub fn with_schema(frame: DataFrame, schema: Schema) -> EdaResult<Self> {
        let frame_names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let schema_names: Vec<&str> = schema.columns().iter().map(|c| c.name.as_str()).collect();

        if let Some(extra) = schema_names.iter().find(|n| !frame_names.iter().any(|f| f == *n)) {
            return Err(EdaError::UnknownColumn(extra.to_string()));
        }
        if let Some(unlisted) = frame_names.iter().find(|f| !schema_names.contains(&f.as_str())) {
            return Err(EdaError::UnknownColumn(unlisted.clone()));
        }
        if let Some((position, (expected, found))) = frame_names
            .iter()
            .zip(&schema_names)
            .enumerate()
            .find(|(_, (f, s))| f.as_str() != **s)
        {
            return Err(EdaError::ColumnOrder {
                position,
                expected: expected.clone(),
                found: found.to_string(),
            });
        }

        Ok(Self { frame, schema })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.columns().iter().map(|c| c.name.clone()).collect()
    }

    pub fn numeric_columns(&self) -> Vec<String> {
        self.schema.numeric_columns()
    }

    pub fn categorical_columns(&self) -> Vec<String> {
        self.schema.categorical_columns()
    }

    /// Estimated in-memory size in megabytes.
    pub fn memory_mb(&self) -> f64 {
        self.frame.estimated_size() as f64 / (1024.0 * 1024.0)
    }

    fn column(&self, name: &str) -> EdaResult<&Column> {
        self.frame
            .column(name)
            .map_err(|_| EdaError::UnknownColumn(name.to_string()))
    }

    /// Fail unless `name` exists and is of the kind a branch expects.
    pub fn require_kind(&self, name: &str, branch: Branch) -> EdaResult<()> {
        let expected = match branch {
            Branch::Numeric => ColumnKind::Numeric,
            Branch::Categorical => ColumnKind::Categorical,
        };
        match self.schema.kind_of(name) {
            None => Err(EdaError::UnknownColumn(name.to_string())),
            Some(kind) if kind != expected => Err(EdaError::WrongKind {
                column: name.to_string(),
                expected: branch,
            }),
            Some(_) => Ok(()),
        }
    }

    /// Values of a column as `f64`, `None` where missing or unparseable.
    pub fn numeric_values(&self, name: &str) -> EdaResult<Vec<Option<f64>>> {
        let column = self.column(name)?.cast(&DataType::Float64)?;
        let values = column.f64()?.into_iter().collect();
        Ok(values)
    }

    /// Values of a column rendered as strings, `None` where missing.
    pub fn category_values(&self, name: &str) -> EdaResult<Vec<Option<String>>> {
        let column = self.column(name)?.cast(&DataType::String)?;
        let values = column
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        Ok(values)
    }

    /// Missing flag per row for a column.
    pub fn null_mask(&self, name: &str) -> EdaResult<Vec<bool>> {
        let column = self.column(name)?;
        let mask = column.as_materialized_series().is_null();
        Ok(mask.into_iter().map(|v| v.unwrap_or(true)).collect())
    }
}
