//! Column classification
//!
//! Every column is classified once, right after loading, as numeric or
//! categorical. Downstream stages only consult the resulting [`Schema`],
//! never the physical dtype, so a schema built by hand drives them the
//! same way as one inferred from a CSV file.

use polars::prelude::*;
use serde::Serialize;

/// Analytical kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Schema entry for a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSchema {
    pub name: String,
    pub kind: ColumnKind,
    /// Physical dtype as reported by polars (e.g. `i64`, `str`).
    pub dtype: String,
    pub non_null: usize,
}

/// Typed schema of a table, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    columns: Vec<ColumnSchema>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnSchema>) -> Self {
        Self { columns }
    }

    /// Classify every column of a frame.
    ///
    /// Primitive numeric dtypes (integers and floats) are numeric; strings,
    /// booleans and temporal types are categorical.
    pub fn classify(df: &DataFrame) -> Self {
        let columns = df
            .get_columns()
            .iter()
            .map(|col| ColumnSchema {
                name: col.name().to_string(),
                kind: classify_dtype(col.dtype()),
                dtype: col.dtype().to_string(),
                non_null: col.len() - col.null_count(),
            })
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.get(name).map(|c| c.kind)
    }

    /// Names of all columns of the given kind, in column order.
    pub fn names_of_kind(&self, kind: ColumnKind) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn numeric_columns(&self) -> Vec<String> {
        self.names_of_kind(ColumnKind::Numeric)
    }

    pub fn categorical_columns(&self) -> Vec<String> {
        self.names_of_kind(ColumnKind::Categorical)
    }
}

/// Map a polars dtype onto an analytical kind.
pub fn classify_dtype(dtype: &DataType) -> ColumnKind {
    if dtype.is_primitive_numeric() {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}
