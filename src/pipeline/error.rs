//! Error types for the analysis pipeline.
//!
//! A `ParseError` halts processing of an upload. Every other variant is
//! scoped to a single dashboard branch and is rendered inline in place of
//! that branch's output.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Why an uploaded file could not be turned into a table.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The upload contained no bytes (or only whitespace).
    #[error("the uploaded file is empty")]
    Empty,

    /// The upload is not valid UTF-8 text.
    #[error("the uploaded file is not valid UTF-8 (invalid byte at offset {offset})")]
    Encoding { offset: usize },

    /// The CSV reader rejected the content.
    #[error("malformed CSV: {0}")]
    Malformed(String),

    /// The file could not be read from disk.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Dashboard branch that requires a user selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    Numeric,
    Categorical,
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Numeric => write!(f, "numeric"),
            Branch::Categorical => write!(f, "categorical"),
        }
    }
}

/// The main error type for the analysis pipeline.
#[derive(Error, Debug)]
pub enum EdaError {
    /// The upload could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A branch was asked to render without a column selection.
    #[error("no {0} column selected")]
    EmptySelection(Branch),

    /// Not enough numeric columns for pairwise analysis.
    #[error("the data needs at least {required} numeric columns for this analysis, found {found}")]
    InsufficientColumns { required: usize, found: usize },

    /// A selection named a column the table does not have.
    #[error("column '{0}' not found in dataset")]
    UnknownColumn(String),

    /// An explicit schema lists the table's columns in a different order.
    #[error("schema lists '{found}' at position {position} where the table has '{expected}'")]
    ColumnOrder {
        position: usize,
        expected: String,
        found: String,
    },

    /// A selection named a column of the wrong kind.
    #[error("column '{column}' is not a {expected} column")]
    WrongKind { column: String, expected: Branch },

    /// An error bubbled up from polars.
    #[error("polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

impl EdaError {
    /// Whether this error means "render nothing" rather than "render a message".
    pub fn is_empty_selection(&self) -> bool {
        matches!(self, EdaError::EmptySelection(_))
    }
}

pub type EdaResult<T> = std::result::Result<T, EdaError>;
