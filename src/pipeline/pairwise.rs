//! Pairwise grid over numeric columns and the multicollinearity flag

use serde::Serialize;
use tracing::debug;

use super::correlation::{correlation_matrix, CorrelationMatrix, HIGH_CORRELATION_THRESHOLD};
use super::error::{EdaError, EdaResult};
use super::table::Table;

/// Numeric columns restricted to rows without any missing or infinite
/// numeric value.
#[derive(Debug, Clone, Serialize)]
pub struct PairGrid {
    pub columns: Vec<String>,
    /// Complete-row values, one vector per column.
    pub data: Vec<Vec<f64>>,
    pub rows_used: usize,
    pub rows_dropped: usize,
}

impl PairGrid {
    /// `(x, y)` points for the scatter cell at (`row`, `col`).
    pub fn scatter(&self, row: usize, col: usize) -> Vec<(f64, f64)> {
        self.data[col]
            .iter()
            .copied()
            .zip(self.data[row].iter().copied())
            .collect()
    }
}

/// Build the pairwise grid; needs at least two numeric columns.
pub fn pair_grid(table: &Table) -> EdaResult<PairGrid> {
    let columns = table.numeric_columns();
    if columns.len() < 2 {
        return Err(EdaError::InsufficientColumns {
            required: 2,
            found: columns.len(),
        });
    }

    let raw = columns
        .iter()
        .map(|name| table.numeric_values(name))
        .collect::<EdaResult<Vec<_>>>()?;

    let complete: Vec<usize> = (0..table.height())
        .filter(|&row| raw.iter().all(|col| col[row].is_some_and(f64::is_finite)))
        .collect();

    let data = raw
        .iter()
        .map(|col| complete.iter().filter_map(|&row| col[row]).collect())
        .collect();

    Ok(PairGrid {
        columns,
        data,
        rows_used: complete.len(),
        rows_dropped: table.height() - complete.len(),
    })
}

/// Pairwise grid plus the columns flagged as likely multicollinear.
#[derive(Debug, Clone, Serialize)]
pub struct PairwiseReport {
    pub grid: PairGrid,
    pub abs_correlation: CorrelationMatrix,
    pub threshold: f64,
    pub multicollinear: Vec<String>,
}

impl PairwiseReport {
    pub fn multicollinearity_text(&self) -> String {
        if self.multicollinear.is_empty() {
            "No indication of high multicollinearity was found among the numeric columns."
                .to_string()
        } else {
            format!(
                "Columns that may have high multicollinearity: {}",
                self.multicollinear.join(", ")
            )
        }
    }
}

/// Run the pairwise grid and multicollinearity check.
pub fn analyze_pairwise(table: &Table) -> EdaResult<PairwiseReport> {
    let grid = pair_grid(table)?;

    let columns: Vec<(String, Vec<Option<f64>>)> = grid
        .columns
        .iter()
        .cloned()
        .zip(
            grid.data
                .iter()
                .map(|col| col.iter().copied().map(Some).collect()),
        )
        .collect();
    let abs_correlation = correlation_matrix(&columns).abs();
    let multicollinear = abs_correlation.columns_above(HIGH_CORRELATION_THRESHOLD);

    debug!(
        columns = grid.columns.len(),
        rows_used = grid.rows_used,
        rows_dropped = grid.rows_dropped,
        flagged = multicollinear.len(),
        "pairwise grid computed"
    );

    Ok(PairwiseReport {
        grid,
        abs_correlation,
        threshold: HIGH_CORRELATION_THRESHOLD,
        multicollinear,
    })
}
