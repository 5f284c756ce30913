//! Missing value analysis

use serde::Serialize;

use super::error::EdaResult;
use super::table::Table;

/// Missing-value count and percentage for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingEntry {
    pub column: String,
    pub missing: usize,
    /// `100 * missing / rows`, undefined for a zero-row table.
    pub percentage: Option<f64>,
}

/// Per-column missing-value report, in column order.
#[derive(Debug, Clone, Serialize)]
pub struct MissingReport {
    pub rows: usize,
    pub entries: Vec<MissingEntry>,
    pub total_missing: usize,
}

impl MissingReport {
    pub fn get(&self, column: &str) -> Option<&MissingEntry> {
        self.entries.iter().find(|e| e.column == column)
    }

    /// Columns with at least one missing value.
    pub fn columns_with_missing(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.missing > 0)
            .map(|e| e.column.as_str())
            .collect()
    }
}

/// Analyze missing values for every column.
pub fn analyze_missing_values(table: &Table) -> EdaResult<MissingReport> {
    let rows = table.height();

    let entries: Vec<MissingEntry> = table
        .frame()
        .get_columns()
        .iter()
        .map(|col| {
            let missing = col.null_count();
            let percentage = if rows == 0 {
                None
            } else {
                Some(missing as f64 / rows as f64 * 100.0)
            };
            MissingEntry {
                column: col.name().to_string(),
                missing,
                percentage,
            }
        })
        .collect();

    let total_missing = entries.iter().map(|e| e.missing).sum();

    Ok(MissingReport {
        rows,
        entries,
        total_missing,
    })
}

/// Row-by-column missing pattern, used for the missing-value heatmap.
#[derive(Debug, Clone, Serialize)]
pub struct MissingMatrix {
    pub rows: usize,
    pub columns: Vec<String>,
    /// For each column, the indices of its missing rows (ascending).
    pub missing_rows: Vec<Vec<usize>>,
}

impl MissingMatrix {
    pub fn is_missing(&self, column: usize, row: usize) -> bool {
        self.missing_rows
            .get(column)
            .is_some_and(|rows| rows.binary_search(&row).is_ok())
    }

    /// Contiguous runs `(start, len)` of missing rows for a column.
    pub fn runs(&self, column: usize) -> Vec<(usize, usize)> {
        let mut runs: Vec<(usize, usize)> = Vec::new();
        for &row in self.missing_rows.get(column).map(Vec::as_slice).unwrap_or(&[]) {
            match runs.last_mut() {
                Some((start, len)) if *start + *len == row => *len += 1,
                _ => runs.push((row, 1)),
            }
        }
        runs
    }
}

/// Build the missing-value pattern for every column.
pub fn missing_matrix(table: &Table) -> EdaResult<MissingMatrix> {
    let columns = table.column_names();
    let missing_rows = columns
        .iter()
        .map(|name| {
            let mask = table.null_mask(name)?;
            Ok(mask
                .iter()
                .enumerate()
                .filter_map(|(i, &missing)| missing.then_some(i))
                .collect())
        })
        .collect::<EdaResult<Vec<Vec<usize>>>>()?;

    Ok(MissingMatrix {
        rows: table.height(),
        columns,
        missing_rows,
    })
}
