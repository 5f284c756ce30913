//! Schema listing, descriptive statistics and column profiles

use std::fmt::Write as _;

use serde::Serialize;

use super::categorical::{value_counts, ValueCount};
use super::error::EdaResult;
use super::missing::{analyze_missing_values, missing_matrix, MissingMatrix, MissingReport};
use super::schema::{ColumnKind, Schema};
use super::stats;
use super::table::Table;

/// Descriptive statistics of a numeric column. Undefined values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NumericStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl NumericStats {
    pub fn from_values(values: &[Option<f64>]) -> Self {
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let sorted = stats::sorted(&present);
        let quartiles = stats::quartiles_sorted(&sorted);
        Self {
            count: present.len(),
            mean: stats::mean(&present),
            std: stats::std_dev(&present),
            min: sorted.first().copied(),
            q1: quartiles.map(|q| q.0),
            median: quartiles.map(|q| q.1),
            q3: quartiles.map(|q| q.2),
            max: sorted.last().copied(),
        }
    }
}

/// Descriptive statistics of a categorical column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoricalStats {
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: Option<usize>,
    /// Value frequencies ordered by descending count.
    pub frequencies: Vec<ValueCount>,
}

impl CategoricalStats {
    pub fn from_values(values: &[Option<String>]) -> Self {
        let frequencies = value_counts(values);
        Self {
            count: values.iter().flatten().count(),
            unique: frequencies.len(),
            top: frequencies.first().map(|v| v.value.clone()),
            freq: frequencies.first().map(|v| v.count),
            frequencies,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnStats {
    Numeric(NumericStats),
    Categorical(CategoricalStats),
}

/// Everything derived about a single column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub dtype: String,
    pub non_null: usize,
    pub missing: usize,
    pub missing_pct: Option<f64>,
    pub stats: ColumnStats,
}

/// Output of the summary stage.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub rows: usize,
    pub schema: Schema,
    pub profiles: Vec<ColumnProfile>,
    pub missing: MissingReport,
    #[serde(skip)]
    pub missing_matrix: MissingMatrix,
    pub memory_mb: f64,
}

/// Row labels of the descriptive-statistics table.
pub const DESCRIBE_ROWS: [&str; 11] = [
    "count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%", "max",
];

/// Descriptive statistics laid out as statistic x column.
///
/// `None` cells do not apply to the column's kind; `Some("NaN")` cells
/// apply but are undefined (e.g. the mean of a zero-row column).
#[derive(Debug, Clone, Serialize)]
pub struct DescribeTable {
    pub columns: Vec<String>,
    pub cells: Vec<Vec<Option<String>>>,
}

/// Compute the full summary for a table.
pub fn summarize(table: &Table) -> EdaResult<SummaryReport> {
    let missing = analyze_missing_values(table)?;
    let matrix = missing_matrix(table)?;

    let mut profiles = Vec::with_capacity(table.width());
    for (col, entry) in table.schema().columns().iter().zip(&missing.entries) {
        let stats = match col.kind {
            ColumnKind::Numeric => ColumnStats::Numeric(NumericStats::from_values(
                &table.numeric_values(&col.name)?,
            )),
            ColumnKind::Categorical => ColumnStats::Categorical(CategoricalStats::from_values(
                &table.category_values(&col.name)?,
            )),
        };
        profiles.push(ColumnProfile {
            name: col.name.clone(),
            kind: col.kind,
            dtype: col.dtype.clone(),
            non_null: col.non_null,
            missing: entry.missing,
            missing_pct: entry.percentage,
            stats,
        });
    }

    Ok(SummaryReport {
        rows: table.height(),
        schema: table.schema().clone(),
        profiles,
        missing,
        missing_matrix: matrix,
        memory_mb: table.memory_mb(),
    })
}

impl SummaryReport {
    pub fn profile(&self, name: &str) -> Option<&ColumnProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Plain-text overview of the table and its columns.
    pub fn info_text(&self) -> String {
        let columns = self.schema.columns();
        let name_width = columns
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Column".len());
        let dtype_width = columns
            .iter()
            .map(|c| c.dtype.len())
            .max()
            .unwrap_or(0)
            .max("Dtype".len());

        let mut out = String::new();
        let _ = writeln!(out, "<datalens.Table>");
        if self.rows == 0 {
            let _ = writeln!(out, "RangeIndex: 0 entries");
        } else {
            let _ = writeln!(out, "RangeIndex: {} entries, 0 to {}", self.rows, self.rows - 1);
        }
        let _ = writeln!(out, "Data columns (total {} columns):", columns.len());
        let _ = writeln!(
            out,
            " #   {:<nw$}  {:<14}  {:<dw$}  Kind",
            "Column",
            "Non-Null Count",
            "Dtype",
            nw = name_width,
            dw = dtype_width
        );
        let _ = writeln!(
            out,
            "---  {:<nw$}  {:<14}  {:<dw$}  ----",
            "-".repeat(6),
            "-".repeat(14),
            "-".repeat(5),
            nw = name_width,
            dw = dtype_width
        );
        for (i, col) in columns.iter().enumerate() {
            let _ = writeln!(
                out,
                " {:<3} {:<nw$}  {:<14}  {:<dw$}  {}",
                i,
                col.name,
                format!("{} non-null", col.non_null),
                col.dtype,
                col.kind,
                nw = name_width,
                dw = dtype_width
            );
        }
        let _ = writeln!(
            out,
            "kinds: numeric({}), categorical({})",
            self.schema.numeric_columns().len(),
            self.schema.categorical_columns().len()
        );
        let _ = write!(out, "memory usage: {:.2} MB", self.memory_mb);
        out
    }

    /// Descriptive statistics for every column regardless of kind.
    pub fn describe(&self) -> DescribeTable {
        let columns: Vec<String> = self.profiles.iter().map(|p| p.name.clone()).collect();
        let per_column: Vec<Vec<Option<String>>> = self
            .profiles
            .iter()
            .map(|p| describe_column(&p.stats))
            .collect();

        let cells = (0..DESCRIBE_ROWS.len())
            .map(|row| per_column.iter().map(|col| col[row].clone()).collect())
            .collect();

        DescribeTable { columns, cells }
    }
}

fn describe_column(stats: &ColumnStats) -> Vec<Option<String>> {
    let num = |v: Option<f64>| Some(v.map(format_number).unwrap_or_else(|| "NaN".to_string()));
    match stats {
        ColumnStats::Numeric(s) => vec![
            Some(s.count.to_string()),
            None,
            None,
            None,
            num(s.mean),
            num(s.std),
            num(s.min),
            num(s.q1),
            num(s.median),
            num(s.q3),
            num(s.max),
        ],
        ColumnStats::Categorical(s) => vec![
            Some(s.count.to_string()),
            Some(s.unique.to_string()),
            Some(s.top.clone().unwrap_or_else(|| "NaN".to_string())),
            Some(s.freq.map(|f| f.to_string()).unwrap_or_else(|| "NaN".to_string())),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
        ],
    }
}

/// Format a statistic with up to six decimals, trailing zeros trimmed.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    let s = format!("{:.6}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_trims() {
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(1.0 / 3.0), "0.333333");
        assert_eq!(format_number(-0.0000001), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_numeric_stats_with_missing() {
        let stats = NumericStats::from_values(&[Some(1.0), None, Some(3.0), Some(2.0)]);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, Some(2.0));
        assert_eq!(stats.median, Some(2.0));
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(3.0));
    }

    #[test]
    fn test_numeric_stats_empty_is_undefined() {
        let stats = NumericStats::from_values(&[None, None]);
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_none());
        assert!(stats.std.is_none());
        assert!(stats.q1.is_none());
    }
}
