//! Pearson correlation matrix and multicollinearity insights

use faer::Mat;
use rayon::prelude::*;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::debug;

use super::error::{EdaError, EdaResult};
use super::table::Table;

/// Absolute correlation above which a pair is reported as multicollinear.
pub const HIGH_CORRELATION_THRESHOLD: f64 = 0.8;

/// Fixed advice shown after the correlation insights.
pub const RECOMMENDATIONS: [&str; 2] = [
    "If multicollinearity is found, consider removing or combining the highly correlated variables, or collecting more data.",
    "Check whether the relationship between the related columns is relevant to the goal of the analysis, or whether some variables can be ignored.",
];

/// Represents a correlated pair of columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelatedPair {
    pub feature1: String,
    pub feature2: String,
    pub correlation: f64,
}

impl CorrelatedPair {
    pub fn insight_text(&self, threshold: f64) -> String {
        format!(
            "Correlation between `{}` and `{}` is high (>{}), possible multicollinearity.",
            self.feature1, self.feature2, threshold
        )
    }
}

/// Square, symmetric correlation matrix over numeric columns.
///
/// Undefined coefficients (constant columns, fewer than two overlapping
/// observations) are stored as NaN and surface as `None`.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    values: Mat<f64>,
}

impl CorrelationMatrix {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.len() || j >= self.len() {
            return None;
        }
        let v = self.values[(i, j)];
        (!v.is_nan()).then_some(v)
    }

    pub fn get_by_name(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.get(i, j)
    }

    /// Element-wise absolute value.
    pub fn abs(&self) -> CorrelationMatrix {
        let n = self.len();
        CorrelationMatrix {
            columns: self.columns.clone(),
            values: Mat::from_fn(n, n, |i, j| self.values[(i, j)].abs()),
        }
    }

    /// Pairs of the strict lower triangle (row `i`, column `j < i`) whose
    /// absolute correlation exceeds `threshold`, in column order.
    pub fn lower_triangle_pairs_above(&self, threshold: f64) -> Vec<CorrelatedPair> {
        let mut pairs = Vec::new();
        for i in 0..self.len() {
            for j in 0..i {
                if let Some(c) = self.get(i, j) {
                    if c.abs() > threshold {
                        pairs.push(CorrelatedPair {
                            feature1: self.columns[i].clone(),
                            feature2: self.columns[j].clone(),
                            correlation: c,
                        });
                    }
                }
            }
        }
        pairs
    }

    /// Columns that take part in at least one strict-upper-triangle pair
    /// with absolute correlation above `threshold`, in column order.
    pub fn columns_above(&self, threshold: f64) -> Vec<String> {
        let n = self.len();
        let mut flagged = vec![false; n];
        for i in 0..n {
            for j in (i + 1)..n {
                if self.get(i, j).is_some_and(|c| c.abs() > threshold) {
                    flagged[i] = true;
                    flagged[j] = true;
                }
            }
        }
        self.columns
            .iter()
            .zip(flagged)
            .filter_map(|(c, f)| f.then(|| c.clone()))
            .collect()
    }

    /// Rows of the matrix, `None` for undefined entries.
    pub fn rows(&self) -> Vec<Vec<Option<f64>>> {
        (0..self.len())
            .map(|i| (0..self.len()).map(|j| self.get(i, j)).collect())
            .collect()
    }
}

impl Serialize for CorrelationMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CorrelationMatrix", 2)?;
        state.serialize_field("columns", &self.columns)?;
        state.serialize_field("values", &self.rows())?;
        state.end()
    }
}

/// Pearson correlation over the rows where both values are present.
///
/// Single-pass Welford update for numerical stability. Returns `None`
/// with fewer than two complete rows or when either side is constant.
pub fn pearson_correlation(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let mut n = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in x.iter().zip(y.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            n += 1.0;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / n;
            mean_y += dy / n;
            var_x += dx * (x - mean_x);
            var_y += dy * (y - mean_y);
            cov_xy += dx * (y - mean_y);
        }
    }

    if n < 2.0 || var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    let r = cov_xy / (var_x * var_y).sqrt();
    Some(r.clamp(-1.0, 1.0))
}

/// Compute the full correlation matrix of the given columns.
///
/// Column pairs are evaluated in parallel with Rayon.
pub fn correlation_matrix(columns: &[(String, Vec<Option<f64>>)]) -> CorrelationMatrix {
    let n = columns.len();
    let names: Vec<String> = columns.iter().map(|(name, _)| name.clone()).collect();

    // Generate all pairs (indices for upper triangle)
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();

    let coefficients: Vec<(usize, usize, f64)> = pairs
        .par_iter()
        .map(|&(i, j)| {
            let r = pearson_correlation(&columns[i].1, &columns[j].1);
            (i, j, r.unwrap_or(f64::NAN))
        })
        .collect();

    let mut values = Mat::<f64>::zeros(n, n);
    for (i, (_, data)) in columns.iter().enumerate() {
        values[(i, i)] = if pearson_correlation(data, data).is_some() {
            1.0
        } else {
            f64::NAN
        };
    }
    for (i, j, r) in coefficients {
        values[(i, j)] = r;
        values[(j, i)] = r;
    }

    CorrelationMatrix {
        columns: names,
        values,
    }
}

/// Correlation matrix over every numeric column of a table.
pub fn numeric_correlation_matrix(table: &Table) -> EdaResult<CorrelationMatrix> {
    let numeric = table.numeric_columns();
    if numeric.len() < 2 {
        return Err(EdaError::InsufficientColumns {
            required: 2,
            found: numeric.len(),
        });
    }

    let columns = numeric
        .into_iter()
        .map(|name| {
            let values = table.numeric_values(&name)?;
            Ok((name, values))
        })
        .collect::<EdaResult<Vec<_>>>()?;

    Ok(correlation_matrix(&columns))
}

/// Output of the correlation branch.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationReport {
    pub matrix: CorrelationMatrix,
    pub threshold: f64,
    pub insights: Vec<CorrelatedPair>,
}

impl CorrelationReport {
    pub fn insight_lines(&self) -> Vec<String> {
        self.insights
            .iter()
            .map(|p| p.insight_text(self.threshold))
            .collect()
    }
}

/// Run the correlation branch.
pub fn analyze_correlation(table: &Table) -> EdaResult<CorrelationReport> {
    let matrix = numeric_correlation_matrix(table)?;
    let insights = matrix.lower_triangle_pairs_above(HIGH_CORRELATION_THRESHOLD);
    debug!(
        columns = matrix.len(),
        insights = insights.len(),
        "correlation branch computed"
    );
    Ok(CorrelationReport {
        matrix,
        threshold: HIGH_CORRELATION_THRESHOLD,
        insights,
    })
}
