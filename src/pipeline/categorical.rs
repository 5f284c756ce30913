//! Frequency tables and count plots for categorical columns

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::error::{Branch, EdaError, EdaResult};
use super::table::Table;

/// A distinct value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Count distinct non-missing values, ordered by descending count.
///
/// Values with equal counts keep the order of their first appearance.
pub fn value_counts(values: &[Option<String>]) -> Vec<ValueCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();

    for value in values.iter().flatten() {
        match index.get(value.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(value.as_str(), counts.len());
                counts.push(ValueCount {
                    value: value.clone(),
                    count: 1,
                });
            }
        }
    }

    // stable sort keeps first-appearance order among ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Distinct non-missing values in order of first appearance.
pub fn distinct_in_order(values: &[Option<String>]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .iter()
        .flatten()
        .filter(|v| seen.insert(v.as_str()))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyRow {
    pub value: String,
    pub count: usize,
    /// Share of all table rows, in percent.
    pub percentage: f64,
}

/// Value frequencies of one categorical column.
#[derive(Debug, Clone, Serialize)]
pub struct FrequencyTable {
    pub column: String,
    pub total_rows: usize,
    pub rows: Vec<FrequencyRow>,
}

impl FrequencyTable {
    pub fn percentage_sum(&self) -> f64 {
        self.rows.iter().map(|r| r.percentage).sum()
    }
}

/// Bar data for a count plot.
#[derive(Debug, Clone, Serialize)]
pub struct CountPlot {
    pub column: String,
    pub hue: Option<String>,
    /// Bar categories, in frequency-table order.
    pub categories: Vec<String>,
    /// Hue groups in order of first appearance; one unnamed group without hue.
    pub groups: Vec<String>,
    /// `counts[category][group]`.
    pub counts: Vec<Vec<usize>>,
}

impl CountPlot {
    pub fn max_count(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }
}

/// Output of the categorical branch.
#[derive(Debug, Clone, Serialize)]
pub struct CategoricalReport {
    pub frequency: FrequencyTable,
    pub count_plot: CountPlot,
}

/// Build the frequency table of a categorical column.
pub fn frequency_table(table: &Table, column: &str) -> EdaResult<FrequencyTable> {
    table.require_kind(column, Branch::Categorical)?;
    let values = table.category_values(column)?;
    let total_rows = values.len();

    let rows = value_counts(&values)
        .into_iter()
        .map(|vc| FrequencyRow {
            percentage: if total_rows == 0 {
                0.0
            } else {
                vc.count as f64 / total_rows as f64 * 100.0
            },
            value: vc.value,
            count: vc.count,
        })
        .collect();

    Ok(FrequencyTable {
        column: column.to_string(),
        total_rows,
        rows,
    })
}

/// Count rows per category, split by hue group when a hue is given.
pub fn count_plot(table: &Table, column: &str, hue: Option<&str>) -> EdaResult<CountPlot> {
    table.require_kind(column, Branch::Categorical)?;
    let values = table.category_values(column)?;
    let categories: Vec<String> = value_counts(&values).into_iter().map(|v| v.value).collect();
    let position: HashMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let (groups, counts) = match hue {
        None => {
            let mut counts = vec![vec![0usize]; categories.len()];
            for value in values.iter().flatten() {
                counts[position[value.as_str()]][0] += 1;
            }
            (vec![column.to_string()], counts)
        }
        Some(hue_col) => {
            table.require_kind(hue_col, Branch::Categorical)?;
            let hues = table.category_values(hue_col)?;
            let groups = distinct_in_order(&hues);
            let group_pos: HashMap<&str, usize> = groups
                .iter()
                .enumerate()
                .map(|(i, g)| (g.as_str(), i))
                .collect();

            let mut counts = vec![vec![0usize; groups.len()]; categories.len()];
            for (value, group) in values.iter().zip(&hues) {
                if let (Some(v), Some(g)) = (value, group) {
                    counts[position[v.as_str()]][group_pos[g.as_str()]] += 1;
                }
            }
            (groups, counts)
        }
    };

    Ok(CountPlot {
        column: column.to_string(),
        hue: hue.map(str::to_string),
        categories,
        groups,
        counts,
    })
}

/// Run the categorical branch for the current selection.
pub fn analyze_categorical(
    table: &Table,
    column: Option<&str>,
    hue: Option<&str>,
) -> EdaResult<CategoricalReport> {
    let column = column.ok_or(EdaError::EmptySelection(Branch::Categorical))?;
    let frequency = frequency_table(table, column)?;
    let count_plot = count_plot(table, column, hue)?;
    debug!(
        column,
        hue = hue.unwrap_or("none"),
        categories = frequency.rows.len(),
        "categorical branch computed"
    );
    Ok(CategoricalReport {
        frequency,
        count_plot,
    })
}
