//! Histogram, boxplot and violin data for a numeric column
//!
//! Every plot is computed per hue group. Without a hue there is a single
//! group holding all non-missing values of the column.

use serde::Serialize;
use tracing::debug;

use super::error::{Branch, EdaError, EdaResult};
use super::stats;
use super::table::Table;

/// Number of points a density curve is evaluated at.
pub const KDE_GRID_POINTS: usize = 200;

/// Whisker reach in multiples of the IQR.
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Violin tails extend this many bandwidths past the data.
const VIOLIN_CUT: f64 = 2.0;

/// Values of the selected column belonging to one hue group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSample {
    /// Hue value, `None` when no hue column is selected.
    pub label: Option<String>,
    pub values: Vec<f64>,
}

impl GroupSample {
    pub fn display_label<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.label.as_deref().unwrap_or(fallback)
    }
}

/// Split a numeric column by hue group.
///
/// Rows where the value or the hue is missing are dropped, as are infinite
/// values. Groups keep the order in which their hue value first appears.
pub fn group_values(table: &Table, column: &str, hue: Option<&str>) -> EdaResult<Vec<GroupSample>> {
    table.require_kind(column, Branch::Numeric)?;
    let mut values = table.numeric_values(column)?;

    let mut non_finite = 0usize;
    for value in values.iter_mut() {
        if value.is_some_and(|v| !v.is_finite()) {
            *value = None;
            non_finite += 1;
        }
    }
    if non_finite > 0 {
        debug!(column, non_finite, "dropped non-finite values");
    }

    let Some(hue_col) = hue else {
        return Ok(vec![GroupSample {
            label: None,
            values: values.into_iter().flatten().collect(),
        }]);
    };

    table.require_kind(hue_col, Branch::Categorical)?;
    let hues = table.category_values(hue_col)?;

    let mut groups: Vec<GroupSample> = Vec::new();
    for (value, hue) in values.into_iter().zip(hues) {
        let (Some(v), Some(h)) = (value, hue) else {
            continue;
        };
        match groups.iter_mut().find(|g| g.label.as_deref() == Some(h.as_str())) {
            Some(group) => group.values.push(v),
            None => groups.push(GroupSample {
                label: Some(h),
                values: vec![v],
            }),
        }
    }
    Ok(groups)
}

#[derive(Debug, Clone, Serialize)]
pub struct HistogramGroup {
    pub label: Option<String>,
    pub counts: Vec<usize>,
    /// Density curve scaled to counts, `None` below two distinct values.
    pub kde: Option<Vec<(f64, f64)>>,
}

/// Binned frequencies with shared bin edges across hue groups.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub groups: Vec<HistogramGroup>,
}

impl Histogram {
    pub fn from_groups(groups: &[GroupSample]) -> Self {
        let all: Vec<f64> = groups.iter().flat_map(|g| g.values.iter().copied()).collect();
        let edges = stats::auto_bin_edges(&all);
        let bin_width = if edges.len() >= 2 { edges[1] - edges[0] } else { 0.0 };

        let groups = groups
            .iter()
            .map(|g| {
                let counts = stats::bin_counts(&g.values, &edges);
                let kde = stats::scott_bandwidth(&g.values).map(|bw| {
                    let s = stats::sorted(&g.values);
                    let grid = stats::linspace(s[0], s[s.len() - 1], KDE_GRID_POINTS);
                    let scale = g.values.len() as f64 * bin_width;
                    let density = stats::gaussian_kde(&g.values, bw, &grid);
                    grid.into_iter()
                        .zip(density)
                        .map(|(x, d)| (x, d * scale))
                        .collect()
                });
                HistogramGroup {
                    label: g.label.clone(),
                    counts,
                    kde,
                }
            })
            .collect();

        Self { edges, groups }
    }

    pub fn max_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.counts.iter().copied())
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.edges.len() < 2
    }
}

/// Five-number summary with whiskers and outliers for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub label: Option<String>,
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Most extreme values within 1.5 IQR of the quartiles.
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub fn from_group(group: &GroupSample) -> Option<Self> {
        let sorted = stats::sorted(&group.values);
        let (q1, median, q3) = stats::quartiles_sorted(&sorted)?;
        let iqr = q3 - q1;
        let lo_fence = q1 - WHISKER_IQR_FACTOR * iqr;
        let hi_fence = q3 + WHISKER_IQR_FACTOR * iqr;

        let inside: Vec<f64> = sorted
            .iter()
            .copied()
            .filter(|v| (lo_fence..=hi_fence).contains(v))
            .collect();
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Some(Self {
            label: group.label.clone(),
            count: sorted.len(),
            q1,
            median,
            q3,
            whisker_low: inside.first().copied().unwrap_or(q1),
            whisker_high: inside.last().copied().unwrap_or(q3),
            outliers,
        })
    }
}

/// Density outline of one group plus its box summary.
#[derive(Debug, Clone, Serialize)]
pub struct ViolinShape {
    pub summary: BoxStats,
    /// `(value, density)` pairs; `None` when the group has no spread.
    pub density: Option<Vec<(f64, f64)>>,
}

impl ViolinShape {
    pub fn from_group(group: &GroupSample) -> Option<Self> {
        let summary = BoxStats::from_group(group)?;
        let density = stats::scott_bandwidth(&group.values).map(|bw| {
            let s = stats::sorted(&group.values);
            let grid = stats::linspace(
                s[0] - VIOLIN_CUT * bw,
                s[s.len() - 1] + VIOLIN_CUT * bw,
                KDE_GRID_POINTS,
            );
            let density = stats::gaussian_kde(&group.values, bw, &grid);
            grid.into_iter().zip(density).collect()
        });
        Some(Self { summary, density })
    }

    pub fn max_density(&self) -> f64 {
        self.density
            .as_ref()
            .map(|d| d.iter().map(|(_, y)| *y).fold(0.0, f64::max))
            .unwrap_or(0.0)
    }
}

/// Output of the numeric distribution branch.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionReport {
    pub column: String,
    pub hue: Option<String>,
    pub groups: Vec<GroupSample>,
    pub histogram: Histogram,
    pub boxes: Vec<BoxStats>,
    pub violins: Vec<ViolinShape>,
}

impl DistributionReport {
    /// Lowest and highest value across all groups, violin tails included.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let data = self.groups.iter().flat_map(|g| g.values.iter().copied());
        let tails = self
            .violins
            .iter()
            .filter_map(|v| v.density.as_ref())
            .flat_map(|d| d.iter().map(|(x, _)| *x));
        let mut iter = data.chain(tails);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Run the numeric distribution branch for the current selection.
pub fn analyze_distribution(
    table: &Table,
    column: Option<&str>,
    hue: Option<&str>,
) -> EdaResult<DistributionReport> {
    let column = column.ok_or(EdaError::EmptySelection(Branch::Numeric))?;
    let groups = group_values(table, column, hue)?;

    let histogram = Histogram::from_groups(&groups);
    let boxes = groups.iter().filter_map(BoxStats::from_group).collect();
    let violins = groups.iter().filter_map(ViolinShape::from_group).collect();

    debug!(
        column,
        hue = hue.unwrap_or("none"),
        groups = groups.len(),
        bins = histogram.edges.len().saturating_sub(1),
        "distribution branch computed"
    );

    Ok(DistributionReport {
        column: column.to_string(),
        hue: hue.map(str::to_string),
        groups,
        histogram,
        boxes,
        violins,
    })
}
