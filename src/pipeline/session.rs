//! Session snapshot and per-interaction recomputation
//!
//! A [`Session`] is created once per upload and never changes. Each user
//! interaction produces a new [`SelectionState`], and [`Session::dashboard`]
//! recomputes every branch from the snapshot and that selection.

use serde::Serialize;
use tracing::info;

use super::categorical::{analyze_categorical, CategoricalReport};
use super::correlation::{analyze_correlation, CorrelationReport};
use super::distribution::{analyze_distribution, DistributionReport};
use super::error::{Branch, EdaError, EdaResult};
use super::pairwise::{analyze_pairwise, PairwiseReport};
use super::summary::{summarize, SummaryReport};
use super::table::Table;

/// Current dropdown values. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub numeric: Option<String>,
    pub numeric_hue: Option<String>,
    pub categorical: Option<String>,
    pub categorical_hue: Option<String>,
}

impl SelectionState {
    /// The selection a fresh page starts with: the first numeric and the
    /// first categorical column, no hue.
    pub fn initial(table: &Table) -> Self {
        Self {
            numeric: table.numeric_columns().into_iter().next(),
            numeric_hue: None,
            categorical: table.categorical_columns().into_iter().next(),
            categorical_hue: None,
        }
    }

    pub fn with_numeric(mut self, column: Option<String>) -> Self {
        self.numeric = column;
        self
    }

    pub fn with_numeric_hue(mut self, hue: Option<String>) -> Self {
        self.numeric_hue = hue;
        self
    }

    pub fn with_categorical(mut self, column: Option<String>) -> Self {
        self.categorical = column;
        self
    }

    pub fn with_categorical_hue(mut self, hue: Option<String>) -> Self {
        self.categorical_hue = hue;
        self
    }

    /// Check every selected column exists and has the kind its slot needs.
    pub fn validate(&self, table: &Table) -> EdaResult<()> {
        let slots = [
            (&self.numeric, Branch::Numeric),
            (&self.numeric_hue, Branch::Categorical),
            (&self.categorical, Branch::Categorical),
            (&self.categorical_hue, Branch::Categorical),
        ];
        for (slot, branch) in slots {
            if let Some(column) = slot {
                table.require_kind(column, branch)?;
            }
        }
        Ok(())
    }
}

/// Everything shown on the page for one selection.
#[derive(Debug, Serialize)]
pub struct Dashboard<'a> {
    pub summary: &'a SummaryReport,
    pub selection: SelectionState,
    #[serde(serialize_with = "serialize_section")]
    pub distribution: EdaResult<DistributionReport>,
    #[serde(serialize_with = "serialize_section")]
    pub pairwise: EdaResult<PairwiseReport>,
    #[serde(serialize_with = "serialize_section")]
    pub categorical: EdaResult<CategoricalReport>,
    #[serde(serialize_with = "serialize_section")]
    pub correlation: EdaResult<CorrelationReport>,
}

/// Serialize a section as its report, or as `{"skipped": "<reason>"}`.
fn serialize_section<T: Serialize, S: serde::Serializer>(
    section: &EdaResult<T>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;

    match section {
        Ok(report) => report.serialize(serializer),
        Err(e) => {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry("skipped", &e.to_string())?;
            map.end()
        }
    }
}

/// Immutable per-upload snapshot: the table and its summary.
#[derive(Debug)]
pub struct Session {
    table: Table,
    summary: SummaryReport,
}

impl Session {
    /// Classify and summarize a freshly loaded table.
    pub fn new(table: Table) -> EdaResult<Self> {
        let summary = summarize(&table)?;
        info!(
            rows = table.height(),
            columns = table.width(),
            missing = summary.missing.total_missing,
            "session created"
        );
        Ok(Self { table, summary })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn summary(&self) -> &SummaryReport {
        &self.summary
    }

    pub fn initial_selection(&self) -> SelectionState {
        SelectionState::initial(&self.table)
    }

    /// Recompute every selection-driven branch.
    pub fn dashboard(&self, selection: &SelectionState) -> Dashboard<'_> {
        let table = &self.table;
        Dashboard {
            summary: &self.summary,
            selection: selection.clone(),
            distribution: analyze_distribution(
                table,
                selection.numeric.as_deref(),
                selection.numeric_hue.as_deref(),
            ),
            pairwise: analyze_pairwise(table),
            categorical: analyze_categorical(
                table,
                selection.categorical.as_deref(),
                selection.categorical_hue.as_deref(),
            ),
            correlation: analyze_correlation(table),
        }
    }
}

impl Dashboard<'_> {
    /// Branch errors that should be shown to the user, in page order.
    pub fn messages(&self) -> Vec<String> {
        let sections: [Option<&EdaError>; 4] = [
            self.distribution.as_ref().err(),
            self.pairwise.as_ref().err(),
            self.categorical.as_ref().err(),
            self.correlation.as_ref().err(),
        ];
        sections
            .into_iter()
            .flatten()
            .filter(|e| !e.is_empty_selection())
            .map(|e| e.to_string())
            .collect()
    }
}
