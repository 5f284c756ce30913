//! JSON export of a rendered dashboard

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::Dashboard;

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct ExportMetadata {
    /// Timestamp of the export (RFC 3339)
    pub timestamp: String,
    /// datalens version
    pub datalens_version: String,
    /// Input file path
    pub input_file: String,
}

/// Complete dashboard export with metadata
#[derive(Serialize)]
pub struct DashboardExport<'a> {
    pub metadata: ExportMetadata,
    #[serde(flatten)]
    pub dashboard: &'a Dashboard<'a>,
}

impl<'a> DashboardExport<'a> {
    pub fn new(dashboard: &'a Dashboard<'a>, input_file: &Path) -> Self {
        Self {
            metadata: ExportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                datalens_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: input_file.display().to_string(),
            },
            dashboard,
        }
    }
}

/// Serialize the dashboard with run metadata to a pretty-printed JSON string
pub fn dashboard_to_json(dashboard: &Dashboard<'_>, input_file: &Path) -> Result<String> {
    let export = DashboardExport::new(dashboard, input_file);
    serde_json::to_string_pretty(&export).context("Failed to serialize dashboard to JSON")
}

/// Export the dashboard to a JSON file
pub fn export_dashboard_json(
    dashboard: &Dashboard<'_>,
    input_file: &Path,
    output_path: &Path,
) -> Result<()> {
    let json = dashboard_to_json(dashboard, input_file)?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON export to {}", output_path.display()))?;

    Ok(())
}
