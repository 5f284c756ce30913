//! Self-contained HTML dashboard page
//!
//! The page is a single file: every chart is an inline `<svg>` and the
//! stylesheet is embedded, so it can be opened straight from disk.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::charts::{
    boxplot_svg, correlation_heatmap_svg, count_plot_svg, histogram_svg, message_svg,
    missing_heatmap_svg, pair_grid_svg, violin_svg,
};
use super::export::export_dashboard_json;
use crate::pipeline::{Dashboard, EdaError, SummaryReport, DESCRIBE_ROWS, RECOMMENDATIONS};

const STYLE: &str = "body{font-family:sans-serif;margin:2em auto;max-width:960px;color:#222}\
h1{border-bottom:2px solid #4c72b0}h2{margin-top:1.6em;color:#4c72b0}\
pre{background:#f6f6f6;padding:1em;overflow-x:auto}\
table{border-collapse:collapse;margin:0.5em 0}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:right}\
th{background:#eef2f8}td.label,th.label{text-align:left}\
.message{color:#666;font-style:italic}.warning{color:#b35806}\
.chart svg{max-width:100%;height:auto}";

/// Where the rendered outputs go.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// The CSV the session was loaded from, recorded in the page and export.
    pub input_file: PathBuf,
    pub html_path: PathBuf,
    /// Also write the JSON export when set.
    pub json_path: Option<PathBuf>,
}

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

struct Page {
    body: String,
}

impl Page {
    fn new() -> Self {
        Self {
            body: String::new(),
        }
    }

    fn heading(&mut self, title: &str) {
        let _ = writeln!(self.body, "<h2>{}</h2>", escape_html(title));
    }

    fn message(&mut self, text: &str) {
        let _ = writeln!(self.body, "<p class=\"message\">{}</p>", escape_html(text));
    }

    fn warning(&mut self, text: &str) {
        let _ = writeln!(self.body, "<p class=\"warning\">{}</p>", escape_html(text));
    }

    fn pre(&mut self, text: &str) {
        let _ = writeln!(self.body, "<pre>{}</pre>", escape_html(text));
    }

    fn chart(&mut self, svg: &str) {
        let _ = writeln!(self.body, "<div class=\"chart\">{}</div>", svg);
    }

    fn list(&mut self, items: &[String]) {
        self.body.push_str("<ul>\n");
        for item in items {
            let _ = writeln!(self.body, "<li>{}</li>", escape_html(item));
        }
        self.body.push_str("</ul>\n");
    }

    fn table(&mut self, header: &[String], rows: &[Vec<String>]) {
        self.body.push_str("<table>\n<tr>");
        for (i, h) in header.iter().enumerate() {
            let class = if i == 0 { " class=\"label\"" } else { "" };
            let _ = write!(self.body, "<th{}>{}</th>", class, escape_html(h));
        }
        self.body.push_str("</tr>\n");
        for row in rows {
            self.body.push_str("<tr>");
            for (i, cell) in row.iter().enumerate() {
                if i == 0 {
                    let _ = write!(self.body, "<th class=\"label\">{}</th>", escape_html(cell));
                } else {
                    let _ = write!(self.body, "<td>{}</td>", escape_html(cell));
                }
            }
            self.body.push_str("</tr>\n");
        }
        self.body.push_str("</table>\n");
    }

    /// Render a branch error. An empty selection renders nothing.
    fn skipped(&mut self, err: &EdaError) {
        if !err.is_empty_selection() {
            self.warning(&err.to_string());
        }
    }

    fn finish(self, title: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
             <h1>{title}</h1>\n{body}</body>\n</html>\n",
            title = escape_html(title),
            body = self.body,
        )
    }
}

fn summary_sections(page: &mut Page, summary: &SummaryReport) -> Result<()> {
    page.heading("Basic Data Information");
    page.pre(&summary.info_text());

    page.heading("Descriptive Statistics");
    let describe = summary.describe();
    let mut header = vec![String::new()];
    header.extend(describe.columns.iter().cloned());
    let rows: Vec<Vec<String>> = DESCRIBE_ROWS
        .iter()
        .zip(&describe.cells)
        .map(|(label, cells)| {
            let mut row = vec![label.to_string()];
            row.extend(cells.iter().map(|c| c.clone().unwrap_or_default()));
            row
        })
        .collect();
    page.table(&header, &rows);

    page.heading("Missing Value Analysis");
    let rows: Vec<Vec<String>> = summary
        .missing
        .entries
        .iter()
        .map(|e| {
            vec![
                e.column.clone(),
                e.missing.to_string(),
                e.percentage
                    .map(|p| format!("{:.2}%", p))
                    .unwrap_or_else(|| "NaN".to_string()),
            ]
        })
        .collect();
    page.table(
        &["Column".to_string(), "Missing".to_string(), "Percentage".to_string()],
        &rows,
    );

    page.heading("Missing Value Heatmap");
    page.chart(&missing_heatmap_svg(&summary.missing_matrix)?);
    Ok(())
}

fn pairwise_sections(page: &mut Page, dashboard: &Dashboard<'_>) -> Result<()> {
    page.heading("Pairplot of Numeric Data");
    match &dashboard.pairwise {
        Ok(report) => page.chart(&pair_grid_svg(&report.grid)?),
        Err(_) => page.chart(&message_svg(
            "Pairplot of Numeric Data",
            "The data does not have enough numeric columns for a pairplot.",
        )?),
    }

    page.heading("Multicollinearity Indicator");
    match &dashboard.pairwise {
        Ok(report) if report.multicollinear.is_empty() => {
            page.message(&report.multicollinearity_text())
        }
        Ok(report) => page.warning(&report.multicollinearity_text()),
        Err(e) => page.skipped(e),
    }
    Ok(())
}

fn correlation_sections(page: &mut Page, dashboard: &Dashboard<'_>) -> Result<()> {
    page.heading("Correlation Heatmap");
    match &dashboard.correlation {
        Ok(report) => {
            page.chart(&correlation_heatmap_svg(&report.matrix)?);

            page.heading("Correlation Heatmap Insights");
            if report.insights.is_empty() {
                page.message("No highly correlated column pairs found.");
            } else {
                page.list(&report.insight_lines());
            }

            page.heading("Recommendations");
            let recommendations: Vec<String> =
                RECOMMENDATIONS.iter().map(|s| s.to_string()).collect();
            page.list(&recommendations);
        }
        Err(e) => page.skipped(e),
    }
    Ok(())
}

/// Render the full dashboard page.
pub fn render_html(dashboard: &Dashboard<'_>, title: &str) -> Result<String> {
    let mut page = Page::new();

    summary_sections(&mut page, dashboard.summary)?;

    match &dashboard.distribution {
        Ok(report) => {
            page.heading(&format!("Histogram {}", report.column));
            page.chart(&histogram_svg(report)?);
            page.heading(&format!("Boxplot {}", report.column));
            page.chart(&boxplot_svg(report)?);
            page.heading(&format!("Violin Plot {}", report.column));
            page.chart(&violin_svg(report)?);
        }
        Err(e) => {
            page.heading("Distribution");
            page.skipped(e);
        }
    }

    pairwise_sections(&mut page, dashboard)?;

    match &dashboard.categorical {
        Ok(report) => {
            let freq = &report.frequency;
            page.heading(&format!("Value Frequencies of {}", freq.column));
            let rows: Vec<Vec<String>> = freq
                .rows
                .iter()
                .map(|r| {
                    vec![
                        r.value.clone(),
                        r.count.to_string(),
                        format!("{:.2}%", r.percentage),
                    ]
                })
                .collect();
            page.table(
                &["Value".to_string(), "Frequency".to_string(), "Percentage".to_string()],
                &rows,
            );
            page.heading(&format!("Count Plot {}", freq.column));
            page.chart(&count_plot_svg(&report.count_plot)?);
        }
        Err(e) => {
            page.heading("Categorical Data");
            page.skipped(e);
        }
    }

    correlation_sections(&mut page, dashboard)?;

    Ok(page.finish(title))
}

/// Write the HTML page, and the JSON export when requested.
pub fn write_reports(dashboard: &Dashboard<'_>, options: &ReportOptions) -> Result<()> {
    let title = format!(
        "Exploratory Data Analysis: {}",
        options
            .input_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| options.input_file.display().to_string())
    );
    write_html_report(dashboard, &title, &options.html_path)?;

    if let Some(json_path) = &options.json_path {
        export_dashboard_json(dashboard, &options.input_file, json_path)?;
        debug!(path = %json_path.display(), "JSON export written");
    }
    Ok(())
}

/// Render and write the page to `path`.
pub fn write_html_report(dashboard: &Dashboard<'_>, title: &str, path: &Path) -> Result<()> {
    let html = render_html(dashboard, title)?;
    std::fs::write(path, html)
        .with_context(|| format!("Failed to write HTML report to {}", path.display()))?;
    debug!(path = %path.display(), "HTML report written");
    Ok(())
}
