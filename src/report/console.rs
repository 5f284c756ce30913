//! Terminal rendering of the dashboard

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{
    format_number, CategoricalReport, CorrelationReport, Dashboard, DistributionReport, EdaError,
    EdaResult, PairwiseReport, SummaryReport, DESCRIBE_ROWS, RECOMMENDATIONS,
};
use crate::utils::{print_block, print_count, print_info, print_section_header, print_warning};

/// Longest bar drawn for the text count plot.
const TEXT_BAR_WIDTH: usize = 30;

fn new_table(header: Vec<Cell>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header);
    table
}

fn bold(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn print_table(table: &Table) {
    // Indent the table
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn pct(value: Option<f64>) -> String {
    value
        .map(|p| format!("{:.2}%", p))
        .unwrap_or_else(|| "NaN".to_string())
}

/// Schema/info text, descriptive statistics and the missing-value table.
pub fn print_summary(summary: &SummaryReport) {
    print_section_header("Basic Data Information");
    print_block(&summary.info_text());

    print_section_header("Descriptive Statistics");
    let describe = summary.describe();
    let mut header = vec![bold("")];
    header.extend(describe.columns.iter().map(|c| bold(c)));
    let mut table = new_table(header);
    for (label, row) in DESCRIBE_ROWS.iter().zip(&describe.cells) {
        let mut cells = vec![bold(label)];
        cells.extend(row.iter().map(|cell| match cell {
            Some(v) => Cell::new(v).set_alignment(CellAlignment::Right),
            None => Cell::new("-").fg(Color::DarkGrey),
        }));
        table.add_row(cells);
    }
    print_table(&table);

    print_section_header("Missing Value Analysis");
    let mut table = new_table(vec![bold("Column"), bold("Missing"), bold("Percentage")]);
    for entry in &summary.missing.entries {
        let color = if entry.missing == 0 {
            Color::White
        } else if entry.percentage.unwrap_or(0.0) >= 50.0 {
            Color::Red
        } else {
            Color::Yellow
        };
        table.add_row(vec![
            Cell::new(&entry.column),
            Cell::new(entry.missing).fg(color),
            Cell::new(pct(entry.percentage)).fg(color),
        ]);
    }
    print_table(&table);
    println!(
        "      Total missing values: {}",
        style(summary.missing.total_missing).yellow().bold()
    );
}

/// Print a branch error inline. Empty selections render nothing.
fn print_skipped(err: &EdaError) {
    if !err.is_empty_selection() {
        print_warning(&err.to_string());
    }
}

fn print_distribution(report: &DistributionReport) {
    let title = match &report.hue {
        Some(hue) => format!("Distribution of {} by {}", report.column, hue),
        None => format!("Distribution of {}", report.column),
    };
    print_section_header(&title);

    if report.boxes.is_empty() {
        print_info("No values to plot.");
        return;
    }

    let mut table = new_table(vec![
        bold("Group"),
        bold("Count"),
        bold("Whisker low"),
        bold("Q1"),
        bold("Median"),
        bold("Q3"),
        bold("Whisker high"),
        bold("Outliers"),
    ]);
    for stats in &report.boxes {
        table.add_row(vec![
            Cell::new(stats.label.as_deref().unwrap_or(&report.column)),
            Cell::new(stats.count),
            Cell::new(format_number(stats.whisker_low)),
            Cell::new(format_number(stats.q1)),
            Cell::new(format_number(stats.median)).add_attribute(Attribute::Bold),
            Cell::new(format_number(stats.q3)),
            Cell::new(format_number(stats.whisker_high)),
            Cell::new(stats.outliers.len()).fg(if stats.outliers.is_empty() {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
    }
    print_table(&table);
    println!(
        "      Histogram: {} bins",
        report.histogram.edges.len().saturating_sub(1)
    );
}

fn print_pairwise(section: &EdaResult<PairwiseReport>) {
    print_section_header("Pairplot of Numeric Data");
    match section {
        Ok(report) => {
            println!(
                "      {} columns, {} complete rows ({} dropped)",
                report.grid.columns.len(),
                report.grid.rows_used,
                report.grid.rows_dropped
            );
        }
        Err(_) => print_info("The data does not have enough numeric columns for a pairplot."),
    }

    print_section_header("Multicollinearity Indicator");
    match section {
        Ok(report) if report.multicollinear.is_empty() => {
            print_info(&report.multicollinearity_text())
        }
        Ok(report) => print_warning(&report.multicollinearity_text()),
        Err(e) => print_skipped(e),
    }
}

fn print_categorical(report: &CategoricalReport) {
    let freq = &report.frequency;
    print_section_header(&format!("Value Frequencies of {}", freq.column));

    let mut table = new_table(vec![bold("Value"), bold("Frequency"), bold("Percentage")]);
    for row in &freq.rows {
        table.add_row(vec![
            Cell::new(&row.value),
            Cell::new(row.count),
            Cell::new(format!("{:.2}%", row.percentage)),
        ]);
    }
    print_table(&table);

    let plot = &report.count_plot;
    let max = plot.max_count().max(1);
    println!();
    for (category, counts) in plot.categories.iter().zip(&plot.counts) {
        for (group, &count) in plot.groups.iter().zip(counts) {
            let bar = "█".repeat((count * TEXT_BAR_WIDTH).div_ceil(max));
            let label = if plot.hue.is_some() {
                format!("{} / {}", category, group)
            } else {
                category.clone()
            };
            println!("      {:<24} {} {}", label, style(bar).cyan(), count);
        }
    }
}

fn print_correlation(report: &CorrelationReport) {
    print_section_header("Correlation Between Numeric Columns");

    let mut header = vec![bold("")];
    header.extend(report.matrix.columns().iter().map(|c| bold(c)));
    let mut table = new_table(header);
    for (name, row) in report.matrix.columns().iter().zip(report.matrix.rows()) {
        let mut cells = vec![bold(name)];
        cells.extend(row.into_iter().map(|v| match v {
            Some(c) => {
                let color = if c.abs() > report.threshold {
                    Color::Red
                } else if c.abs() > 0.5 {
                    Color::Yellow
                } else {
                    Color::White
                };
                Cell::new(format!("{:.2}", c))
                    .fg(color)
                    .set_alignment(CellAlignment::Right)
            }
            None => Cell::new("nan").fg(Color::DarkGrey),
        }));
        table.add_row(cells);
    }
    print_table(&table);

    print_section_header("Correlation Heatmap Insights");
    if report.insights.is_empty() {
        print_info("No highly correlated column pairs found");
    } else {
        print_count(
            "highly correlated pair(s)",
            report.insights.len(),
            Some(&format!("(>{})", report.threshold)),
        );
        for line in report.insight_lines() {
            println!("        {} {}", style("•").dim(), line);
        }
    }

    print_section_header("Recommendations");
    for line in RECOMMENDATIONS {
        println!("        {} {}", style("-").dim(), line);
    }
}

/// Print every selection-driven branch of the dashboard.
pub fn print_dashboard(dashboard: &Dashboard<'_>) {
    match &dashboard.distribution {
        Ok(report) => print_distribution(report),
        Err(e) => print_skipped(e),
    }
    print_pairwise(&dashboard.pairwise);

    match &dashboard.categorical {
        Ok(report) => print_categorical(report),
        Err(e) => print_skipped(e),
    }

    match &dashboard.correlation {
        Ok(report) => print_correlation(report),
        Err(e) => {
            print_section_header("Correlation Between Numeric Columns");
            print_skipped(e);
        }
    }
}
