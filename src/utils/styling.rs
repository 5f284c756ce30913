//! Terminal styling utilities

use console::{style, Emoji};
use std::path::Path;

use crate::pipeline::SelectionState;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static PALETTE: Emoji<'_, '_> = Emoji("🎨 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("datalens").cyan().bold(),
        style("exploratory data analysis for CSV files").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(input: &Path, report: &Path, selection: &SelectionState) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);
    let none = "none".to_string();

    println!("    ┌{}┐", line);
    println!("    │ {:<53}│", style("⚙️  Configuration").cyan().bold());
    println!("    ├{}┤", line);
    println!("    │  {}Input:  {:<41}│", FOLDER, truncate_path(input, 40));
    println!("    │  {}Report: {:<41}│", SAVE, truncate_path(report, 40));
    println!("    ├{}┤", line);
    println!(
        "    │  {}Numeric:     {:<36}│",
        CHART,
        truncate_string(selection.numeric.as_ref().unwrap_or(&none), 35)
    );
    println!(
        "    │  {}Numeric hue: {:<36}│",
        PALETTE,
        truncate_string(selection.numeric_hue.as_ref().unwrap_or(&none), 35)
    );
    println!(
        "    │  {}Categorical: {:<36}│",
        CHART,
        truncate_string(selection.categorical.as_ref().unwrap_or(&none), 35)
    );
    println!(
        "    │  {}Cat. hue:    {:<36}│",
        PALETTE,
        truncate_string(selection.categorical_hue.as_ref().unwrap_or(&none), 35)
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a section header with styling
pub fn print_section_header(title: &str) {
    println!();
    println!(
        "    {} {}",
        style("##").cyan().bold(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {}{}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {}{}", WARN, style(message).yellow());
}

/// Print a block of preformatted text, indented
pub fn print_block(text: &str) {
    for line in text.lines() {
        println!("    {}", line);
    }
}

/// Print the final completion message
pub fn print_completion(report: &Path) {
    println!();
    println!(
        "    {}{} {}",
        ROCKET,
        style("Report written to").green().bold(),
        style(report.display()).green()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(info) = detail {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

pub fn truncate_string(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(len - max_len + 3).collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_keeps_tail() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("/very/long/path/data.csv", 12), ".../data.csv");
    }
}
