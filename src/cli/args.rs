//! Command-line argument definitions using clap

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::pipeline::{LoadOptions, SelectionState};

/// datalens - Exploratory data analysis dashboard for CSV files
#[derive(Parser, Debug)]
#[command(name = "datalens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input CSV file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Directory for the generated report files.
    /// Defaults to the directory containing the input file.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Initial numeric column for the histogram, boxplot and violin plot.
    /// Defaults to the first numeric column.
    #[arg(long)]
    pub numeric: Option<String>,

    /// Categorical column used to group the numeric plots
    #[arg(long)]
    pub numeric_hue: Option<String>,

    /// Initial categorical column for the frequency table and count plot.
    /// Defaults to the first categorical column.
    #[arg(long)]
    pub categorical: Option<String>,

    /// Categorical column used to split the count plot bars
    #[arg(long)]
    pub categorical_hue: Option<String>,

    /// Render the dashboard once and exit without the interactive menu
    #[arg(long, default_value = "false")]
    pub no_interactive: bool,

    /// Also write a JSON export of the dashboard next to the HTML report
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Number of rows to use for schema inference.
    /// Higher values improve type detection for ambiguous columns but may be slower.
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Field delimiter (a single ASCII character)
    #[arg(long, default_value = ",", value_parser = validate_delimiter)]
    pub delimiter: u8,

    /// Enable debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}

impl Cli {
    /// Loader settings taken from the command line.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            infer_schema_length: self.infer_schema_length,
            delimiter: self.delimiter,
        }
    }

    /// Overlay the selections given on the command line onto `initial`.
    /// Hues are never defaulted.
    pub fn selection(&self, initial: SelectionState) -> SelectionState {
        let numeric = self.numeric.clone().or(initial.numeric.clone());
        let categorical = self.categorical.clone().or(initial.categorical.clone());
        initial
            .with_numeric(numeric)
            .with_numeric_hue(self.numeric_hue.clone())
            .with_categorical(categorical)
            .with_categorical_hue(self.categorical_hue.clone())
    }

    /// Directory the reports are written to.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            self.input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf()
        })
    }

    /// `<output_dir>/<stem>_eda.html`
    pub fn html_path(&self) -> PathBuf {
        self.report_path("html")
    }

    /// `<output_dir>/<stem>_eda.json`, only when `--json` is set.
    pub fn json_path(&self) -> Option<PathBuf> {
        self.json.then(|| self.report_path("json"))
    }

    fn report_path(&self, extension: &str) -> PathBuf {
        let stem = self
            .input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("data");
        self.output_dir()
            .join(format!("{}_eda.{}", stem, extension))
    }
}

/// Validator for the delimiter parameter
fn validate_delimiter(s: &str) -> Result<u8, String> {
    let value = match s {
        "\\t" | "tab" => "\t",
        other => other,
    };
    match value.as_bytes() {
        [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => Ok(*b),
        _ => Err(format!(
            "delimiter must be a single ASCII character other than a quote or newline, got '{}'",
            s
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_delimiter() {
        assert_eq!(validate_delimiter(","), Ok(b','));
        assert_eq!(validate_delimiter(";"), Ok(b';'));
        assert_eq!(validate_delimiter("\\t"), Ok(b'\t'));
        assert!(validate_delimiter(",,").is_err());
        assert!(validate_delimiter("\"").is_err());
        assert!(validate_delimiter("é").is_err());
    }
}
