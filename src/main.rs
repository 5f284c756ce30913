//! datalens: exploratory data analysis CLI
//!
//! Loads a CSV file, prints the dashboard to the terminal and writes a
//! self-contained HTML report. In a terminal the user can then change the
//! column selections and the report is re-rendered after each change.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing::debug;

use datalens::cli::{prompt_next_selection, Cli};
use datalens::pipeline::{load_table, Session};
use datalens::report::{print_dashboard, print_summary, write_reports, ReportOptions};
use datalens::utils::{
    create_spinner, finish_with_error, finish_with_success, print_banner, print_completion,
    print_config, print_success,
};

/// Initialise stderr logging. `RUST_LOG` overrides the level.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    print_banner(env!("CARGO_PKG_VERSION"));

    let output_dir = cli.output_dir();
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    // Load and classify
    let step_start = Instant::now();
    let spinner = create_spinner("Loading CSV file...");
    let table = match load_table(&cli.input, cli.load_options()) {
        Ok(table) => {
            finish_with_success(&spinner, "Dataset loaded");
            table
        }
        Err(e) => {
            finish_with_error(&spinner, "Failed to load dataset");
            return Err(e).with_context(|| format!("Could not load {}", cli.input.display()));
        }
    };

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", table.height());
    println!("      Columns: {}", table.width());
    println!(
        "      Numeric / categorical: {} / {}",
        table.numeric_columns().len(),
        table.categorical_columns().len()
    );
    println!("      Estimated memory: {:.2} MB", table.memory_mb());

    let session = Session::new(table).context("Failed to summarize dataset")?;
    debug!(elapsed_ms = step_start.elapsed().as_millis() as u64, "dataset ready");

    let mut selection = cli.selection(session.initial_selection());
    selection
        .validate(session.table())
        .context("Invalid column selection")?;

    let options = ReportOptions {
        input_file: cli.input.clone(),
        html_path: cli.html_path(),
        json_path: cli.json_path(),
    };
    print_config(&cli.input, &options.html_path, &selection);

    print_summary(session.summary());

    let interactive = !cli.no_interactive && console::user_attended();
    loop {
        let dashboard = session.dashboard(&selection);
        print_dashboard(&dashboard);

        println!();
        let spinner = create_spinner("Writing report...");
        match write_reports(&dashboard, &options) {
            Ok(()) => finish_with_success(&spinner, "Report written"),
            Err(e) => {
                finish_with_error(&spinner, "Failed to write report");
                return Err(e);
            }
        }
        if let Some(json_path) = &options.json_path {
            print_success(&format!("JSON export saved to {}", json_path.display()));
        }

        if !interactive {
            break;
        }
        println!();
        match prompt_next_selection(session.table(), &selection)? {
            Some(next) => selection = next,
            None => break,
        }
    }

    print_completion(&options.html_path);

    Ok(())
}
