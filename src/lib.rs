//! datalens: exploratory data analysis for CSV files
//!
//! Loads a CSV into a typed table, classifies its columns and renders a
//! dashboard of summary statistics, missing values, distributions,
//! categorical frequencies and correlations to the terminal, an HTML page
//! and optionally JSON.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
