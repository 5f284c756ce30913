//! Shared test utilities and fixture generators

#![allow(dead_code)]

use datalens::pipeline::Table;
use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Five people, one missing age.
///
/// - `age`: numeric, 1 of 5 missing (20%)
/// - `city`: categorical, complete, Paris and Lyon tied at 2
pub fn create_age_city_table() -> Table {
    let df = df! {
        "age" => [Some(25i64), None, Some(40), Some(31), Some(52)],
        "city" => ["Paris", "Lyon", "Paris", "Nice", "Lyon"],
    }
    .unwrap();
    Table::new(df)
}

/// `y` is an exact copy of `x`.
pub fn create_linear_table() -> Table {
    let df = df! {
        "x" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        "y" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
    }
    .unwrap();
    Table::new(df)
}

/// Mixed numeric and categorical columns with known correlation patterns
///
/// - `a`: 1..10
/// - `b`: 2 * a (perfectly correlated with `a`)
/// - `c`: 10..1 (perfectly anti-correlated with `a`)
/// - `d`: unrelated values
/// - `group`: categorical hue with groups in first-appearance order g1, g2
/// - `color`: categorical with one missing value
pub fn create_mixed_table() -> Table {
    let df = df! {
        "a" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        "b" => [2.0f64, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0],
        "c" => [10.0f64, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0],
        "d" => [5.0f64, 1.0, 8.0, 2.0, 9.0, 3.0, 7.0, 4.0, 6.0, 0.0],
        "group" => ["g1", "g1", "g2", "g1", "g2", "g2", "g1", "g2", "g1", "g2"],
        "color" => [Some("red"), Some("blue"), Some("red"), None, Some("green"),
                    Some("red"), Some("blue"), Some("red"), Some("green"), Some("blue")],
    }
    .unwrap();
    Table::new(df)
}

/// Two numeric columns with no strong relationship.
pub fn create_uncorrelated_table() -> Table {
    let df = df! {
        "p" => [1.0f64, 5.0, 2.0, 8.0, 3.0, 7.0, 4.0, 6.0, 9.0, 0.0],
        "q" => [3.0f64, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0],
    }
    .unwrap();
    Table::new(df)
}

/// Only categorical columns.
pub fn create_categorical_only_table() -> Table {
    let df = df! {
        "fruit" => ["apple", "pear", "apple"],
        "size" => ["S", "M", "L"],
    }
    .unwrap();
    Table::new(df)
}

/// Random numeric table for stress tests
pub fn create_random_table(rows: usize, cols: usize) -> Table {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    let mut columns: Vec<Column> = Vec::with_capacity(cols);
    for i in 0..cols {
        let values: Vec<Option<f64>> = (0..rows)
            .map(|_| {
                if rng.gen_bool(0.05) {
                    None
                } else {
                    Some(rng.gen::<f64>() * 100.0)
                }
            })
            .collect();
        columns.push(Column::new(format!("feature_{}", i).into(), values));
    }

    Table::new(DataFrame::new(columns).unwrap())
}

/// Write raw CSV content to a file in a fresh temporary directory
pub fn create_temp_csv(content: &[u8]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");
    std::fs::write(&csv_path, content).unwrap();
    (temp_dir, csv_path)
}

/// CSV text of the age/city scenario
pub const AGE_CITY_CSV: &str = "age,city\n25,Paris\n,Lyon\n40,Paris\n31,Nice\n52,Lyon\n";
