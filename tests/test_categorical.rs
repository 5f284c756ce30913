//! Tests for the frequency table and count plot

use datalens::pipeline::{
    analyze_categorical, count_plot, frequency_table, value_counts, Branch, EdaError,
};

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_frequency_table_age_city() {
    let table = common::create_age_city_table();
    let freq = frequency_table(&table, "city").unwrap();

    let values: Vec<&str> = freq.rows.iter().map(|r| r.value.as_str()).collect();
    assert_eq!(values, vec!["Paris", "Lyon", "Nice"], "Descending count, ties stable");

    let counts: Vec<usize> = freq.rows.iter().map(|r| r.count).collect();
    assert_eq!(counts, vec![2, 2, 1]);

    assert!((freq.rows[0].percentage - 40.0).abs() < 1e-9);
    assert!((freq.rows[2].percentage - 20.0).abs() < 1e-9);
    assert!(
        (freq.percentage_sum() - 100.0).abs() < 1e-9,
        "Percentages should sum to 100 without missing values"
    );
}

#[test]
fn test_frequency_percentage_uses_total_rows() {
    let table = common::create_mixed_table();
    let freq = frequency_table(&table, "color").unwrap();

    assert_eq!(freq.total_rows, 10);
    let red = freq.rows.iter().find(|r| r.value == "red").unwrap();
    assert_eq!(red.count, 4);
    assert!((red.percentage - 40.0).abs() < 1e-9);
    // One missing value is not listed
    assert!((freq.percentage_sum() - 90.0).abs() < 1e-9);
}

#[test]
fn test_value_counts_ignores_missing() {
    let values = vec![
        Some("b".to_string()),
        None,
        Some("a".to_string()),
        Some("b".to_string()),
    ];
    let counts = value_counts(&values);

    assert_eq!(counts.len(), 2);
    assert_eq!(counts[0].value, "b");
    assert_eq!(counts[0].count, 2);
    assert_eq!(counts[1].value, "a");
}

#[test]
fn test_count_plot_without_hue() {
    let table = common::create_age_city_table();
    let plot = count_plot(&table, "city", None).unwrap();

    assert_eq!(plot.categories, vec!["Paris", "Lyon", "Nice"]);
    assert_eq!(plot.groups, vec!["city"]);
    assert_eq!(plot.counts, vec![vec![2], vec![2], vec![1]]);
    assert_eq!(plot.max_count(), 2);
}

#[test]
fn test_count_plot_with_hue() {
    let table = common::create_mixed_table();
    let plot = count_plot(&table, "color", Some("group")).unwrap();

    assert_eq!(plot.groups, vec!["g1", "g2"], "Hue groups in first-appearance order");
    assert_eq!(plot.categories[0], "red");
    // red rows: indices 0 (g1), 2 (g2), 5 (g2), 7 (g2)
    assert_eq!(plot.counts[0], vec![1, 3]);

    let total: usize = plot.counts.iter().flatten().sum();
    assert_eq!(total, 9, "Row with a missing color is not counted");
}

#[test]
fn test_empty_selection() {
    let table = common::create_age_city_table();
    let err = analyze_categorical(&table, None, None).unwrap_err();

    assert!(matches!(err, EdaError::EmptySelection(Branch::Categorical)));
    assert!(err.is_empty_selection());
}

#[test]
fn test_wrong_kind_and_unknown_column() {
    let table = common::create_age_city_table();

    let err = analyze_categorical(&table, Some("age"), None).unwrap_err();
    assert!(matches!(
        err,
        EdaError::WrongKind {
            expected: Branch::Categorical,
            ..
        }
    ));

    let err = analyze_categorical(&table, Some("city"), Some("nope")).unwrap_err();
    assert!(matches!(err, EdaError::UnknownColumn(ref c) if c == "nope"));
}

#[test]
fn test_zero_row_column() {
    let table = datalens::pipeline::load_table_from_bytes(
        b"fruit\n",
        datalens::pipeline::LoadOptions::default(),
    )
    .unwrap();
    let report = analyze_categorical(&table, Some("fruit"), None).unwrap();

    assert!(report.frequency.rows.is_empty());
    assert!(report.count_plot.categories.is_empty());
    assert_eq!(report.count_plot.max_count(), 0);
}
