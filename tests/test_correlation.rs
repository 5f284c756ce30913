//! Tests for correlation analysis

use datalens::pipeline::{
    analyze_correlation, correlation_matrix, numeric_correlation_matrix, pearson_correlation,
    EdaError, HIGH_CORRELATION_THRESHOLD,
};

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_identical_columns_correlate_perfectly() {
    let table = common::create_linear_table();
    let report = analyze_correlation(&table).unwrap();

    let r = report.matrix.get_by_name("x", "y").unwrap();
    assert_eq!(format!("{:.2}", r), "1.00");

    assert_eq!(report.insights.len(), 1);
    let line = &report.insight_lines()[0];
    assert!(line.contains("`x`") && line.contains("`y`"), "Insight should name both columns: {}", line);
    assert!(line.contains("possible multicollinearity"));
}

#[test]
fn test_insights_come_from_lower_triangle() {
    let table = common::create_mixed_table();
    let report = analyze_correlation(&table).unwrap();

    let pairs: Vec<(&str, &str)> = report
        .insights
        .iter()
        .map(|p| (p.feature1.as_str(), p.feature2.as_str()))
        .collect();
    // Row column first, in column order; each pair once
    assert_eq!(pairs, vec![("b", "a"), ("c", "a"), ("c", "b")]);
    assert!(report.insights[1].correlation < -0.99);
    assert_eq!(report.threshold, HIGH_CORRELATION_THRESHOLD);
}

#[test]
fn test_matrix_symmetric_with_unit_diagonal() {
    let table = common::create_random_table(300, 5);
    let matrix = numeric_correlation_matrix(&table).unwrap();

    assert_eq!(matrix.len(), 5);
    for i in 0..matrix.len() {
        assert_eq!(matrix.get(i, i), Some(1.0));
        for j in 0..matrix.len() {
            let a = matrix.get(i, j).unwrap();
            let b = matrix.get(j, i).unwrap();
            assert_eq!(a, b, "Matrix should be symmetric at ({}, {})", i, j);
            assert!((-1.0..=1.0).contains(&a));
        }
    }
}

#[test]
fn test_constant_column_is_undefined() {
    let columns = vec![
        ("a".to_string(), vec![Some(1.0), Some(2.0), Some(3.0)]),
        ("k".to_string(), vec![Some(5.0), Some(5.0), Some(5.0)]),
    ];
    let matrix = correlation_matrix(&columns);

    assert_eq!(matrix.get(0, 1), None);
    assert_eq!(matrix.get(1, 1), None, "Constant column has no self-correlation");
    assert_eq!(matrix.get(0, 0), Some(1.0));
    assert!(matrix.lower_triangle_pairs_above(0.8).is_empty());
}

#[test]
fn test_pairwise_complete_observations() {
    let x = vec![Some(1.0), Some(2.0), None, Some(4.0), Some(5.0)];
    let y = vec![Some(2.0), Some(4.0), Some(100.0), Some(8.0), None];

    // Only rows 0, 1 and 3 are used
    let r = pearson_correlation(&x, &y).unwrap();
    assert!((r - 1.0).abs() < 1e-12);

    let too_few = vec![Some(1.0), None, None, None, None];
    assert_eq!(pearson_correlation(&too_few, &y), None);
}

#[test]
fn test_uncorrelated_has_no_insights() {
    let table = common::create_uncorrelated_table();
    let report = analyze_correlation(&table).unwrap();

    assert!(report.insights.is_empty());
    assert!(report.matrix.get_by_name("p", "q").unwrap().abs() < HIGH_CORRELATION_THRESHOLD);
}

#[test]
fn test_needs_two_numeric_columns() {
    let table = common::create_age_city_table();
    let err = analyze_correlation(&table).unwrap_err();
    assert!(matches!(
        err,
        EdaError::InsufficientColumns {
            required: 2,
            found: 1
        }
    ));

    let table = common::create_categorical_only_table();
    let err = analyze_correlation(&table).unwrap_err();
    assert!(matches!(err, EdaError::InsufficientColumns { found: 0, .. }));
}

#[test]
fn test_matrix_serializes_undefined_as_null() {
    let columns = vec![
        ("a".to_string(), vec![Some(1.0), Some(2.0)]),
        ("k".to_string(), vec![Some(3.0), Some(3.0)]),
    ];
    let json = serde_json::to_value(correlation_matrix(&columns)).unwrap();

    assert_eq!(json["columns"], serde_json::json!(["a", "k"]));
    assert!(json["values"][0][1].is_null());
    assert_eq!(json["values"][0][0], serde_json::json!(1.0));
}
