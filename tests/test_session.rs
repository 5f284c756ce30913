//! Tests for the session snapshot and selection-driven recomputation

use datalens::pipeline::{
    load_table_from_bytes, Branch, ColumnKind, ColumnSchema, EdaError, LoadOptions, Schema,
    SelectionState, Session, Table,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_initial_selection() {
    let session = Session::new(common::create_mixed_table()).unwrap();
    let selection = session.initial_selection();

    assert_eq!(selection.numeric.as_deref(), Some("a"));
    assert_eq!(selection.categorical.as_deref(), Some("group"));
    assert_eq!(selection.numeric_hue, None);
    assert_eq!(selection.categorical_hue, None);
}

#[test]
fn test_validate_rejects_bad_selections() {
    let table = common::create_age_city_table();

    let unknown = SelectionState::default().with_numeric(Some("height".to_string()));
    assert!(matches!(
        unknown.validate(&table),
        Err(EdaError::UnknownColumn(ref c)) if c == "height"
    ));

    let wrong = SelectionState::default().with_numeric_hue(Some("age".to_string()));
    assert!(matches!(wrong.validate(&table), Err(EdaError::WrongKind { .. })));

    assert!(SelectionState::initial(&table).validate(&table).is_ok());
}

#[test]
fn test_dashboard_all_branches() {
    let session = Session::new(common::create_mixed_table()).unwrap();
    let selection = session
        .initial_selection()
        .with_numeric_hue(Some("group".to_string()))
        .with_categorical(Some("color".to_string()));
    let dashboard = session.dashboard(&selection);

    let distribution = dashboard.distribution.as_ref().unwrap();
    assert_eq!(distribution.groups.len(), 2);
    assert!(dashboard.pairwise.is_ok());
    assert_eq!(
        dashboard.categorical.as_ref().unwrap().frequency.column,
        "color"
    );
    assert_eq!(dashboard.correlation.as_ref().unwrap().insights.len(), 3);
    assert!(dashboard.messages().is_empty());
}

#[test]
fn test_selection_change_recomputes_only_from_snapshot() {
    let session = Session::new(common::create_mixed_table()).unwrap();
    let first = session.dashboard(&session.initial_selection());
    let second = session.dashboard(&session.initial_selection().with_numeric(Some("d".to_string())));

    assert_eq!(first.distribution.as_ref().unwrap().column, "a");
    assert_eq!(second.distribution.as_ref().unwrap().column, "d");
    // Summary is shared and unchanged
    assert!(std::ptr::eq(first.summary, second.summary));
}

#[test]
fn test_one_numeric_column_skips_with_message() {
    let session = Session::new(common::create_age_city_table()).unwrap();
    let dashboard = session.dashboard(&session.initial_selection());

    assert!(dashboard.distribution.is_ok());
    assert!(dashboard.categorical.is_ok());
    assert!(dashboard.pairwise.is_err());
    assert!(dashboard.correlation.is_err());

    let messages = dashboard.messages();
    assert_eq!(messages.len(), 2, "Pairwise and correlation should each explain the skip");
    assert!(messages[0].contains("at least 2 numeric columns"));
}

#[test]
fn test_empty_selections_render_nothing() {
    let session = Session::new(common::create_linear_table()).unwrap();
    let dashboard = session.dashboard(&SelectionState::default());

    assert!(dashboard.distribution.as_ref().unwrap_err().is_empty_selection());
    assert!(dashboard.categorical.as_ref().unwrap_err().is_empty_selection());
    assert!(dashboard.messages().is_empty());
}

#[test]
fn test_zero_row_session() {
    let table = load_table_from_bytes(b"a,b\n", LoadOptions::default()).unwrap();
    let session = Session::new(table).unwrap();
    let dashboard = session.dashboard(&session.initial_selection());

    assert_eq!(dashboard.summary.rows, 0);
    assert!(dashboard.categorical.as_ref().unwrap().frequency.rows.is_empty());
    assert!(dashboard.correlation.is_err());
}

#[test]
fn test_dashboard_serializes_skipped_sections() {
    let session = Session::new(common::create_age_city_table()).unwrap();
    let dashboard = session.dashboard(&session.initial_selection());
    let json = serde_json::to_value(&dashboard).unwrap();

    assert_eq!(json["selection"]["numeric"], "age");
    assert!(json["pairwise"]["skipped"].is_string());
    assert_eq!(json["categorical"]["frequency"]["column"], "city");
    assert_eq!(json["summary"]["missing"]["total_missing"], 1);
}

fn code_value_frame() -> DataFrame {
    df! {
        "code" => [1i64, 2, 1, 3],
        "v" => [0.5f64, 1.5, 2.5, 3.5],
    }
    .unwrap()
}

fn column(name: &str, kind: ColumnKind, dtype: &str) -> ColumnSchema {
    ColumnSchema {
        name: name.to_string(),
        kind,
        dtype: dtype.to_string(),
        non_null: 4,
    }
}

#[test]
fn test_explicit_schema_drives_branches() {
    let schema = Schema::new(vec![
        column("code", ColumnKind::Categorical, "i64"),
        column("v", ColumnKind::Numeric, "f64"),
    ]);
    let table = Table::with_schema(code_value_frame(), schema).unwrap();
    assert_eq!(table.categorical_columns(), vec!["code"]);

    let session = Session::new(table).unwrap();
    let selection = session.initial_selection();
    assert_eq!(selection.numeric.as_deref(), Some("v"));
    assert_eq!(selection.categorical.as_deref(), Some("code"));

    let dashboard = session.dashboard(&selection);
    let frequency = &dashboard.categorical.as_ref().unwrap().frequency;
    assert_eq!(frequency.rows[0].value, "1");
    assert_eq!(frequency.rows[0].count, 2);
    assert!(matches!(
        dashboard.correlation,
        Err(EdaError::InsufficientColumns { found: 1, .. })
    ));

    let as_numeric = SelectionState::default().with_numeric(Some("code".to_string()));
    assert!(matches!(
        as_numeric.validate(session.table()),
        Err(EdaError::WrongKind {
            expected: Branch::Numeric,
            ..
        })
    ));
}

#[test]
fn test_explicit_schema_rejects_reordered_columns() {
    let schema = Schema::new(vec![
        column("v", ColumnKind::Numeric, "f64"),
        column("code", ColumnKind::Numeric, "i64"),
    ]);
    let err = Table::with_schema(code_value_frame(), schema).unwrap_err();

    assert!(matches!(
        err,
        EdaError::ColumnOrder { position: 0, ref expected, ref found }
            if expected == "code" && found == "v"
    ));
}

#[test]
fn test_explicit_schema_rejects_unknown_column() {
    let schema = Schema::new(vec![
        column("code", ColumnKind::Numeric, "i64"),
        column("w", ColumnKind::Numeric, "f64"),
    ]);
    let err = Table::with_schema(code_value_frame(), schema).unwrap_err();

    assert!(matches!(err, EdaError::UnknownColumn(ref c) if c == "w"));
}
