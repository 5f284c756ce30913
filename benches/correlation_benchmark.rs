//! Benchmark for the correlation matrix and the pairwise branch
//!
//! Run with: cargo bench --bench correlation_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

use datalens::pipeline::{analyze_pairwise, correlation_matrix, Table};

/// Generate synthetic numeric columns with some missing values and a few
/// correlated pairs.
fn generate_columns(n_rows: usize, n_cols: usize, seed: u64) -> Vec<(String, Vec<Option<f64>>)> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut columns: Vec<(String, Vec<Option<f64>>)> = Vec::with_capacity(n_cols);

    for i in 0..n_cols {
        let values: Vec<Option<f64>> = if i % 4 == 3 {
            // Noisy copy of an earlier column
            columns[i - 3]
                .1
                .iter()
                .map(|v| v.map(|x| x + rng.gen::<f64>() * 10.0 - 5.0))
                .collect()
        } else {
            (0..n_rows)
                .map(|_| {
                    if rng.gen_bool(0.02) {
                        None
                    } else {
                        Some(rng.gen::<f64>() * 100.0)
                    }
                })
                .collect()
        };
        columns.push((format!("feature_{}", i), values));
    }

    columns
}

fn to_table(columns: &[(String, Vec<Option<f64>>)]) -> Table {
    let cols: Vec<Column> = columns
        .iter()
        .map(|(name, values)| Column::new(name.as_str().into(), values.clone()))
        .collect();
    Table::new(DataFrame::new(cols).expect("Failed to create DataFrame"))
}

/// Correlation matrix for a fixed row count and a growing column count
fn benchmark_matrix_by_columns(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_matrix_by_columns");
    group.sample_size(20);

    let n_rows = 10_000;
    for n_cols in [5, 10, 25, 50] {
        let columns = generate_columns(n_rows, n_cols, 42);
        group.throughput(Throughput::Elements((n_cols * (n_cols - 1) / 2) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_cols), &columns, |b, cols| {
            b.iter(|| correlation_matrix(black_box(cols)))
        });
    }

    group.finish();
}

/// Correlation matrix for a fixed column count and a growing row count
fn benchmark_matrix_by_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_matrix_by_rows");
    group.sample_size(20);

    let n_cols = 10;
    for n_rows in [1_000, 10_000, 100_000] {
        let columns = generate_columns(n_rows, n_cols, 7);
        group.throughput(Throughput::Elements(n_rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_rows), &columns, |b, cols| {
            b.iter(|| correlation_matrix(black_box(cols)))
        });
    }

    group.finish();
}

/// Full pairwise branch including the complete-row filter
fn benchmark_pairwise_branch(c: &mut Criterion) {
    let table = to_table(&generate_columns(10_000, 12, 3));
    c.bench_function("analyze_pairwise_10k_x_12", |b| {
        b.iter(|| analyze_pairwise(black_box(&table)).expect("pairwise failed"))
    });
}

criterion_group!(
    benches,
    benchmark_matrix_by_columns,
    benchmark_matrix_by_rows,
    benchmark_pairwise_branch
);
criterion_main!(benches);
