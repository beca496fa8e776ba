//! Shared test utilities and fixture generators
#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;
use woebin::pipeline::Observation;

/// Values of the reference scenario
pub const GOLDEN_VALUES: [f64; 13] = [
    10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0, 110.0, 130.0, 150.0,
];

/// Outcomes of the reference scenario (8 events, 5 non-events)
pub const GOLDEN_OUTCOMES: [i64; 13] = [0, 1, 0, 1, 1, 0, 1, 0, 1, 0, 1, 1, 1];

/// Observations of the reference scenario
pub fn golden_observations() -> Vec<Observation> {
    GOLDEN_VALUES
        .iter()
        .zip(GOLDEN_OUTCOMES.iter())
        .map(|(&v, &o)| Observation::new(v, o == 1))
        .collect()
}

/// DataFrame holding the reference scenario plus columns that cannot be discretized
///
/// This DataFrame includes:
/// - `target`: Binary target column (0/1)
/// - `score`: The reference feature
/// - `score_missing`: `score` with two nulls
/// - `feature_constant`: Zero variance (fails with too few distinct values)
/// - `label`: String column (not a numeric feature)
pub fn create_golden_dataframe() -> DataFrame {
    let mut missing: Vec<Option<f64>> = GOLDEN_VALUES.iter().map(|&v| Some(v)).collect();
    missing[2] = None;
    missing[9] = None;

    df! {
        "target" => GOLDEN_OUTCOMES.iter().map(|&o| o as i32).collect::<Vec<_>>(),
        "score" => GOLDEN_VALUES.to_vec(),
        "score_missing" => missing,
        "feature_constant" => [5.0f64; 13],
        "label" => ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m"],
    }
    .unwrap()
}

/// Random observations whose event probability rises with the value
pub fn random_observations(seed: u64, n: usize) -> Vec<Observation> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut observations: Vec<Observation> = (0..n)
        .map(|_| {
            let value: f64 = rng.gen_range(0.0..100.0);
            let p = 0.1 + 0.8 * value / 100.0;
            Observation::new(value, rng.gen_bool(p))
        })
        .collect();

    // Guarantee both classes so every seed is a valid input
    observations.push(Observation::new(rng.gen_range(0.0..100.0), true));
    observations.push(Observation::new(rng.gen_range(0.0..100.0), false));
    observations
}

/// Create a larger test DataFrame for performance/stress tests
pub fn create_large_test_dataframe(rows: usize, cols: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut columns: Vec<Column> = Vec::with_capacity(cols + 1);

    let target: Vec<i32> = (0..rows).map(|_| rng.gen_range(0..2)).collect();
    columns.push(Column::new("target".into(), target));

    for i in 0..cols {
        let values: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>()).collect();
        columns.push(Column::new(format!("feature_{}", i).into(), values));
    }

    DataFrame::new(columns).unwrap()
}

/// DataFrame of the monthly stability example
pub fn create_stability_dataframe() -> DataFrame {
    df! {
        "col" => ["A", "B", "A", "B", "C", "A", "C", "B", "A", "C"],
        "cible" => [0i32, 1, 0, 1, 0, 1, 1, 0, 1, 0],
        "month" => ["Jan", "Jan", "Feb", "Feb", "Mar", "Mar", "Apr", "Apr", "May", "May"],
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert two floats agree to within `1e-9`
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
