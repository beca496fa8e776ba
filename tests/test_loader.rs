//! Integration tests for dataset loading, observation extraction and batch runs

use polars::prelude::*;
use std::io::Write;
use tempfile::TempDir;
use woebin::pipeline::{
    discretize_features, extract_observations, get_column_names, load_dataset,
    load_dataset_with_progress, numeric_feature_columns, DiscretizerConfig, Termination,
};

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_load_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "a,b,c").unwrap();
    writeln!(file, "1,2,3").unwrap();
    writeln!(file, "4,5,6").unwrap();
    drop(file);

    let (df, rows, cols, mem_mb) = load_dataset_with_progress(&csv_path, 100).unwrap();

    assert_eq!(rows, 2, "Should have 2 data rows");
    assert_eq!(cols, 3, "Should have 3 columns");
    assert_eq!(df.get_column_names(), &["a", "b", "c"]);
    assert!(mem_mb >= 0.0, "Memory estimate should be non-negative");
}

#[test]
fn test_load_parquet_file() {
    let mut df = common::create_golden_dataframe();
    let (_temp_dir, parquet_path) = common::create_temp_parquet(&mut df);

    let loaded = load_dataset(&parquet_path, 100).unwrap();

    assert_eq!(loaded.shape(), (13, 5));
    assert_eq!(
        loaded.get_column_names(),
        &["target", "score", "score_missing", "feature_constant", "label"]
    );
}

#[test]
fn test_get_column_names_csv() {
    let mut df = common::create_golden_dataframe();
    let (_temp_dir, csv_path) = common::create_temp_csv(&mut df);

    let columns = get_column_names(&csv_path).unwrap();

    assert_eq!(
        columns,
        vec!["target", "score", "score_missing", "feature_constant", "label"]
    );
}

#[test]
fn test_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let bad_path = temp_dir.path().join("test.xlsx");
    std::fs::File::create(&bad_path).unwrap();

    let result = load_dataset_with_progress(&bad_path, 100);

    assert!(result.is_err(), "Unsupported format should return error");
    let err_msg = result.unwrap_err().to_string();
    assert!(
        err_msg.contains("Unsupported"),
        "Error message should mention unsupported format: {}",
        err_msg
    );
}

#[test]
fn test_nonexistent_file() {
    let path = std::path::Path::new("/nonexistent/path/to/file.csv");

    let result = load_dataset_with_progress(path, 100);

    assert!(result.is_err(), "Nonexistent file should return error");
}

#[test]
fn test_csv_missing_values_are_skipped_not_binned() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("missing.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "target,x").unwrap();
    writeln!(file, "0,1.5").unwrap();
    writeln!(file, "1,").unwrap();
    writeln!(file, ",3.5").unwrap();
    writeln!(file, "1,4.5").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, 100).unwrap();
    let extracted = extract_observations(&df, "x", "target").unwrap();

    assert_eq!(extracted.skipped_rows, 2);
    assert_eq!(extracted.observations.len(), 2);
    assert!(extracted.observations[1].event);
}

#[test]
fn test_numeric_features_of_loaded_csv() {
    let mut df = common::create_golden_dataframe();
    let (_temp_dir, csv_path) = common::create_temp_csv(&mut df);

    let loaded = load_dataset(&csv_path, 0).unwrap();

    assert_eq!(
        numeric_feature_columns(&loaded, "target"),
        vec!["score", "score_missing", "feature_constant"]
    );
}

#[test]
fn test_batch_from_parquet_matches_reference_scenario() {
    let mut df = common::create_golden_dataframe();
    let (_temp_dir, parquet_path) = common::create_temp_parquet(&mut df);
    let loaded = load_dataset(&parquet_path, 100).unwrap();

    let features = numeric_feature_columns(&loaded, "target");
    let batch =
        discretize_features(&loaded, "target", &features, &DiscretizerConfig::default()).unwrap();

    assert_eq!(batch.features.len(), 2);
    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].feature_name, "feature_constant");

    let score = batch
        .features
        .iter()
        .find(|f| f.feature_name == "score")
        .unwrap();
    assert_eq!(score.skipped_rows, 0);
    assert_eq!(score.result.bins.len(), 1);
    assert_eq!(score.result.iterations_run, 4);
    assert_eq!(score.result.termination, Termination::MergeGapWithinEpsilon);

    let missing = batch
        .features
        .iter()
        .find(|f| f.feature_name == "score_missing")
        .unwrap();
    assert_eq!(missing.skipped_rows, 2);
    assert_eq!(
        missing.result.total_events + missing.result.total_non_events,
        11
    );
}

#[test]
fn test_batch_is_sorted_by_information_value() {
    let df = common::create_large_test_dataframe(500, 6, 7);
    let features = numeric_feature_columns(&df, "target");
    let config = DiscretizerConfig {
        num_bins: 5,
        ..Default::default()
    };

    let batch = discretize_features(&df, "target", &features, &config).unwrap();

    assert_eq!(batch.features.len(), 6);
    for pair in batch.features.windows(2) {
        assert!(pair[0].result.information_value >= pair[1].result.information_value);
    }
}

#[test]
fn test_schema_inference_length() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("inference.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "tricky_col").unwrap();
    for i in 0..100 {
        writeln!(file, "{}", i).unwrap();
    }
    drop(file);

    let (df_short, _, _, _) = load_dataset_with_progress(&csv_path, 10).unwrap();
    let (df_full, _, _, _) = load_dataset_with_progress(&csv_path, 0).unwrap();

    assert_eq!(df_short.height(), 100);
    assert_eq!(df_full.height(), 100);
}
