//! Dataset loader for CSV and Parquet files, and observation extraction

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use super::observation::Observation;
use crate::utils::{create_spinner, finish_with_success};

/// Tolerance for floating point comparison when checking binary 0/1 values
const TOLERANCE: f64 = 1e-9;

/// Observations extracted from one feature column
#[derive(Debug, Clone)]
pub struct ExtractedFeature {
    pub feature_name: String,
    pub observations: Vec<Observation>,
    /// Rows dropped because the feature or target was null or non-finite
    pub skipped_rows: usize,
}

fn csv_reader(path: &Path, infer_schema_length: usize) -> LazyCsvReader {
    // 0 means scan the whole file
    let infer = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };
    LazyCsvReader::new(path).with_infer_schema_length(infer)
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Load a dataset from a file (CSV or Parquet based on extension)
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let lf = match file_extension(path).as_str() {
        "csv" => csv_reader(path, infer_schema_length)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        other => anyhow::bail!(
            "Unsupported file format: '{}'. Supported formats: csv, parquet",
            other
        ),
    };

    lf.collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))
}

/// Load a dataset behind a spinner and report its shape.
///
/// Returns `(dataframe, rows, columns, estimated_memory_mb)`.
pub fn load_dataset_with_progress(
    path: &Path,
    infer_schema_length: usize,
) -> Result<(DataFrame, usize, usize, f64)> {
    let spinner = create_spinner(&format!("Loading {}...", path.display()));
    let df = load_dataset(path, infer_schema_length)?;
    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    finish_with_success(&spinner, &format!("Loaded {} rows x {} columns", rows, cols));
    tracing::info!(path = %path.display(), rows, cols, memory_mb, "dataset loaded");
    Ok((df, rows, cols, memory_mb))
}

/// Read column names without loading the data.
pub fn get_column_names(path: &Path) -> Result<Vec<String>> {
    let mut lf = match file_extension(path).as_str() {
        "csv" => csv_reader(path, 100)
            .finish()
            .with_context(|| format!("Failed to read CSV header: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to read Parquet schema: {}", path.display()))?,
        other => anyhow::bail!(
            "Unsupported file format: '{}'. Supported formats: csv, parquet",
            other
        ),
    };

    let schema = lf
        .collect_schema()
        .with_context(|| format!("Failed to read schema: {}", path.display()))?;
    Ok(schema.iter_names().map(|name| name.to_string()).collect())
}

/// Validate that the target column is binary (contains only 0 and 1)
///
/// Handles the shapes CSV/Parquet conversion produces:
/// - Empty or all-null columns
/// - Float64 columns with values like 0.0 and 1.0 (with tolerance)
/// - Integer columns with 0 and 1
pub fn validate_binary_target(df: &DataFrame, target: &str) -> Result<()> {
    let target_col = df
        .column(target)
        .with_context(|| format!("Target column '{}' not found", target))?;

    if target_col.len() == 0 {
        anyhow::bail!("Target column '{}' is empty", target);
    }

    if target_col.null_count() == target_col.len() {
        anyhow::bail!("Target column '{}' contains only null values", target);
    }

    let float_col = target_col
        .cast(&DataType::Float64)
        .with_context(|| format!("Target column '{}' is not numeric", target))?;
    let unique = float_col.unique()?;

    let unique_values: Vec<f64> = unique.f64()?.into_iter().flatten().collect();

    let valid = unique_values.len() <= 2
        && unique_values
            .iter()
            .all(|&v| v.abs() < TOLERANCE || (v - 1.0).abs() < TOLERANCE);

    if !valid {
        anyhow::bail!(
            "Target column '{}' must be binary (0/1). Found {} unique values: {:?}",
            target,
            unique_values.len(),
            unique_values
        );
    }

    Ok(())
}

/// Numeric columns eligible for discretization (every numeric column except the target).
pub fn numeric_feature_columns(df: &DataFrame, target: &str) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric() && col.name().as_str() != target)
        .map(|col| col.name().to_string())
        .collect()
}

/// Pair a numeric feature column with the binary target.
///
/// The target must already have passed [`validate_binary_target`]. Rows with a
/// null target, a null feature value or a non-finite feature value are skipped
/// and counted in `skipped_rows`.
pub fn extract_observations(df: &DataFrame, feature: &str, target: &str) -> Result<ExtractedFeature> {
    let feature_col = df
        .column(feature)
        .with_context(|| format!("Feature column '{}' not found", feature))?;

    if !feature_col.dtype().is_primitive_numeric() {
        anyhow::bail!(
            "Feature column '{}' must be numeric, found {}",
            feature,
            feature_col.dtype()
        );
    }

    let float_col = feature_col.cast(&DataType::Float64)?;
    let values = float_col.f64()?;

    let target_col = df
        .column(target)
        .with_context(|| format!("Target column '{}' not found", target))?
        .cast(&DataType::Float64)?;
    let targets = target_col.f64()?;

    let mut observations = Vec::with_capacity(values.len());
    let mut skipped_rows = 0usize;

    for (value, outcome) in values.iter().zip(targets.iter()) {
        match (value, outcome) {
            (Some(v), Some(t)) if v.is_finite() => {
                observations.push(Observation::new(v, (t - 1.0).abs() < TOLERANCE));
            }
            _ => skipped_rows += 1,
        }
    }

    if skipped_rows > 0 {
        tracing::debug!(feature, skipped_rows, "skipped rows with missing values");
    }

    Ok(ExtractedFeature {
        feature_name: feature.to_string(),
        observations,
        skipped_rows,
    })
}
