//! Discretize many feature columns of a dataset
//!
//! Each feature runs the single-threaded discretizer on its own rayon task;
//! nothing is shared between features except the progress counter.

use anyhow::Result;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use super::discretizer::{discretize, DiscretizationResult, DiscretizerConfig};
use super::loader::{extract_observations, validate_binary_target};
use crate::utils::create_feature_bar;

/// Discretization of a single dataset column
#[derive(Debug, Clone, Serialize)]
pub struct FeatureDiscretization {
    pub feature_name: String,
    /// Rows dropped because the feature or target was missing
    pub skipped_rows: usize,
    #[serde(flatten)]
    pub result: DiscretizationResult,
}

/// A feature that could not be discretized
#[derive(Debug, Clone, Serialize)]
pub struct FeatureFailure {
    pub feature_name: String,
    pub reason: String,
}

/// Results of discretizing several columns
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchDiscretization {
    /// Successful features, sorted by Information Value descending
    pub features: Vec<FeatureDiscretization>,
    /// Features that failed, in input order
    pub failures: Vec<FeatureFailure>,
}

/// Discretize one column against the binary target.
pub fn discretize_feature(
    df: &DataFrame,
    feature: &str,
    target: &str,
    config: &DiscretizerConfig,
) -> Result<FeatureDiscretization> {
    let extracted = extract_observations(df, feature, target)?;
    let result = discretize(&extracted.observations, config)?;

    for warning in result.warnings() {
        tracing::warn!(feature, %warning, "non-fatal discretization condition");
    }

    Ok(FeatureDiscretization {
        feature_name: extracted.feature_name,
        skipped_rows: extracted.skipped_rows,
        result,
    })
}

/// Discretize every listed feature in parallel.
///
/// The target is validated once up front. A failing feature (constant column,
/// too few distinct values, a single outcome class) is recorded in
/// `failures` and does not abort the batch.
pub fn discretize_features(
    df: &DataFrame,
    target: &str,
    features: &[String],
    config: &DiscretizerConfig,
) -> Result<BatchDiscretization> {
    validate_binary_target(df, target)?;
    config.validate()?;

    if features.is_empty() {
        return Ok(BatchDiscretization::default());
    }

    let total = features.len() as u64;
    let pb = create_feature_bar(total);

    let progress_counter = AtomicU64::new(0);

    let outcomes: Vec<std::result::Result<FeatureDiscretization, FeatureFailure>> = features
        .par_iter()
        .map(|feature| {
            let outcome = discretize_feature(df, feature, target, config).map_err(|e| {
                tracing::warn!(feature = feature.as_str(), error = %e, "feature skipped");
                FeatureFailure {
                    feature_name: feature.clone(),
                    reason: e.to_string(),
                }
            });

            let count = progress_counter.fetch_add(1, Ordering::Relaxed);
            if count % 10 == 0 || count == total - 1 {
                pb.set_position(count + 1);
            }

            outcome
        })
        .collect();

    let mut batch = BatchDiscretization::default();
    for outcome in outcomes {
        match outcome {
            Ok(feature) => batch.features.push(feature),
            Err(failure) => batch.failures.push(failure),
        }
    }

    pb.finish_with_message(format!(
        "   [OK] Discretized {} features ({} failed)",
        batch.features.len(),
        batch.failures.len()
    ));

    batch.features.sort_by(|a, b| {
        b.result
            .information_value
            .partial_cmp(&a.result.information_value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    tracing::info!(
        succeeded = batch.features.len(),
        failed = batch.failures.len(),
        "batch discretization complete"
    );

    Ok(batch)
}
