//! JSON export of discretization results

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{BatchDiscretization, DiscretizerConfig, FeatureDiscretization, FeatureFailure};

/// Metadata about the discretization run
#[derive(Debug, Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub woebin_version: String,
    pub input_file: String,
    pub target_column: String,
    /// Parameters every feature was discretized with
    pub config: DiscretizerConfig,
}

/// Summary statistics of the run
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub features_discretized: usize,
    pub features_failed: usize,
    pub features_converged: usize,
    /// Features carrying at least one non-fatal warning
    pub features_with_warnings: usize,
    pub avg_iv: f64,
}

/// A feature entry with its warnings rendered as text
#[derive(Debug, Serialize)]
pub struct FeatureExportEntry<'a> {
    #[serde(flatten)]
    pub feature: &'a FeatureDiscretization,
    pub warnings: Vec<String>,
}

/// Complete export document
#[derive(Debug, Serialize)]
pub struct DiscretizationExport<'a> {
    pub metadata: RunMetadata,
    pub summary: RunSummary,
    pub features: Vec<FeatureExportEntry<'a>>,
    pub failures: &'a [FeatureFailure],
}

/// Parameters for the export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub target_column: &'a str,
    pub config: &'a DiscretizerConfig,
}

/// Assemble the export document for a batch.
pub fn build_export<'a>(
    batch: &'a BatchDiscretization,
    params: &ExportParams,
) -> DiscretizationExport<'a> {
    let features: Vec<FeatureExportEntry> = batch
        .features
        .iter()
        .map(|feature| FeatureExportEntry {
            feature,
            warnings: feature
                .result
                .warnings()
                .iter()
                .map(|w| w.to_string())
                .collect(),
        })
        .collect();

    let avg_iv = if batch.features.is_empty() {
        0.0
    } else {
        batch
            .features
            .iter()
            .map(|f| f.result.information_value)
            .sum::<f64>()
            / batch.features.len() as f64
    };

    DiscretizationExport {
        metadata: RunMetadata {
            timestamp: Utc::now().to_rfc3339(),
            woebin_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            target_column: params.target_column.to_string(),
            config: params.config.clone(),
        },
        summary: RunSummary {
            features_discretized: batch.features.len(),
            features_failed: batch.failures.len(),
            features_converged: batch.features.iter().filter(|f| f.result.converged).count(),
            features_with_warnings: features.iter().filter(|e| !e.warnings.is_empty()).count(),
            avg_iv,
        },
        features,
        failures: &batch.failures,
    }
}

/// Export discretization results to a JSON file with run metadata
pub fn export_discretization(
    batch: &BatchDiscretization,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let export = build_export(batch, params);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize discretization results to JSON")?;

    std::fs::write(output_path, json).with_context(|| {
        format!(
            "Failed to write discretization results to {}",
            output_path.display()
        )
    })?;

    tracing::info!(path = %output_path.display(), "discretization results exported");
    Ok(())
}
