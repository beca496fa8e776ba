//! Command-line argument definitions using clap

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::{ConvergenceCheck, DiscretizerConfig};

/// woebin - Weight-of-Evidence binning with greedy adjacent-bin merging
#[derive(Parser, Debug)]
#[command(name = "woebin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Binary target column name (values 0/1)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Feature columns to discretize (comma-separated).
    /// Defaults to every numeric column except the target.
    #[arg(short, long = "feature", value_delimiter = ',')]
    pub features: Vec<String>,

    /// Number of initial quantile bins
    #[arg(long, default_value = "4", value_parser = validate_bins)]
    pub bins: usize,

    /// Convergence threshold for adjacent WoE gaps and WoE drift
    #[arg(long, default_value = "0.01", value_parser = validate_epsilon)]
    pub epsilon: f64,

    /// Maximum number of merge iterations per feature
    #[arg(long, default_value = "100")]
    pub max_iter: usize,

    /// Laplace smoothing constant added to every bin count (must be > 0)
    #[arg(long, default_value = "0.5", value_parser = validate_laplace_epsilon)]
    pub laplace_epsilon: f64,

    /// How WoE vectors of different lengths are compared after a merge.
    /// Options: "skip-on-resize" (default) or "overlapping-prefix"
    #[arg(long, default_value = "skip-on-resize")]
    pub convergence_check: ConvergenceCheck,

    /// JSON export path.
    /// Defaults to the input directory with a '_woe_bins.json' suffix.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip writing the JSON export
    #[arg(long, default_value = "false")]
    pub no_export: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Monthly stability of a variable's categories (counts and event rates)
    Stability {
        /// Input file path (CSV or Parquet)
        #[arg(short, long)]
        input: PathBuf,

        /// Variable whose categories are tracked
        #[arg(long)]
        variable: String,

        /// Binary target column name (values 0/1)
        #[arg(short, long)]
        target: String,

        /// Column holding month names (Jan..Dec or full names)
        #[arg(long, default_value = "month")]
        month: String,

        /// Discretize a numeric variable into this many initial bins first,
        /// so categories are WoE bin labels
        #[arg(long, value_parser = validate_bins)]
        bins: Option<usize>,

        /// Number of rows to use for schema inference (CSV only)
        #[arg(long, default_value = "10000")]
        infer_schema_length: usize,
    },
}

impl Cli {
    /// Input path of the discretize pipeline, if provided.
    pub fn input(&self) -> Option<&PathBuf> {
        self.input.as_ref()
    }

    /// JSON export path, derived from the input when not given explicitly.
    /// `None` when exporting is disabled or there is no input.
    pub fn export_path(&self) -> Option<PathBuf> {
        if self.no_export {
            return None;
        }
        if let Some(output) = &self.output {
            return Some(output.clone());
        }
        let input = self.input.as_ref()?;
        let parent = input.parent().unwrap_or_else(|| std::path::Path::new("."));
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        Some(parent.join(format!("{}_woe_bins.json", stem)))
    }

    pub fn discretizer_config(&self) -> DiscretizerConfig {
        DiscretizerConfig {
            num_bins: self.bins,
            epsilon: self.epsilon,
            max_iter: self.max_iter,
            laplace_epsilon: self.laplace_epsilon,
            convergence_check: self.convergence_check,
        }
    }
}

fn parse_f64(s: &str) -> Result<f64, String> {
    s.parse()
        .map_err(|_| format!("'{}' is not a valid number", s))
}

/// Validator for the initial bin count
fn validate_bins(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid bin count", s))?;

    if value < 1 {
        Err("bins must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for the convergence threshold
fn validate_epsilon(s: &str) -> Result<f64, String> {
    let value = parse_f64(s)?;

    if !value.is_finite() || value < 0.0 {
        Err(format!("epsilon must be a finite value >= 0, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for the smoothing constant
fn validate_laplace_epsilon(s: &str) -> Result<f64, String> {
    let value = parse_f64(s)?;

    if !value.is_finite() || value <= 0.0 {
        Err(format!(
            "laplace_epsilon must be a finite value > 0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
