//! woebin: Weight-of-Evidence binning CLI
//!
//! Discretizes the numeric features of a CSV or Parquet dataset against a
//! binary target and exports the resulting WoE bins as JSON.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use woebin::cli::{Cli, Commands};
use woebin::pipeline::{
    discretize_feature, discretize_features, get_column_names, load_dataset_with_progress,
    numeric_feature_columns, DiscretizerConfig,
};
use woebin::report::{
    analyze_stability, display_batch, display_feature, display_stability, export_discretization,
    stability_records_from_dataframe, ExportParams,
};
use woebin::utils::{
    self, create_spinner, finish_with_success, finish_with_warning, print_banner,
    print_completion, print_config, print_count, print_info, print_step_header, print_step_time,
    print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    utils::logging::init(cli.verbose)?;

    if let Some(command) = &cli.command {
        return match command {
            Commands::Stability {
                input,
                variable,
                target,
                month,
                bins,
                infer_schema_length,
            } => run_stability(input, variable, target, month, *bins, *infer_schema_length),
        };
    }

    let input = cli.input().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;
    let target = cli.target.clone().ok_or_else(|| {
        anyhow::anyhow!("Target column is required. Use -t/--target to specify.")
    })?;
    let export_path = cli.export_path();
    let config = cli.discretizer_config();
    config.validate()?;

    // Fail on a missing target before paying for a full load
    let columns = get_column_names(input)?;
    if !columns.contains(&target) {
        anyhow::bail!(
            "Target column '{}' not found in dataset. Available columns: {:?}",
            target,
            columns
        );
    }

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(input, &target, export_path.as_deref(), &config);

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let (df, rows, cols, memory_mb) = load_dataset_with_progress(input, cli.infer_schema_length)?;
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);
    print_step_time(step_start.elapsed());

    // Step 2: Discretize
    print_step_header(2, "WoE Discretization");
    let step_start = Instant::now();
    let features = if cli.features.is_empty() {
        numeric_feature_columns(&df, &target)
    } else {
        cli.features.clone()
    };

    if features.is_empty() {
        print_info("No numeric feature columns to discretize");
        print_completion();
        return Ok(());
    }
    print_count("feature(s) to discretize", features.len(), None);

    let batch = discretize_features(&df, &target, &features, &config)?;
    print_success(&format!("Discretized {} feature(s)", batch.features.len()));
    if !batch.failures.is_empty() {
        print_warning(&format!(
            "{} feature(s) could not be discretized",
            batch.failures.len()
        ));
    }
    print_step_time(step_start.elapsed());

    display_batch(&batch);

    // Step 3: Export
    if let Some(path) = export_path {
        print_step_header(3, "Export Results");
        let step_start = Instant::now();
        let spinner = create_spinner("Writing JSON export...");
        let input_label = input.display().to_string();
        let params = ExportParams {
            input_file: &input_label,
            target_column: &target,
            config: &config,
        };
        export_discretization(&batch, &path, &params)?;
        if batch.failures.is_empty() {
            finish_with_success(&spinner, &format!("Saved to {}", path.display()));
        } else {
            finish_with_warning(
                &spinner,
                &format!(
                    "Saved to {} ({} failed feature(s) listed)",
                    path.display(),
                    batch.failures.len()
                ),
            );
        }
        print_step_time(step_start.elapsed());
    }

    print_completion();
    Ok(())
}

fn run_stability(
    input: &Path,
    variable: &str,
    target: &str,
    month: &str,
    bins: Option<usize>,
    infer_schema_length: usize,
) -> Result<()> {
    print_banner(env!("CARGO_PKG_VERSION"));

    let (df, _, _, _) = load_dataset_with_progress(input, infer_schema_length)?;

    let labeller = match bins {
        Some(num_bins) => {
            let config = DiscretizerConfig::with_bins(num_bins);
            let feature = discretize_feature(&df, variable, target, &config)?;
            display_feature(&feature);
            Some(feature.result)
        }
        None => None,
    };

    let records =
        stability_records_from_dataframe(&df, variable, target, month, labeller.as_ref())?;
    let rows = analyze_stability(&records);
    display_stability(variable, &rows);

    print_completion();
    Ok(())
}
