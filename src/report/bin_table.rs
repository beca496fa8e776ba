//! Terminal rendering of final WoE bin tables

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{BatchDiscretization, DiscretizationResult, FeatureDiscretization, Termination};

fn header(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn number(value: f64, precision: usize) -> Cell {
    Cell::new(format!("{:.*}", precision, value)).set_alignment(CellAlignment::Right)
}

fn woe_color(woe: f64) -> Color {
    if woe > 0.0 {
        Color::Green
    } else if woe < 0.0 {
        Color::Red
    } else {
        Color::White
    }
}

/// Build the per-bin table of a discretization result.
pub fn build_bin_table(result: &DiscretizationResult) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        header("Bin"),
        header("Interval"),
        header("Events"),
        header("Non-events"),
        header("Event ratio"),
        header("Non-event ratio"),
        header("WoE"),
        header("IV"),
    ]);

    for (i, bin) in result.bins.iter().enumerate() {
        let label = result
            .bin_label(i)
            .unwrap_or_else(|| format!("[{}, {})", bin.lower, bin.upper));
        let interval = if bin.zero_count {
            Cell::new(format!("{} *", label)).fg(Color::Yellow)
        } else {
            Cell::new(label)
        };

        table.add_row(vec![
            Cell::new(i),
            interval,
            Cell::new(bin.event_count).set_alignment(CellAlignment::Right),
            Cell::new(bin.non_event_count).set_alignment(CellAlignment::Right),
            number(bin.event_ratio, 4),
            number(bin.non_event_ratio, 4),
            number(bin.woe, 4).fg(woe_color(bin.woe)),
            number(bin.iv_contribution, 4),
        ]);
    }

    table
}

fn termination_label(result: &DiscretizationResult) -> String {
    match result.termination {
        Termination::MergeGapWithinEpsilon => "adjacent WoE gaps within epsilon".to_string(),
        Termination::WoeStable => "WoE vector stable".to_string(),
        Termination::MaxIterations => format!("stopped after {} iterations", result.iterations_run),
    }
}

/// Print one feature's bins with a short run summary.
pub fn display_feature(feature: &FeatureDiscretization) {
    let result = &feature.result;

    println!();
    println!(
        "    {} {}  {}",
        style("📊").cyan(),
        style(&feature.feature_name).white().bold(),
        style(format!("IV = {:.4}", result.information_value)).yellow()
    );
    println!("    {}", style("─".repeat(50)).dim());

    let status = if result.converged {
        style(termination_label(result)).green()
    } else {
        style(termination_label(result)).yellow()
    };
    println!(
        "      {} → {} bins, {} merges, {}",
        result.initial_bins,
        result.bins.len(),
        result.merges.len(),
        status
    );
    if feature.skipped_rows > 0 {
        println!(
            "      {}",
            style(format!("{} rows skipped (missing values)", feature.skipped_rows)).dim()
        );
    }

    // Indent the table
    for line in build_bin_table(result).to_string().lines() {
        println!("    {}", line);
    }

    for warning in result.warnings() {
        println!("      {} {}", style("!").yellow().bold(), style(warning).yellow());
    }
}

/// Print the ranking of a batch run followed by every feature table.
pub fn display_batch(batch: &BatchDiscretization) {
    println!();
    println!(
        "    {} {}",
        style("📋").cyan(),
        style("DISCRETIZATION SUMMARY").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        header("Feature"),
        header("Bins"),
        header("IV"),
        header("Converged"),
        header("Warnings"),
    ]);

    for feature in &batch.features {
        let result = &feature.result;
        let warnings = result.warnings().len();
        table.add_row(vec![
            Cell::new(&feature.feature_name),
            Cell::new(result.bins.len()).set_alignment(CellAlignment::Right),
            number(result.information_value, 4),
            Cell::new(if result.converged { "yes" } else { "no" }).fg(if result.converged {
                Color::Green
            } else {
                Color::Yellow
            }),
            Cell::new(warnings).fg(if warnings == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
    }

    for line in table.to_string().lines() {
        println!("    {}", line);
    }

    for feature in &batch.features {
        display_feature(feature);
    }

    if !batch.failures.is_empty() {
        println!();
        println!(
            "      {} {}:",
            style("Failed Features").red(),
            style(format!("({})", batch.failures.len())).dim()
        );
        for failure in &batch.failures {
            println!(
                "        {} {}: {}",
                style("•").dim(),
                failure.feature_name,
                style(&failure.reason).dim()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{discretize, Observation, DiscretizerConfig};

    #[test]
    fn test_bin_table_has_row_per_bin() {
        let observations: Vec<Observation> = (0..40)
            .map(|i| Observation::new(i as f64, i % 3 == 0))
            .collect();
        let config = DiscretizerConfig {
            epsilon: 10.0,
            ..Default::default()
        };
        let result = discretize(&observations, &config).unwrap();

        let table = build_bin_table(&result);
        assert_eq!(table.row_iter().count(), result.bins.len());
        let rendered = table.to_string();
        assert!(rendered.contains("WoE"));
        assert!(rendered.contains("[0, 9.75)"));
    }
}
