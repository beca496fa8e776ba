//! Monthly stability of a variable's categories
//!
//! For every (category, month) pair: the row count, its share of that month's
//! rows, and the event / non-event rates. Months sort in calendar order, not
//! alphabetically.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Table};
use console::style;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::{validate_binary_target, DiscretizationResult};

/// Calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }

    fn full_name(&self) -> &'static str {
        match self {
            Month::Jan => "january",
            Month::Feb => "february",
            Month::Mar => "march",
            Month::Apr => "april",
            Month::May => "may",
            Month::Jun => "june",
            Month::Jul => "july",
            Month::Aug => "august",
            Month::Sep => "september",
            Month::Oct => "october",
            Month::Nov => "november",
            Month::Dec => "december",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Month::ALL
            .into_iter()
            .find(|m| m.abbreviation().to_lowercase() == needle || m.full_name() == needle)
            .ok_or_else(|| format!("Unknown month: '{}'. Use Jan..Dec or a full month name.", s))
    }
}

/// One observation of the stability input
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityRecord {
    pub category: String,
    pub month: Month,
    pub event: bool,
}

/// Aggregates of one (category, month) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StabilityRow {
    pub category: String,
    pub month: Month,
    pub count: u64,
    pub event_count: u64,
    pub event_rate: f64,
    pub non_event_rate: f64,
    /// Share of the month's rows falling in this category, in percent
    pub percentage_of_period_total: f64,
}

/// Group records by category and month.
///
/// Rows come out ordered by category, then calendar month. Pairs with no
/// records are absent rather than zero-filled.
pub fn analyze_stability(records: &[StabilityRecord]) -> Vec<StabilityRow> {
    let mut month_totals: BTreeMap<Month, u64> = BTreeMap::new();
    let mut groups: BTreeMap<(&str, Month), (u64, u64)> = BTreeMap::new();

    for record in records {
        *month_totals.entry(record.month).or_insert(0) += 1;
        let entry = groups
            .entry((record.category.as_str(), record.month))
            .or_insert((0, 0));
        entry.0 += 1;
        if record.event {
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|((category, month), (count, event_count))| {
            let month_total = month_totals.get(&month).copied().unwrap_or(count);
            let event_rate = event_count as f64 / count as f64;
            StabilityRow {
                category: category.to_string(),
                month,
                count,
                event_count,
                event_rate,
                non_event_rate: 1.0 - event_rate,
                percentage_of_period_total: count as f64 / month_total as f64 * 100.0,
            }
        })
        .collect()
}

/// Build stability records from dataset columns.
///
/// With a `labeller`, the variable is read as numbers and each row's category
/// is the label of the WoE bin containing it; otherwise the variable's string
/// form is the category. Rows with a null variable, target or month are
/// skipped. An unrecognized month name is an error.
pub fn stability_records_from_dataframe(
    df: &DataFrame,
    variable: &str,
    target: &str,
    month: &str,
    labeller: Option<&DiscretizationResult>,
) -> Result<Vec<StabilityRecord>> {
    validate_binary_target(df, target)?;

    let target_col = df
        .column(target)
        .with_context(|| format!("Target column '{}' not found", target))?
        .cast(&DataType::Float64)?;
    let targets = target_col.f64()?;

    let month_col = df
        .column(month)
        .with_context(|| format!("Month column '{}' not found", month))?
        .cast(&DataType::String)?;
    let months = month_col.str()?;

    let variable_col = df
        .column(variable)
        .with_context(|| format!("Variable column '{}' not found", variable))?;

    let categories: Vec<Option<String>> = match labeller {
        Some(result) => {
            let values = variable_col
                .cast(&DataType::Float64)
                .with_context(|| format!("Variable column '{}' is not numeric", variable))?;
            values
                .f64()?
                .iter()
                .map(|v| {
                    v.and_then(|v| result.bin_index_for(v))
                        .and_then(|i| result.bin_label(i))
                })
                .collect()
        }
        None => {
            let values = variable_col.cast(&DataType::String)?;
            values
                .str()?
                .iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    let mut records = Vec::with_capacity(categories.len());
    let mut skipped = 0usize;

    for (row, ((category, outcome), month_name)) in categories
        .into_iter()
        .zip(targets.iter())
        .zip(months.iter())
        .enumerate()
    {
        let (Some(category), Some(outcome), Some(month_name)) = (category, outcome, month_name)
        else {
            skipped += 1;
            continue;
        };
        let month = month_name
            .parse::<Month>()
            .map_err(|e| anyhow::anyhow!("Row {}: {}", row, e))?;
        records.push(StabilityRecord {
            category,
            month,
            event: (outcome - 1.0).abs() < 1e-9,
        });
    }

    if skipped > 0 {
        tracing::debug!(variable, skipped, "stability rows skipped for missing values");
    }

    Ok(records)
}

/// Print the stability table.
pub fn display_stability(variable: &str, rows: &[StabilityRow]) {
    println!();
    println!(
        "    {} {} {}",
        style("📅").cyan(),
        style("MONTHLY STABILITY").white().bold(),
        style(format!("({})", variable)).dim()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Category").add_attribute(Attribute::Bold),
        Cell::new("Month").add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
        Cell::new("% of month").add_attribute(Attribute::Bold),
        Cell::new("Event rate").add_attribute(Attribute::Bold),
        Cell::new("Non-event rate").add_attribute(Attribute::Bold),
    ]);

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.category),
            Cell::new(row.month),
            Cell::new(row.count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", row.percentage_of_period_total))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", row.event_rate)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", row.non_event_rate)).set_alignment(CellAlignment::Right),
        ]);
    }

    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}
