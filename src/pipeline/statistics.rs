//! Per-bin event counts, ratios and Weight of Evidence
//!
//! Statistics are always recomputed from the raw observations for a given
//! partition; merged bins are never patched up from their parents' counts.

use serde::Serialize;

use super::error::{DiscretizeError, Result};
use super::observation::{Observation, OutcomeTotals};
use super::partition::Partition;

/// Default Laplace smoothing constant added to every count before taking ratios
pub const DEFAULT_LAPLACE_EPSILON: f64 = 0.5;

/// A single bin with WoE statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WoeBin {
    /// Lower bound (inclusive)
    pub lower: f64,
    /// Upper bound (exclusive, except for the last bin)
    pub upper: f64,
    /// Observations with outcome 1 in this bin
    pub event_count: u64,
    /// Observations with outcome 0 in this bin
    pub non_event_count: u64,
    /// Smoothed share of all events that fall in this bin
    pub event_ratio: f64,
    /// Smoothed share of all non-events that fall in this bin
    pub non_event_ratio: f64,
    /// Weight of Evidence: ln(event_ratio / non_event_ratio)
    pub woe: f64,
    /// Contribution to total IV from this bin
    pub iv_contribution: f64,
    /// Total observations in this bin
    pub count: u64,
    /// Percentage of total population in this bin
    pub population_pct: f64,
    /// Event rate (events / count)
    pub event_rate: f64,
    /// Bin had no events or no non-events before smoothing
    pub zero_count: bool,
}

/// A partition with per-bin WoE statistics attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsTable {
    #[serde(skip)]
    pub partition: Partition,
    pub bins: Vec<WoeBin>,
    pub total_events: u64,
    pub total_non_events: u64,
}

impl StatisticsTable {
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// WoE of every bin, in bin order.
    pub fn woe_values(&self) -> Vec<f64> {
        self.bins.iter().map(|b| b.woe).collect()
    }

    /// Total Information Value across all bins.
    pub fn information_value(&self) -> f64 {
        self.bins.iter().map(|b| b.iv_contribution).sum()
    }

    /// Indices of bins flagged as zero-count.
    pub fn zero_count_bins(&self) -> impl Iterator<Item = usize> + '_ {
        self.bins
            .iter()
            .enumerate()
            .filter(|(_, b)| b.zero_count)
            .map(|(i, _)| i)
    }
}

/// Compute the statistics table for `partition` over the full observation set.
///
/// `total_events` and `total_non_events` are taken over all observations, not
/// per bin. Every count is smoothed by `laplace_epsilon` so WoE stays finite
/// for bins without events or without non-events; such bins are flagged with
/// `zero_count`.
pub fn compute(
    observations: &[Observation],
    partition: &Partition,
    laplace_epsilon: f64,
) -> Result<StatisticsTable> {
    validate_laplace_epsilon(laplace_epsilon)?;

    let totals = OutcomeTotals::count(observations);
    totals.require_both_classes()?;

    let mut events = vec![0u64; partition.len()];
    let mut non_events = vec![0u64; partition.len()];

    for obs in observations {
        let index =
            partition
                .bin_index(obs.value)
                .ok_or(DiscretizeError::UncoveredObservation {
                    value: obs.value,
                    lower: partition.lower(),
                    upper: partition.upper(),
                })?;
        if obs.event {
            events[index] += 1;
        } else {
            non_events[index] += 1;
        }
    }

    let total_samples = observations.len() as f64;
    let bins = partition
        .intervals()
        .zip(events.iter().zip(non_events.iter()))
        .map(|((lower, upper), (&event_count, &non_event_count))| {
            let (event_ratio, non_event_ratio, woe, iv_contribution) = calculate_woe_iv(
                event_count as f64,
                non_event_count as f64,
                totals.events as f64,
                totals.non_events as f64,
                laplace_epsilon,
            );
            let count = event_count + non_event_count;

            WoeBin {
                lower,
                upper,
                event_count,
                non_event_count,
                event_ratio,
                non_event_ratio,
                woe,
                iv_contribution,
                count,
                population_pct: count as f64 / total_samples * 100.0,
                event_rate: if count > 0 {
                    event_count as f64 / count as f64
                } else {
                    0.0
                },
                zero_count: event_count == 0 || non_event_count == 0,
            }
        })
        .collect();

    Ok(StatisticsTable {
        partition: partition.clone(),
        bins,
        total_events: totals.events,
        total_non_events: totals.non_events,
    })
}

/// Smoothed event/non-event ratios, WoE and IV contribution for one bin.
///
/// Uses the ln(%events / %non-events) convention:
/// - WoE > 0 means the bin holds proportionally more events
/// - WoE < 0 means the bin holds proportionally fewer events
fn calculate_woe_iv(
    events: f64,
    non_events: f64,
    total_events: f64,
    total_non_events: f64,
    smoothing: f64,
) -> (f64, f64, f64, f64) {
    let event_ratio = (events + smoothing) / (total_events + smoothing);
    let non_event_ratio = (non_events + smoothing) / (total_non_events + smoothing);

    let woe = (event_ratio / non_event_ratio).ln();
    let iv_contrib = (event_ratio - non_event_ratio) * woe;

    (event_ratio, non_event_ratio, woe, iv_contrib)
}

pub(crate) fn validate_laplace_epsilon(laplace_epsilon: f64) -> Result<()> {
    if !laplace_epsilon.is_finite() || laplace_epsilon <= 0.0 {
        return Err(DiscretizeError::InvalidParameter {
            name: "laplace_epsilon",
            reason: format!("must be a finite value > 0, got {}", laplace_epsilon),
        });
    }
    Ok(())
}
