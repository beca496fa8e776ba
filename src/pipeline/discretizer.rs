//! Discretizer: drives partition → statistics → merge until convergence
//!
//! State machine: `Init → Iterating → Converged | Exhausted`. Every iteration
//! asks the merger for a proposal, applies it, recomputes statistics from the
//! raw observations and compares the new WoE vector with the previous one.

use serde::Serialize;

use super::error::{DiscretizeError, Result};
use super::merger::{apply_merge, propose_merge, MergeProposal};
use super::observation::{ensure_finite, Observation, OutcomeTotals};
use super::partition::partition;
use super::statistics::{self, validate_laplace_epsilon, StatisticsTable, WoeBin};

/// How the WoE-stability check treats vectors whose length changed.
///
/// A merge always removes one bin, so the WoE vector after a merge is one
/// element shorter than the one before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ConvergenceCheck {
    /// Compare only when both vectors have the same length (default)
    #[default]
    SkipOnResize,
    /// Compare positions `0..min(len)` of both vectors
    OverlappingPrefix,
}

impl std::fmt::Display for ConvergenceCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvergenceCheck::SkipOnResize => write!(f, "skip-on-resize"),
            ConvergenceCheck::OverlappingPrefix => write!(f, "overlapping-prefix"),
        }
    }
}

impl std::str::FromStr for ConvergenceCheck {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "skip-on-resize" | "skip" => Ok(ConvergenceCheck::SkipOnResize),
            "overlapping-prefix" | "prefix" => Ok(ConvergenceCheck::OverlappingPrefix),
            _ => Err(format!(
                "Unknown convergence check: '{}'. Use 'skip-on-resize' or 'overlapping-prefix'.",
                s
            )),
        }
    }
}

impl ConvergenceCheck {
    /// Every compared position moved by less than `epsilon`.
    ///
    /// Returns `false` when nothing was compared.
    fn is_stable(&self, previous: &[f64], current: &[f64], epsilon: f64) -> bool {
        let compared = match self {
            ConvergenceCheck::SkipOnResize if previous.len() != current.len() => return false,
            ConvergenceCheck::SkipOnResize => previous.len(),
            ConvergenceCheck::OverlappingPrefix => previous.len().min(current.len()),
        };
        compared > 0
            && previous
                .iter()
                .zip(current)
                .take(compared)
                .all(|(p, c)| (c - p).abs() < epsilon)
    }
}

/// Configuration for a discretization run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscretizerConfig {
    /// Number of initial quantile bins
    pub num_bins: usize,
    /// Convergence threshold for WoE gaps and WoE drift
    pub epsilon: f64,
    /// Maximum merge iterations
    pub max_iter: usize,
    /// Laplace smoothing constant added to every bin count
    pub laplace_epsilon: f64,
    /// Treatment of WoE vectors of different lengths
    pub convergence_check: ConvergenceCheck,
}

impl Default for DiscretizerConfig {
    fn default() -> Self {
        Self {
            num_bins: 4,
            epsilon: 0.01,
            max_iter: 100,
            laplace_epsilon: statistics::DEFAULT_LAPLACE_EPSILON,
            convergence_check: ConvergenceCheck::SkipOnResize,
        }
    }
}

impl DiscretizerConfig {
    pub fn with_bins(num_bins: usize) -> Self {
        Self {
            num_bins,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(DiscretizeError::InvalidParameter {
                name: "epsilon",
                reason: format!("must be a finite value >= 0, got {}", self.epsilon),
            });
        }
        validate_laplace_epsilon(self.laplace_epsilon)
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// Largest adjacent WoE gap fell to epsilon or below
    MergeGapWithinEpsilon,
    /// WoE vector moved by less than epsilon after a merge
    WoeStable,
    /// `max_iter` iterations ran without convergence
    MaxIterations,
}

/// Loop states after initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Iterating,
    Converged(Termination),
    Exhausted,
}

/// One applied merge
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MergeStep {
    /// 1-based iteration that applied the merge
    pub iteration: usize,
    /// Left bin of the merged pair
    pub index: usize,
    /// Absolute WoE gap between the merged bins
    pub gap: f64,
    /// Bin count after the merge
    pub bins_after: usize,
}

/// Non-fatal conditions observed during a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Warning {
    /// Duplicate quantile cut points reduced the initial bin count
    DegenerateQuantile { requested: usize, effective: usize },
    /// Final bin had no events or no non-events and relies on smoothing
    ZeroCountBin { index: usize },
    /// Loop exhausted `max_iter` without converging
    NonConvergence { iterations: usize },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::DegenerateQuantile {
                requested,
                effective,
            } => write!(
                f,
                "duplicate quantile edges: {} bins requested, {} created",
                requested, effective
            ),
            Warning::ZeroCountBin { index } => write!(
                f,
                "bin {} has no events or no non-events (WoE is smoothed)",
                index
            ),
            Warning::NonConvergence { iterations } => {
                write!(f, "did not converge within {} iterations", iterations)
            }
        }
    }
}

/// Final table and run metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscretizationResult {
    /// Final bins ordered by lower bound
    pub bins: Vec<WoeBin>,
    pub converged: bool,
    pub termination: Termination,
    pub iterations_run: usize,
    pub bin_count_reduced_from_request: bool,
    pub requested_bins: usize,
    /// Bin count after quantile partitioning, before any merge
    pub initial_bins: usize,
    pub total_events: u64,
    pub total_non_events: u64,
    /// Total Information Value of the final bins
    pub information_value: f64,
    pub merges: Vec<MergeStep>,
    #[serde(skip)]
    table: StatisticsTable,
}

impl DiscretizationResult {
    pub fn table(&self) -> &StatisticsTable {
        &self.table
    }

    pub fn woe_values(&self) -> Vec<f64> {
        self.table.woe_values()
    }

    /// Every non-fatal condition, in a stable order.
    pub fn warnings(&self) -> Vec<Warning> {
        let mut warnings = Vec::new();
        if self.bin_count_reduced_from_request {
            warnings.push(Warning::DegenerateQuantile {
                requested: self.requested_bins,
                effective: self.initial_bins,
            });
        }
        warnings.extend(
            self.table
                .zero_count_bins()
                .map(|index| Warning::ZeroCountBin { index }),
        );
        if !self.converged {
            warnings.push(Warning::NonConvergence {
                iterations: self.iterations_run,
            });
        }
        warnings
    }

    /// Index of the final bin containing `value`.
    pub fn bin_index_for(&self, value: f64) -> Option<usize> {
        self.table.partition.bin_index(value)
    }

    /// Interval label such as `[10, 40)`; the last bin is closed.
    pub fn bin_label(&self, index: usize) -> Option<String> {
        let (lower, upper) = self.table.partition.interval(index)?;
        let close = if index + 1 == self.bins.len() { ']' } else { ')' };
        Some(format!("[{}, {}{}", lower, upper, close))
    }
}

/// Discretize a feature into WoE bins.
///
/// Starts from `config.num_bins` quantile bins and repeatedly merges the
/// adjacent pair with the largest WoE gap until that gap is within
/// `config.epsilon`, the WoE vector stops moving, or `config.max_iter`
/// iterations have run. Non-convergence is not an error: the last table is
/// returned with `converged = false`.
pub fn discretize(
    observations: &[Observation],
    config: &DiscretizerConfig,
) -> Result<DiscretizationResult> {
    config.validate()?;
    ensure_finite(observations)?;
    OutcomeTotals::count(observations).require_both_classes()?;

    let quantiles = partition(observations, config.num_bins)?;
    let mut table =
        statistics::compute(observations, &quantiles.partition, config.laplace_epsilon)?;
    let mut previous_woe = table.woe_values();
    let mut merges = Vec::new();
    let mut iterations_run = 0;

    tracing::debug!(
        requested = config.num_bins,
        bins = table.len(),
        "initial quantile partition"
    );

    let mut state = State::Iterating;
    while state == State::Iterating {
        if iterations_run >= config.max_iter {
            state = State::Exhausted;
            break;
        }
        iterations_run += 1;

        let (index, gap) = match propose_merge(&table, config.epsilon) {
            MergeProposal::Converged { max_gap } => {
                tracing::debug!(
                    iteration = iterations_run,
                    max_gap,
                    "adjacent WoE gaps within epsilon"
                );
                state = State::Converged(Termination::MergeGapWithinEpsilon);
                break;
            }
            MergeProposal::Merge { index, gap } => (index, gap),
        };

        let merged = apply_merge(&table.partition, index)?;
        table = statistics::compute(observations, &merged, config.laplace_epsilon)?;
        merges.push(MergeStep {
            iteration: iterations_run,
            index,
            gap,
            bins_after: table.len(),
        });
        tracing::debug!(
            iteration = iterations_run,
            index,
            gap,
            bins = table.len(),
            "merged adjacent bins"
        );

        let current_woe = table.woe_values();
        if config
            .convergence_check
            .is_stable(&previous_woe, &current_woe, config.epsilon)
        {
            state = State::Converged(Termination::WoeStable);
            break;
        }
        previous_woe = current_woe;
    }

    let termination = match state {
        State::Converged(termination) => termination,
        _ => Termination::MaxIterations,
    };
    let converged = termination != Termination::MaxIterations;
    if !converged {
        tracing::warn!(
            max_iter = config.max_iter,
            bins = table.len(),
            "discretization did not converge"
        );
    }

    Ok(DiscretizationResult {
        bins: table.bins.clone(),
        converged,
        termination,
        iterations_run,
        bin_count_reduced_from_request: quantiles.is_reduced(),
        requested_bins: quantiles.requested_bins,
        initial_bins: quantiles.effective_bins(),
        total_events: table.total_events,
        total_non_events: table.total_non_events,
        information_value: table.information_value(),
        merges,
        table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convergence_check_from_str() {
        assert_eq!(
            "skip-on-resize".parse::<ConvergenceCheck>().unwrap(),
            ConvergenceCheck::SkipOnResize
        );
        assert_eq!(
            "OVERLAPPING_PREFIX".parse::<ConvergenceCheck>().unwrap(),
            ConvergenceCheck::OverlappingPrefix
        );
        assert!("invalid".parse::<ConvergenceCheck>().is_err());
    }

    #[test]
    fn test_convergence_check_display() {
        assert_eq!(ConvergenceCheck::SkipOnResize.to_string(), "skip-on-resize");
        assert_eq!(
            ConvergenceCheck::OverlappingPrefix.to_string(),
            "overlapping-prefix"
        );
    }

    #[test]
    fn test_skip_on_resize_never_compares_different_lengths() {
        let check = ConvergenceCheck::SkipOnResize;
        assert!(!check.is_stable(&[0.1, 0.2, 0.3], &[0.1, 0.2], 0.01));
        assert!(check.is_stable(&[0.1, 0.2], &[0.105, 0.2], 0.01));
        assert!(!check.is_stable(&[0.1, 0.2], &[0.2, 0.2], 0.01));
    }

    #[test]
    fn test_overlapping_prefix_compares_shared_positions() {
        let check = ConvergenceCheck::OverlappingPrefix;
        assert!(check.is_stable(&[0.1, 0.2, 0.9], &[0.1, 0.2], 0.01));
        assert!(!check.is_stable(&[0.1, 0.5, 0.9], &[0.1, 0.2], 0.01));
        assert!(!check.is_stable(&[], &[0.1], 0.01));
    }

    #[test]
    fn test_default_config() {
        let config = DiscretizerConfig::default();
        assert_eq!(config.num_bins, 4);
        assert_eq!(config.epsilon, 0.01);
        assert_eq!(config.max_iter, 100);
        assert_eq!(config.laplace_epsilon, 0.5);
        assert_eq!(config.convergence_check, ConvergenceCheck::SkipOnResize);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_negative_epsilon() {
        let config = DiscretizerConfig {
            epsilon: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DiscretizeError::InvalidParameter { name: "epsilon", .. })
        ));
    }

    #[test]
    fn test_warning_display() {
        let w = Warning::DegenerateQuantile {
            requested: 10,
            effective: 4,
        };
        assert!(w.to_string().contains("10 bins requested"));
        assert!(Warning::NonConvergence { iterations: 3 }
            .to_string()
            .contains("3 iterations"));
    }
}
