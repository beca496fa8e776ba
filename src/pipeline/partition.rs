//! Quantile partitioning of a feature's value range
//!
//! A [`Partition`] is stored as a strictly increasing edge vector, so bins are
//! contiguous and non-overlapping by construction. Bin `i` is
//! `[edges[i], edges[i + 1])`; the last bin also includes its upper edge, the
//! maximum observed value.

use serde::Serialize;

use super::error::{DiscretizeError, Result};
use super::observation::{count_distinct, ensure_finite, sorted_values, Observation};

/// Ordered, contiguous bins over `[min, max]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partition {
    edges: Vec<f64>,
}

impl Partition {
    /// Build a partition from explicit edges.
    ///
    /// Edges must be finite, strictly increasing and at least two long.
    pub fn from_edges(edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(DiscretizeError::InvalidParameter {
                name: "edges",
                reason: format!("a partition needs at least 2 edges, got {}", edges.len()),
            });
        }
        if let Some(bad) = edges.iter().find(|e| !e.is_finite()) {
            return Err(DiscretizeError::InvalidParameter {
                name: "edges",
                reason: format!("edge {} is not finite", bad),
            });
        }
        if edges.windows(2).any(|w| w[1] <= w[0]) {
            return Err(DiscretizeError::InvalidParameter {
                name: "edges",
                reason: "edges must be strictly increasing".to_string(),
            });
        }
        Ok(Self { edges })
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lower bound of the first bin (the global minimum).
    pub fn lower(&self) -> f64 {
        self.edges[0]
    }

    /// Upper bound of the last bin (the global maximum, inclusive).
    pub fn upper(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// `(lower, upper)` bounds of bin `index`.
    pub fn interval(&self, index: usize) -> Option<(f64, f64)> {
        if index < self.len() {
            Some((self.edges[index], self.edges[index + 1]))
        } else {
            None
        }
    }

    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.edges.windows(2).map(|w| (w[0], w[1]))
    }

    /// Index of the bin containing `value`, or `None` outside `[min, max]`.
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        if !(value >= self.lower() && value <= self.upper()) {
            return None;
        }
        let interior = &self.edges[1..self.edges.len() - 1];
        Some(interior.partition_point(|&edge| edge <= value))
    }

    /// New partition with bins `index` and `index + 1` joined.
    pub(crate) fn without_edge(&self, edge: usize) -> Self {
        let mut edges = self.edges.clone();
        edges.remove(edge);
        Self { edges }
    }
}

/// A quantile partition together with the bin count that was asked for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantilePartition {
    pub partition: Partition,
    pub requested_bins: usize,
}

impl QuantilePartition {
    pub fn effective_bins(&self) -> usize {
        self.partition.len()
    }

    /// Duplicate quantile edges collapsed some of the requested bins.
    pub fn is_reduced(&self) -> bool {
        self.effective_bins() < self.requested_bins
    }
}

/// Split the observed range into `num_bins` equal-frequency bins.
///
/// Cut points are the `0, 1/k, ..., 1` quantiles with linear interpolation
/// between order statistics. Equal adjacent cut points are collapsed, which can
/// leave fewer bins than requested; check [`QuantilePartition::is_reduced`].
pub fn partition(observations: &[Observation], num_bins: usize) -> Result<QuantilePartition> {
    if num_bins < 1 {
        return Err(DiscretizeError::InvalidBinCount {
            requested: num_bins,
            reason: "at least one bin is required".to_string(),
        });
    }
    ensure_finite(observations)?;

    let sorted = sorted_values(observations);
    let distinct = count_distinct(&sorted);
    if distinct < 2 {
        return Err(DiscretizeError::InvalidBinCount {
            requested: num_bins,
            reason: format!("need at least 2 distinct values, found {}", distinct),
        });
    }
    if num_bins > distinct {
        return Err(DiscretizeError::InvalidBinCount {
            requested: num_bins,
            reason: format!("exceeds the {} distinct observed values", distinct),
        });
    }

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    let mut edges: Vec<f64> = Vec::with_capacity(num_bins + 1);
    edges.push(min);
    for i in 1..num_bins {
        let cut = quantile_cut(&sorted, i, num_bins).clamp(min, max);
        if cut > edges[edges.len() - 1] {
            edges.push(cut);
        }
    }
    // An interior cut clamped onto the maximum already closes the range.
    if max > edges[edges.len() - 1] {
        edges.push(max);
    }

    let quantiles = QuantilePartition {
        partition: Partition { edges },
        requested_bins: num_bins,
    };

    if quantiles.is_reduced() {
        tracing::warn!(
            requested = num_bins,
            effective = quantiles.effective_bins(),
            "duplicate quantile cut points reduced the bin count"
        );
    }

    Ok(quantiles)
}

/// The `i / k` quantile of sorted data, interpolating between order statistics.
fn quantile_cut(sorted: &[f64], i: usize, k: usize) -> f64 {
    let n = sorted.len();
    let pos = (i * (n - 1)) as f64 / k as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}
