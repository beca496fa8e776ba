//! Adjacent-bin merge selection
//!
//! The merger looks at the absolute WoE gap between every pair of neighbouring
//! bins and proposes joining the pair with the LARGEST gap, not the most
//! similar neighbours.

use serde::Serialize;

use super::error::{DiscretizeError, Result};
use super::partition::Partition;
use super::statistics::StatisticsTable;

/// Outcome of inspecting a statistics table for a merge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MergeProposal {
    /// Largest adjacent gap is within epsilon (or there is only one bin)
    Converged { max_gap: f64 },
    /// Merge bin `index` with bin `index + 1`
    Merge { index: usize, gap: f64 },
}

impl MergeProposal {
    pub fn should_stop(&self) -> bool {
        matches!(self, MergeProposal::Converged { .. })
    }
}

/// Absolute WoE difference between each bin and its right neighbour.
pub fn adjacent_woe_gaps(table: &StatisticsTable) -> Vec<f64> {
    table
        .bins
        .windows(2)
        .map(|pair| (pair[1].woe - pair[0].woe).abs())
        .collect()
}

/// Pick the adjacent pair with the largest WoE gap, or signal convergence.
///
/// Ties resolve to the lowest index. The table converges when the largest gap
/// is `<= epsilon`.
pub fn propose_merge(table: &StatisticsTable, epsilon: f64) -> MergeProposal {
    let gaps = adjacent_woe_gaps(table);

    let mut best: Option<(usize, f64)> = None;
    for (index, &gap) in gaps.iter().enumerate() {
        match best {
            Some((_, best_gap)) if gap <= best_gap => {}
            _ => best = Some((index, gap)),
        }
    }

    match best {
        Some((index, gap)) if gap > epsilon => MergeProposal::Merge { index, gap },
        Some((_, gap)) => MergeProposal::Converged { max_gap: gap },
        None => MergeProposal::Converged { max_gap: 0.0 },
    }
}

/// Coarser partition with bins `index` and `index + 1` joined into one
/// spanning `[left.lower, right.upper)`.
///
/// Counts are not carried over; run the statistics again on the result.
pub fn apply_merge(partition: &Partition, index: usize) -> Result<Partition> {
    if index + 1 >= partition.len() {
        return Err(DiscretizeError::MergeOutOfRange {
            index,
            bins: partition.len(),
        });
    }
    Ok(partition.without_edge(index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::observation::observations_from_columns;
    use crate::pipeline::statistics::compute;

    fn table(edges: Vec<f64>) -> StatisticsTable {
        let obs = observations_from_columns(
            &[
                10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0, 110.0, 130.0, 150.0,
            ],
            &[0, 1, 0, 1, 1, 0, 1, 0, 1, 0, 1, 1, 1],
        )
        .unwrap();
        compute(&obs, &Partition::from_edges(edges).unwrap(), 0.5).unwrap()
    }

    #[test]
    fn test_gaps_have_one_fewer_entry_than_bins() {
        let t = table(vec![10.0, 40.0, 70.0, 100.0, 150.0]);
        let gaps = adjacent_woe_gaps(&t);
        assert_eq!(gaps.len(), t.len() - 1);
        assert!((gaps[0] - 1.0216512475319814).abs() < 1e-12);
        assert!(gaps[1].abs() < 1e-12);
        assert!((gaps[2] - 0.3364722366212128).abs() < 1e-12);
    }

    #[test]
    fn test_proposes_largest_gap() {
        let t = table(vec![10.0, 40.0, 70.0, 100.0, 150.0]);
        match propose_merge(&t, 0.01) {
            MergeProposal::Merge { index, gap } => {
                assert_eq!(index, 0);
                assert!((gap - 1.0216512475319814).abs() < 1e-12);
            }
            other => panic!("expected a merge, got {:?}", other),
        }
    }

    #[test]
    fn test_converges_when_gap_within_epsilon() {
        let t = table(vec![10.0, 40.0, 70.0, 100.0, 150.0]);
        let proposal = propose_merge(&t, 2.0);
        assert!(proposal.should_stop());
        assert!(matches!(proposal, MergeProposal::Converged { max_gap } if (max_gap - 1.0216512475319814).abs() < 1e-12));
    }

    #[test]
    fn test_gap_equal_to_epsilon_converges() {
        let t = table(vec![10.0, 40.0, 70.0, 100.0, 150.0]);
        let max_gap = adjacent_woe_gaps(&t).into_iter().fold(0.0f64, f64::max);
        assert!(propose_merge(&t, max_gap).should_stop());
    }

    #[test]
    fn test_single_bin_always_converges() {
        let t = table(vec![10.0, 150.0]);
        assert_eq!(
            propose_merge(&t, 0.0),
            MergeProposal::Converged { max_gap: 0.0 }
        );
    }

    #[test]
    fn test_ties_resolve_to_first_index() {
        // Bins 1 and 2 are identical, so gaps 0 and 2 measure against the same WoE.
        let obs = observations_from_columns(
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            &[0, 0, 1, 0, 1, 0, 0, 0],
        )
        .unwrap();
        let p = Partition::from_edges(vec![1.0, 3.0, 5.0, 7.0, 8.0]).unwrap();
        let t = compute(&obs, &p, 0.5).unwrap();
        // bins: (0e,2n) (1e,1n) (1e,1n) (0e,2n): gaps g, 0, g
        match propose_merge(&t, 0.01) {
            MergeProposal::Merge { index, .. } => assert_eq!(index, 0),
            other => panic!("expected a merge, got {:?}", other),
        }
    }

    #[test]
    fn test_apply_merge_spans_both_bins() {
        let p = Partition::from_edges(vec![10.0, 40.0, 70.0, 100.0, 150.0]).unwrap();
        let merged = apply_merge(&p, 1).unwrap();
        assert_eq!(merged.edges(), &[10.0, 40.0, 100.0, 150.0]);
        assert_eq!(merged.len(), p.len() - 1);
        assert_eq!(merged.interval(1), Some((40.0, 100.0)));
        // input partition is untouched
        assert_eq!(p.len(), 4);
    }

    #[test]
    fn test_apply_merge_last_pair() {
        let p = Partition::from_edges(vec![0.0, 1.0, 2.0]).unwrap();
        let merged = apply_merge(&p, 1);
        assert_eq!(
            merged.unwrap_err(),
            DiscretizeError::MergeOutOfRange { index: 1, bins: 2 }
        );
        assert_eq!(apply_merge(&p, 0).unwrap().edges(), &[0.0, 2.0]);
    }
}
