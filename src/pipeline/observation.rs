//! Observations: a feature value paired with a binary outcome

use serde::Serialize;

use super::error::{DiscretizeError, EmptyInputKind, Result};

/// A single `(value, outcome)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    /// Feature value
    pub value: f64,
    /// `true` for an event (outcome = 1), `false` for a non-event (outcome = 0)
    pub event: bool,
}

impl Observation {
    pub fn new(value: f64, event: bool) -> Self {
        Self { value, event }
    }

    /// Outcome as the 0/1 integer used in datasets.
    pub fn outcome(&self) -> u8 {
        u8::from(self.event)
    }
}

/// Event and non-event totals over a full observation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutcomeTotals {
    pub events: u64,
    pub non_events: u64,
}

impl OutcomeTotals {
    pub fn count(observations: &[Observation]) -> Self {
        let events = observations.iter().filter(|o| o.event).count() as u64;
        Self {
            events,
            non_events: observations.len() as u64 - events,
        }
    }

    /// Fail with `EmptyInput` when either class is absent.
    pub fn require_both_classes(&self) -> Result<()> {
        if self.events + self.non_events == 0 {
            return Err(DiscretizeError::EmptyInput(EmptyInputKind::NoObservations));
        }
        if self.events == 0 {
            return Err(DiscretizeError::EmptyInput(EmptyInputKind::NoEvents));
        }
        if self.non_events == 0 {
            return Err(DiscretizeError::EmptyInput(EmptyInputKind::NoNonEvents));
        }
        Ok(())
    }
}

/// Build observations from parallel value and outcome columns.
///
/// Outcomes must be 0 or 1 and values must be finite; the first offending
/// row is reported by index.
pub fn observations_from_columns(values: &[f64], outcomes: &[i64]) -> Result<Vec<Observation>> {
    if values.len() != outcomes.len() {
        return Err(DiscretizeError::LengthMismatch {
            values: values.len(),
            outcomes: outcomes.len(),
        });
    }

    values
        .iter()
        .zip(outcomes)
        .enumerate()
        .map(|(index, (&value, &outcome))| {
            let event = match outcome {
                0 => false,
                1 => true,
                other => {
                    return Err(DiscretizeError::InvalidOutcome {
                        index,
                        outcome: other,
                    })
                }
            };
            if !value.is_finite() {
                return Err(DiscretizeError::NonFiniteValue { index, value });
            }
            Ok(Observation::new(value, event))
        })
        .collect()
}

/// Reject non-finite values in an already-built observation set.
pub(crate) fn ensure_finite(observations: &[Observation]) -> Result<()> {
    match observations.iter().position(|o| !o.value.is_finite()) {
        Some(index) => Err(DiscretizeError::NonFiniteValue {
            index,
            value: observations[index].value,
        }),
        None => Ok(()),
    }
}

/// Sorted copy of the observation values.
pub(crate) fn sorted_values(observations: &[Observation]) -> Vec<f64> {
    let mut values: Vec<f64> = observations.iter().map(|o| o.value).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

/// Number of distinct values in a sorted slice.
pub(crate) fn count_distinct(sorted: &[f64]) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    1 + sorted.windows(2).filter(|w| w[1] > w[0]).count()
}
