//! Inclusion curve: set size as a function of the q-value threshold.

use serde::{Deserialize, Serialize};

use super::{select_inclusion_set, FdrError, RankedHypothesis};

/// One row of the inclusion curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub threshold: f64,
    pub size: usize,
    pub expected_false_discoveries: f64,
    pub realized_q_value: Option<f64>,
}

/// Evaluate the inclusion set at each threshold, in the order given.
pub fn inclusion_curve(
    ranked: &[RankedHypothesis],
    thresholds: &[f64],
) -> Result<Vec<CurvePoint>, FdrError> {
    thresholds
        .iter()
        .map(|&threshold| {
            let set = select_inclusion_set(ranked, threshold)?;
            Ok(CurvePoint {
                threshold,
                size: set.size,
                expected_false_discoveries: set.expected_false_discoveries,
                realized_q_value: set.realized_q_value,
            })
        })
        .collect()
}
