//! Ranking and cumulative-mean q-values.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use super::{FdrError, Hypothesis};
use qv_common::HypothesisId;

/// A hypothesis with its rank and q-value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedHypothesis {
    pub id: HypothesisId,
    /// 1-based position in ascending-PEP order.
    pub rank: usize,
    pub error_probability: f64,
    /// 1 - PEP.
    pub inclusion_probability: f64,
    /// Mean PEP over ranks 1..=rank.
    pub q_value: f64,
}

/// Rank hypotheses by ascending PEP and compute q-values.
///
/// Ties keep input order. Every PEP must lie in [0, 1]; the first one that
/// does not (NaN included) fails the whole call.
pub fn compute_q_values(hypotheses: &[Hypothesis]) -> Result<Vec<RankedHypothesis>, FdrError> {
    for h in hypotheses {
        let p = h.error_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(FdrError::InvalidProbability {
                id: h.id.clone(),
                value: p,
            });
        }
    }

    let mut order: Vec<usize> = (0..hypotheses.len()).collect();
    // sort_by is stable; NaN was rejected above
    order.sort_by(|&a, &b| {
        hypotheses[a]
            .error_probability
            .partial_cmp(&hypotheses[b].error_probability)
            .unwrap_or(Ordering::Equal)
    });

    let mut running_sum = 0.0;
    let ranked: Vec<RankedHypothesis> = order
        .into_iter()
        .enumerate()
        .map(|(i, idx)| {
            let h = &hypotheses[idx];
            let rank = i + 1;
            running_sum += h.error_probability;
            RankedHypothesis {
                id: h.id.clone(),
                rank,
                error_probability: h.error_probability,
                inclusion_probability: 1.0 - h.error_probability,
                q_value: running_sum / rank as f64,
            }
        })
        .collect();

    debug!(
        hypotheses = ranked.len(),
        max_q_value = ranked.last().map(|r| r.q_value).unwrap_or(0.0),
        "computed q-values"
    );
    Ok(ranked)
}

/// Replace each q-value with the minimum over its rank and every higher
/// rank, making the sequence non-decreasing.
///
/// Expects rank order.
pub fn enforce_monotone(ranked: &mut [RankedHypothesis]) {
    let mut running_min = f64::INFINITY;
    for r in ranked.iter_mut().rev() {
        running_min = running_min.min(r.q_value);
        r.q_value = running_min;
    }
}

/// Whether q-values never decrease along the slice.
pub fn is_monotone(ranked: &[RankedHypothesis]) -> bool {
    ranked.windows(2).all(|w| w[0].q_value <= w[1].q_value)
}
