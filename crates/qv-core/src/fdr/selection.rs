//! Threshold selection over ranked q-values.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{debug, warn};

use super::{check_target, FdrError, RankedHypothesis};
use crate::logging::event_names;
use qv_common::HypothesisId;

/// Hypotheses selected for a target FDR, with diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InclusionSet {
    pub target_fdr: f64,
    /// Included ids in rank order.
    pub included: Vec<HypothesisId>,
    pub size: usize,
    /// Number of ranked hypotheses considered.
    pub candidates: usize,
    /// Highest included rank.
    pub boundary_rank: Option<usize>,
    /// q-value at `boundary_rank`; always under the target.
    pub boundary_q_value: Option<f64>,
    /// Largest q-value anywhere in the included prefix.
    pub realized_q_value: Option<f64>,
    /// Sum of PEP over the included prefix.
    pub expected_false_discoveries: f64,
    /// Some included rank has a q-value at or above the target.
    pub non_monotone: bool,
}

impl InclusionSet {
    fn empty(target_fdr: f64, candidates: usize) -> Self {
        InclusionSet {
            target_fdr,
            included: Vec::new(),
            size: 0,
            candidates,
            boundary_rank: None,
            boundary_q_value: None,
            realized_q_value: None,
            expected_false_discoveries: 0.0,
            non_monotone: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.included.is_empty()
    }

    pub fn contains(&self, id: &HypothesisId) -> bool {
        self.included.contains(id)
    }
}

/// Select the inclusion prefix for `target_fdr`.
///
/// Scans from the highest rank down to the first rank whose q-value is
/// strictly below the target, then includes it and every lower rank. A
/// local bump above the target inside the prefix does not cut it short.
///
/// Input out of rank order is re-sorted (stable) before scanning.
pub fn select_inclusion_set(
    ranked: &[RankedHypothesis],
    target_fdr: f64,
) -> Result<InclusionSet, FdrError> {
    check_target(target_fdr)?;

    let ordered: Cow<'_, [RankedHypothesis]> =
        if ranked.windows(2).all(|w| w[0].rank <= w[1].rank) {
            Cow::Borrowed(ranked)
        } else {
            debug!("ranked input out of order; re-sorting by rank");
            let mut sorted = ranked.to_vec();
            sorted.sort_by_key(|r| r.rank);
            Cow::Owned(sorted)
        };

    let Some(cut) = ordered.iter().rposition(|r| r.q_value < target_fdr) else {
        debug!(
            target_fdr,
            candidates = ordered.len(),
            "no rank meets target"
        );
        return Ok(InclusionSet::empty(target_fdr, ordered.len()));
    };

    let prefix = &ordered[..=cut];
    let boundary = &prefix[cut];
    let realized_q_value = prefix
        .iter()
        .map(|r| r.q_value)
        .fold(f64::NEG_INFINITY, f64::max);
    let expected_false_discoveries: f64 = prefix.iter().map(|r| r.error_probability).sum();
    let non_monotone = prefix.iter().any(|r| r.q_value >= target_fdr);

    if non_monotone {
        warn!(
            target: event_names::SELECT_NON_MONOTONE,
            target_fdr,
            boundary_rank = boundary.rank,
            realized_q_value,
            "included prefix contains q-values at or above target"
        );
    }

    let set = InclusionSet {
        target_fdr,
        included: prefix.iter().map(|r| r.id.clone()).collect(),
        size: prefix.len(),
        candidates: ordered.len(),
        boundary_rank: Some(boundary.rank),
        boundary_q_value: Some(boundary.q_value),
        realized_q_value: Some(realized_q_value),
        expected_false_discoveries,
        non_monotone,
    };
    debug!(
        target_fdr,
        size = set.size,
        candidates = set.candidates,
        "selected inclusion set"
    );
    Ok(set)
}
