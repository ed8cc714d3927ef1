//! False discovery rate control over posterior error probabilities.
//!
//! Hypotheses are ranked by ascending PEP. The q-value at rank k is the mean
//! PEP of ranks 1..=k, i.e. the expected false discovery proportion if the
//! top k were reported. Selection takes the longest prefix whose boundary
//! q-value is strictly under the target.
//!
//! All operations are pure functions over immutable batches.

mod curve;
mod qvalue;
mod selection;

pub use curve::{inclusion_curve, CurvePoint};
pub use qvalue::{compute_q_values, enforce_monotone, is_monotone, RankedHypothesis};
pub use selection::{select_inclusion_set, InclusionSet};

use qv_common::HypothesisId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A hypothesis handed to the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub id: HypothesisId,
    /// Posterior error probability, in [0, 1].
    pub error_probability: f64,
}

impl Hypothesis {
    pub fn new(id: impl Into<HypothesisId>, error_probability: f64) -> Self {
        Hypothesis {
            id: id.into(),
            error_probability,
        }
    }
}

/// Errors raised by the controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FdrError {
    #[error("error probability for '{id}' must be in [0, 1], got {value}")]
    InvalidProbability { id: HypothesisId, value: f64 },

    #[error("target FDR must be in (0, 1], got {target}")]
    InvalidThreshold { target: f64 },
}

impl From<FdrError> for qv_common::Error {
    fn from(err: FdrError) -> Self {
        match err {
            FdrError::InvalidProbability { id, value } => qv_common::Error::InvalidProbability {
                id: id.0,
                value,
            },
            FdrError::InvalidThreshold { target } => qv_common::Error::InvalidThreshold { target },
        }
    }
}

/// Whether `target` is a usable FDR level.
pub fn check_target(target: f64) -> Result<(), FdrError> {
    if target > 0.0 && target <= 1.0 {
        Ok(())
    } else {
        Err(FdrError::InvalidThreshold { target })
    }
}
