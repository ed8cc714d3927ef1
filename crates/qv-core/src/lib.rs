//! Q-value triage core library.
//!
//! Ranks hypotheses by posterior error probability, computes cumulative-mean
//! q-values, and selects the largest prefix whose q-value stays under a
//! target false discovery rate.

pub mod exit_codes;
pub mod fdr;
pub mod input;
pub mod logging;
pub mod output;

pub use fdr::{
    compute_q_values, enforce_monotone, inclusion_curve, is_monotone, select_inclusion_set,
    CurvePoint, FdrError, Hypothesis, InclusionSet, RankedHypothesis,
};
