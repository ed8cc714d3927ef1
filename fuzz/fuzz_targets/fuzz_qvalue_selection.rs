//! Fuzz target for ranking and selection.
//!
//! Arbitrary probabilities (NaN and out-of-range included) must produce an
//! error or a prefix selection, never a panic.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use qv_core::fdr::{compute_q_values, enforce_monotone, select_inclusion_set, Hypothesis};

#[derive(Debug, Arbitrary)]
struct Batch {
    peps: Vec<f64>,
    target: f64,
    monotone: bool,
}

fuzz_target!(|batch: Batch| {
    let hypotheses: Vec<Hypothesis> = batch
        .peps
        .iter()
        .enumerate()
        .map(|(i, &p)| Hypothesis::new(format!("h{i}"), p))
        .collect();

    let Ok(mut ranked) = compute_q_values(&hypotheses) else {
        return;
    };
    if batch.monotone {
        enforce_monotone(&mut ranked);
    }
    if let Ok(set) = select_inclusion_set(&ranked, batch.target) {
        assert!(set.size <= ranked.len());
        assert_eq!(set.included.len(), set.size);
    }
});
