//! Property-based tests for qv-math.

use proptest::prelude::*;
use qv_math::{beta_cdf, ln_beta, ln_gamma, posterior_error_probability, Direction};

const TOL: f64 = 1e-9;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Gamma(z + 1) = z * Gamma(z).
    #[test]
    fn ln_gamma_recurrence(z in 0.1..150.0f64) {
        let lhs = ln_gamma(z + 1.0);
        let rhs = z.ln() + ln_gamma(z);
        prop_assert!((lhs - rhs).abs() <= TOL * lhs.abs().max(1.0), "z={} lhs={} rhs={}", z, lhs, rhs);
    }

    #[test]
    fn ln_beta_symmetric(a in 0.1..500.0f64, b in 0.1..500.0f64) {
        let ab = ln_beta(a, b);
        let ba = ln_beta(b, a);
        prop_assert!((ab - ba).abs() <= TOL * ab.abs().max(1.0));
    }

    #[test]
    fn beta_cdf_bounded(x in 0.0..=1.0f64, a in 0.1..500.0f64, b in 0.1..500.0f64) {
        let p = beta_cdf(x, a, b);
        prop_assert!((-1e-12..=1.0 + 1e-12).contains(&p), "I_{}({}, {}) = {}", x, a, b, p);
    }

    #[test]
    fn beta_cdf_monotone(x1 in 0.0..1.0f64, dx in 0.0..0.5f64, a in 0.5..300.0f64, b in 0.5..300.0f64) {
        let x2 = (x1 + dx).min(1.0);
        prop_assert!(beta_cdf(x1, a, b) <= beta_cdf(x2, a, b) + 1e-10);
    }

    #[test]
    fn beta_cdf_reflection(x in 0.01..0.99f64, a in 0.5..300.0f64, b in 0.5..300.0f64) {
        let lhs = beta_cdf(x, a, b);
        let rhs = 1.0 - beta_cdf(1.0 - x, b, a);
        prop_assert!((lhs - rhs).abs() <= 1e-8, "lhs={} rhs={}", lhs, rhs);
    }

    #[test]
    fn pep_is_a_probability(a in 0.5..2000.0f64, b in 0.5..2000.0f64, cutoff in 0.01..0.99f64) {
        for direction in [Direction::Above, Direction::Below] {
            let pep = posterior_error_probability(a, b, cutoff, direction).unwrap();
            prop_assert!((0.0..=1.0).contains(&pep));
        }
    }
}
