//! Log-domain special functions.

use std::f64::consts::PI;

const HALF_LN_TWO_PI: f64 = 0.918_938_533_204_672_8;
const LANCZOS_G: f64 = 7.0;
#[allow(clippy::excessive_precision)] // published Lanczos coefficients (g = 7, n = 9)
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of |Gamma(z)|.
///
/// Lanczos approximation, with the reflection formula below 0.5.
/// Poles (zero and negative integers) return NaN.
pub fn ln_gamma(z: f64) -> f64 {
    if z.is_nan() || z == f64::NEG_INFINITY {
        return f64::NAN;
    }
    if z == f64::INFINITY {
        return f64::INFINITY;
    }
    if z <= 0.0 && z.fract() == 0.0 {
        return f64::NAN;
    }
    if z < 0.5 {
        let sin_pi_z = (PI * z).sin();
        return PI.ln() - sin_pi_z.abs().ln() - ln_gamma(1.0 - z);
    }

    let shifted = z - 1.0;
    let series = LANCZOS_COEFFS
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS_COEFFS[0], |acc, (i, c)| acc + c / (shifted + i as f64));
    let t = shifted + LANCZOS_G + 0.5;
    HALF_LN_TWO_PI + (shifted + 0.5) * t.ln() - t + series.ln()
}

/// ln B(a, b) = ln Gamma(a) + ln Gamma(b) - ln Gamma(a + b).
pub fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        !a.is_nan() && !b.is_nan() && (a - b).abs() <= tol
    }

    #[test]
    fn ln_gamma_integers_are_log_factorials() {
        assert!(close(ln_gamma(1.0), 0.0, 1e-12));
        assert!(close(ln_gamma(2.0), 0.0, 1e-12));
        assert!(close(ln_gamma(5.0), 24.0f64.ln(), 1e-10));
        assert!(close(ln_gamma(11.0), 3_628_800.0f64.ln(), 1e-9));
    }

    #[test]
    fn ln_gamma_half_is_ln_sqrt_pi() {
        assert!(close(ln_gamma(0.5), 0.5 * PI.ln(), 1e-10));
    }

    #[test]
    fn ln_gamma_reflection_branch() {
        // Gamma(-0.5) = -2 sqrt(pi)
        let expected = (2.0 * PI.sqrt()).ln();
        assert!(close(ln_gamma(-0.5), expected, 1e-9));
    }

    #[test]
    fn ln_gamma_poles_are_nan() {
        assert!(ln_gamma(0.0).is_nan());
        assert!(ln_gamma(-3.0).is_nan());
        assert!(ln_gamma(f64::NAN).is_nan());
    }

    #[test]
    fn ln_beta_known_values() {
        assert!(close(ln_beta(1.0, 1.0), 0.0, 1e-12));
        // B(2, 3) = 1/12
        assert!(close(ln_beta(2.0, 3.0), (1.0f64 / 12.0).ln(), 1e-10));
    }

    #[test]
    fn ln_beta_is_symmetric() {
        assert!(close(ln_beta(78.7, 224.9), ln_beta(224.9, 78.7), 1e-9));
    }
}
