//! Posterior error probabilities from Beta posteriors.
//!
//! Given a Beta(alpha, beta) posterior over an item's true rate, the
//! posterior error probability (PEP) of the claim "the true rate lies on
//! the `direction` side of `cutoff`" is the posterior mass on the other
//! side. For `Above` that is I_cutoff(alpha, beta); for `Below` it is
//! 1 - I_cutoff(alpha, beta).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::beta::beta_cdf;

/// Which side of the cutoff an item must fall on to count as a discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Discovery means the true rate exceeds the cutoff.
    #[default]
    Above,
    /// Discovery means the true rate is below the cutoff.
    Below,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Above => write!(f, "above"),
            Direction::Below => write!(f, "below"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "above" | "greater" | "gt" => Ok(Direction::Above),
            "below" | "less" | "lt" => Ok(Direction::Below),
            _ => Err(format!("unknown direction: {}", s)),
        }
    }
}

/// Shape parameters of a Beta posterior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaPosterior {
    pub alpha: f64,
    pub beta: f64,
}

/// Errors evaluating a posterior error probability.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PosteriorError {
    #[error("beta shape parameters must be positive and finite, got alpha={alpha}, beta={beta}")]
    InvalidShape { alpha: f64, beta: f64 },
    #[error("cutoff must be in (0, 1), got {cutoff}")]
    InvalidCutoff { cutoff: f64 },
}

impl BetaPosterior {
    /// Construct a posterior, rejecting non-positive or non-finite shapes.
    pub fn new(alpha: f64, beta: f64) -> Result<Self, PosteriorError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(alpha) || !valid(beta) {
            return Err(PosteriorError::InvalidShape { alpha, beta });
        }
        Ok(BetaPosterior { alpha, beta })
    }

    /// Posterior mean alpha / (alpha + beta).
    pub fn mean(&self) -> f64 {
        super::beta::beta_mean(self.alpha, self.beta)
    }

    /// PEP for the claim that the true rate is on `direction`'s side of `cutoff`.
    pub fn error_probability(
        &self,
        cutoff: f64,
        direction: Direction,
    ) -> Result<f64, PosteriorError> {
        if !(cutoff > 0.0 && cutoff < 1.0) {
            return Err(PosteriorError::InvalidCutoff { cutoff });
        }
        let below = beta_cdf(cutoff, self.alpha, self.beta).clamp(0.0, 1.0);
        Ok(match direction {
            Direction::Above => below,
            Direction::Below => 1.0 - below,
        })
    }
}

/// Convenience wrapper: PEP of Beta(alpha, beta) relative to `cutoff`.
pub fn posterior_error_probability(
    alpha: f64,
    beta: f64,
    cutoff: f64,
    direction: Direction,
) -> Result<f64, PosteriorError> {
    BetaPosterior::new(alpha, beta)?.error_probability(cutoff, direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_posterior_pep_is_cutoff() {
        let pep = posterior_error_probability(1.0, 1.0, 0.3, Direction::Above).unwrap();
        assert!((pep - 0.3).abs() < 1e-12);
        let pep = posterior_error_probability(1.0, 1.0, 0.3, Direction::Below).unwrap();
        assert!((pep - 0.7).abs() < 1e-12);
    }

    #[test]
    fn directions_are_complementary() {
        let above = posterior_error_probability(90.0, 210.0, 0.3, Direction::Above).unwrap();
        let below = posterior_error_probability(90.0, 210.0, 0.3, Direction::Below).unwrap();
        assert!((above + below - 1.0).abs() < 1e-12);
    }

    #[test]
    fn strong_posterior_above_cutoff_has_small_pep() {
        // mean 0.35 with ~4000 effective trials
        let pep = posterior_error_probability(1400.0, 2600.0, 0.3, Direction::Above).unwrap();
        assert!(pep < 1e-6, "pep = {pep}");
    }

    #[test]
    fn rejects_bad_shapes_and_cutoffs() {
        assert!(matches!(
            BetaPosterior::new(0.0, 2.0),
            Err(PosteriorError::InvalidShape { .. })
        ));
        assert!(matches!(
            BetaPosterior::new(2.0, f64::INFINITY),
            Err(PosteriorError::InvalidShape { .. })
        ));
        let post = BetaPosterior::new(2.0, 2.0).unwrap();
        assert!(matches!(
            post.error_probability(1.0, Direction::Above),
            Err(PosteriorError::InvalidCutoff { .. })
        ));
        assert!(post.error_probability(f64::NAN, Direction::Above).is_err());
    }

    #[test]
    fn direction_parses() {
        assert_eq!("above".parse::<Direction>().unwrap(), Direction::Above);
        assert_eq!("LT".parse::<Direction>().unwrap(), Direction::Below);
        assert!("sideways".parse::<Direction>().is_err());
        assert_eq!(Direction::Below.to_string(), "below");
    }

    #[test]
    fn mean_is_exposed() {
        let post = BetaPosterior::new(3.0, 7.0).unwrap();
        assert!((post.mean() - 0.3).abs() < 1e-12);
    }
}
