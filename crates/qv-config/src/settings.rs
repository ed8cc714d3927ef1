//! Typed settings for the q-value controller.

use qv_math::Direction;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default q-value thresholds reported by the inclusion curve.
pub const DEFAULT_CURVE_THRESHOLDS: [f64; 5] = [0.01, 0.025, 0.05, 0.1, 0.2];

/// Contents of `fdr.json`.
///
/// Every field has a default, so a partial file only overrides what it
/// names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FdrSettings {
    /// Settings schema version.
    pub schema_version: String,

    /// Target false discovery rate; ranks with q-value strictly below it
    /// are eligible for inclusion. Must be in (0, 1].
    pub target_fdr: f64,

    /// Apply the tail running-minimum correction to reported q-values.
    pub monotone_q_values: bool,

    /// How to derive error probabilities from Beta posteriors.
    pub posterior: PosteriorSettings,

    /// Thresholds evaluated by the inclusion curve.
    pub curve_thresholds: Vec<f64>,

    /// Truncate rendered ranked tables to this many rows.
    pub max_rows: Option<usize>,
}

impl Default for FdrSettings {
    fn default() -> Self {
        FdrSettings {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            target_fdr: 0.05,
            monotone_q_values: false,
            posterior: PosteriorSettings::default(),
            curve_thresholds: DEFAULT_CURVE_THRESHOLDS.to_vec(),
            max_rows: None,
        }
    }
}

/// Posterior-mode settings.
///
/// Records that carry `alpha`/`beta` instead of an error probability get
/// PEP = posterior mass on the wrong side of `cutoff`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PosteriorSettings {
    /// Rate cutoff in (0, 1). None disables posterior mode.
    pub cutoff: Option<f64>,

    /// Side of the cutoff that counts as a discovery ("above" or "below").
    #[schemars(with = "String")]
    pub direction: Direction,
}

impl FdrSettings {
    /// JSON schema for the settings file.
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(FdrSettings)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = FdrSettings::default();
        assert_eq!(s.target_fdr, 0.05);
        assert!(!s.monotone_q_values);
        assert_eq!(s.posterior.cutoff, None);
        assert_eq!(s.posterior.direction, Direction::Above);
        assert_eq!(s.curve_thresholds.len(), 5);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let s: FdrSettings =
            serde_json::from_str(r#"{"target_fdr": 0.1, "posterior": {"cutoff": 0.3}}"#).unwrap();
        assert_eq!(s.target_fdr, 0.1);
        assert_eq!(s.posterior.cutoff, Some(0.3));
        assert_eq!(s.posterior.direction, Direction::Above);
        assert_eq!(s.schema_version, crate::CONFIG_SCHEMA_VERSION);
    }

    #[test]
    fn direction_uses_lowercase_names() {
        let s: FdrSettings =
            serde_json::from_str(r#"{"posterior": {"cutoff": 0.2, "direction": "below"}}"#)
                .unwrap();
        assert_eq!(s.posterior.direction, Direction::Below);
    }

    #[test]
    fn schema_mentions_fields() {
        let schema = FdrSettings::json_schema().to_string();
        assert!(schema.contains("target_fdr"));
        assert!(schema.contains("curve_thresholds"));
    }
}
