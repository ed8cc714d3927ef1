//! Named settings presets.
//!
//! - Strict: 1% target FDR, for confirmatory reporting
//! - Standard: 5% target FDR, the conventional default
//! - Exploratory: 10% target FDR with monotone q-values, for shortlists

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::settings::FdrSettings;

/// Available settings presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetName {
    Strict,
    Standard,
    Exploratory,
}

impl PresetName {
    /// All available preset names.
    pub const ALL: &'static [PresetName] = &[
        PresetName::Strict,
        PresetName::Standard,
        PresetName::Exploratory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresetName::Strict => "strict",
            PresetName::Standard => "standard",
            PresetName::Exploratory => "exploratory",
        }
    }

    /// Parse preset name, accepting a few aliases.
    pub fn parse(s: &str) -> Option<PresetName> {
        match s.to_lowercase().as_str() {
            "strict" | "conservative" => Some(PresetName::Strict),
            "standard" | "default" => Some(PresetName::Standard),
            "exploratory" | "explore" | "lenient" => Some(PresetName::Exploratory),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PresetName::Strict => "1% target FDR for confirmatory claims",
            PresetName::Standard => "5% target FDR, conventional default",
            PresetName::Exploratory => "10% target FDR with monotone q-values for shortlists",
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresetName {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetName::parse(s).ok_or_else(|| PresetError::UnknownPreset(s.to_string()))
    }
}

/// Errors related to preset operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresetError {
    #[error("Unknown preset '{0}'. Available: strict, standard, exploratory")]
    UnknownPreset(String),
}

/// Summary of a preset for listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetInfo {
    pub name: PresetName,
    pub description: String,
    pub target_fdr: f64,
    pub monotone_q_values: bool,
}

/// Settings for a preset.
pub fn get_preset(name: PresetName) -> FdrSettings {
    let base = FdrSettings::default();
    match name {
        PresetName::Strict => FdrSettings {
            target_fdr: 0.01,
            curve_thresholds: vec![0.001, 0.005, 0.01, 0.025, 0.05],
            ..base
        },
        PresetName::Standard => base,
        PresetName::Exploratory => FdrSettings {
            target_fdr: 0.10,
            monotone_q_values: true,
            curve_thresholds: vec![0.05, 0.1, 0.15, 0.2, 0.3],
            ..base
        },
    }
}

/// Describe all presets.
pub fn list_presets() -> Vec<PresetInfo> {
    PresetName::ALL
        .iter()
        .map(|&name| {
            let settings = get_preset(name);
            PresetInfo {
                name,
                description: name.description().to_string(),
                target_fdr: settings.target_fdr,
                monotone_q_values: settings.monotone_q_values,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_settings;

    #[test]
    fn parse_aliases() {
        assert_eq!(PresetName::parse("STRICT"), Some(PresetName::Strict));
        assert_eq!(PresetName::parse("default"), Some(PresetName::Standard));
        assert_eq!(PresetName::parse("explore"), Some(PresetName::Exploratory));
        assert_eq!(PresetName::parse("yolo"), None);
        assert!("yolo".parse::<PresetName>().is_err());
    }

    #[test]
    fn all_presets_validate() {
        for &name in PresetName::ALL {
            assert!(validate_settings(&get_preset(name)).is_ok(), "{name} invalid");
        }
    }

    #[test]
    fn target_ordering() {
        let strict = get_preset(PresetName::Strict).target_fdr;
        let standard = get_preset(PresetName::Standard).target_fdr;
        let exploratory = get_preset(PresetName::Exploratory).target_fdr;
        assert!(strict < standard && standard < exploratory);
    }

    #[test]
    fn list_covers_all() {
        let infos = list_presets();
        assert_eq!(infos.len(), PresetName::ALL.len());
        assert!(infos.iter().any(|i| i.name == PresetName::Exploratory && i.monotone_q_values));
    }

    #[test]
    fn unknown_preset_message_lists_choices() {
        let err = PresetError::UnknownPreset("yolo".into());
        assert!(err.to_string().contains("strict, standard, exploratory"));
    }
}
