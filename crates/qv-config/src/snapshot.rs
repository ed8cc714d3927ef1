//! Settings snapshots for report provenance.
//!
//! A snapshot records which settings a run used, so a report can be
//! traced back to the exact file content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::resolve::ConfigSource;
use crate::settings::FdrSettings;

/// A frozen snapshot of effective settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the settings.
    pub schema_version: String,

    /// Where the settings came from.
    pub source: String,

    /// Path the settings were read from, if any.
    #[serde(default)]
    pub path: Option<String>,

    /// SHA-256 of the raw file content, if a file was read.
    #[serde(default)]
    pub file_hash: Option<String>,

    /// SHA-256 of the effective settings serialized as JSON.
    pub settings_hash: String,

    pub target_fdr: f64,
    pub monotone_q_values: bool,
}

impl ConfigSnapshot {
    /// Create a snapshot from effective settings.
    pub fn new(
        settings: &FdrSettings,
        source: ConfigSource,
        path: Option<&std::path::Path>,
        raw: Option<&str>,
    ) -> Self {
        let effective = serde_json::to_string(settings).unwrap_or_default();
        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: settings.schema_version.clone(),
            source: source.to_string(),
            path: path.map(|p| p.display().to_string()),
            file_hash: raw.map(hash_content),
            settings_hash: hash_content(&effective),
            target_fdr: settings.target_fdr,
            monotone_q_values: settings.monotone_q_values,
        }
    }

    /// Snapshot of built-in defaults.
    pub fn defaults_only() -> Self {
        Self::new(
            &FdrSettings::default(),
            ConfigSource::BuiltinDefault,
            None,
            None,
        )
    }

    /// Whether two snapshots describe the same effective settings.
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.settings_hash == other.settings_hash
    }

    /// First 12 hex chars of the settings hash.
    pub fn short_id(&self) -> &str {
        &self.settings_hash[..12.min(self.settings_hash.len())]
    }
}

/// Hex SHA-256 of a string.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
