//! Settings loading with provenance.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::preset::{get_preset, PresetName};
use crate::resolve::{resolve_settings_path, ConfigSource};
use crate::settings::FdrSettings;
use crate::snapshot::ConfigSnapshot;
use crate::validate::{validate_settings, ValidationError};

/// Settings loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ConfigError> for qv_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => {
                qv_common::Error::Config(format!("config file not found: {}", path.display()))
            }
            ConfigError::ParseError { path, source } => qv_common::Error::Config(format!(
                "invalid JSON in {}: {}",
                path.display(),
                source
            )),
            ConfigError::ValidationError(v) => v.into(),
            ConfigError::IoError { path, source } => qv_common::Error::Read { path, source },
        }
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit settings file (`--config`).
    pub path: Option<PathBuf>,

    /// Named preset (`--preset`). Ignored when `path` is set.
    pub preset: Option<PresetName>,
}

/// Effective settings with provenance.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: FdrSettings,
    pub source: ConfigSource,
    pub path: Option<PathBuf>,
    pub snapshot: ConfigSnapshot,
}

/// Load settings.
///
/// Precedence: explicit `--config` file, then `--preset`, then a
/// discovered file (env, XDG, system), then built-in defaults. The result
/// is validated before it is returned.
pub fn load_settings(options: &LoadOptions) -> Result<LoadedSettings, ConfigError> {
    if options.path.is_none() {
        if let Some(preset) = options.preset {
            let settings = get_preset(preset);
            validate_settings(&settings)?;
            debug!(preset = %preset, "using settings preset");
            let snapshot = ConfigSnapshot::new(&settings, ConfigSource::Preset, None, None);
            return Ok(LoadedSettings {
                settings,
                source: ConfigSource::Preset,
                path: None,
                snapshot,
            });
        }
    }

    let (path, source) = resolve_settings_path(options.path.as_deref());
    let Some(path) = path else {
        return Ok(LoadedSettings {
            settings: FdrSettings::default(),
            source,
            path: None,
            snapshot: ConfigSnapshot::defaults_only(),
        });
    };

    let (settings, raw) = load_settings_file(&path)?;
    validate_settings(&settings)?;
    debug!(path = %path.display(), source = %source, "loaded settings file");

    let snapshot = ConfigSnapshot::new(&settings, source, Some(&path), Some(&raw));
    Ok(LoadedSettings {
        settings,
        source,
        path: Some(path),
        snapshot,
    })
}

/// Read and parse a settings file without semantic validation.
pub fn load_settings_file(path: &Path) -> Result<(FdrSettings, String), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = serde_json::from_str(&raw).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((settings, raw))
}
