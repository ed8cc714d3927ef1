//! Q-value triage settings loading and validation.
//!
//! This crate provides:
//! - The typed `fdr.json` settings struct
//! - Named presets (strict, standard, exploratory)
//! - Path resolution (CLI → env → XDG → system → defaults)
//! - Semantic validation
//! - Settings snapshots for report provenance

pub mod load;
pub mod preset;
pub mod resolve;
pub mod settings;
pub mod snapshot;
pub mod validate;

pub use load::{load_settings, ConfigError, LoadOptions, LoadedSettings};
pub use preset::{get_preset, list_presets, PresetError, PresetInfo, PresetName};
pub use resolve::{resolve_settings_path, ConfigSource};
pub use settings::{FdrSettings, PosteriorSettings};
pub use snapshot::ConfigSnapshot;
pub use validate::{
    validate_flag_overrides, validate_settings, ValidationError, ValidationResult,
};

/// Schema version for settings files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
