//! Semantic validation of settings.

use thiserror::Error;

use crate::settings::FdrSettings;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Settings validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate settings semantically.
pub fn validate_settings(settings: &FdrSettings) -> ValidationResult<()> {
    if settings.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: settings.schema_version.clone(),
        });
    }

    validate_target("target_fdr", settings.target_fdr)?;

    if let Some(cutoff) = settings.posterior.cutoff {
        if !(cutoff > 0.0 && cutoff < 1.0) {
            return Err(ValidationError::invalid(
                "posterior.cutoff",
                format!("Must be in (0, 1), got {}", cutoff),
            ));
        }
    }

    if settings.curve_thresholds.is_empty() {
        return Err(ValidationError::invalid(
            "curve_thresholds",
            "Must list at least one threshold",
        ));
    }
    for (i, t) in settings.curve_thresholds.iter().enumerate() {
        validate_target(&format!("curve_thresholds[{}]", i), *t)?;
    }

    if settings.max_rows == Some(0) {
        return Err(ValidationError::invalid(
            "max_rows",
            "Must be positive when set",
        ));
    }

    Ok(())
}

/// A target FDR lives in (0, 1].
fn validate_target(field: &str, value: f64) -> ValidationResult<()> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(ValidationError::invalid(
            field,
            format!("Must be in (0, 1], got {}", value),
        ));
    }
    Ok(())
}

impl From<ValidationError> for qv_common::Error {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidValue { field, message } => {
                qv_common::Error::InvalidSetting { field, message }
            }
            ValidationError::VersionMismatch { expected, actual } => {
                qv_common::Error::SchemaVersion { expected, actual }
            }
        }
    }
}

/// Re-validate settings after command-line flags were layered on top of
/// loaded settings. The loaded settings already passed, so a bad field came
/// from a flag and is reported as an argument error.
pub fn validate_flag_overrides(settings: &FdrSettings) -> Result<(), qv_common::Error> {
    match validate_settings(settings) {
        Ok(()) => Ok(()),
        Err(ValidationError::InvalidValue { field, message }) => {
            Err(qv_common::Error::InvalidArgument {
                argument: flag_for_field(&field).to_string(),
                message,
            })
        }
        Err(other) => Err(other.into()),
    }
}

fn flag_for_field(field: &str) -> &str {
    match field {
        "target_fdr" => "--target-fdr",
        "posterior.cutoff" => "--cutoff",
        "max_rows" => "--max-rows",
        f if f.starts_with("curve_thresholds") => "--thresholds",
        other => other,
    }
}
