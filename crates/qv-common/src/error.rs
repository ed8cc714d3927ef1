//! Error types for q-value triage.
//!
//! Every error carries:
//! - A stable numeric code for machine parsing
//! - A category for grouping
//! - A recoverability hint and a suggested action for automation
//! - A remediation sentence for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Invalid Error Probability
//!   Reason: error probability for 'ruthba01' must be in [0, 1], got 1.3
//!   Fix: Error probabilities are posterior probabilities; re-check the upstream estimation step.
//! ```
//!
//! # Agent-Facing Output
//!
//! ```json
//! {
//!   "code": 30,
//!   "category": "fdr",
//!   "message": "error probability for 'ruthba01' must be in [0, 1], got 1.3",
//!   "recoverable": true,
//!   "suggested_action": "fix_input",
//!   "context": { "id": "ruthba01", "value": 1.3 }
//! }
//! ```
//!
//! Inputs are never partially processed: the first violation aborts the
//! whole call, since dropping an item would change the meaning of every
//! q-value computed after it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for q-value triage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Settings files, presets, schema versions.
    Config,
    /// Reading and parsing hypothesis records.
    Input,
    /// Q-value computation and selection preconditions.
    Fdr,
    /// Command-line flag values.
    Args,
    /// File I/O and serialization.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Fdr => write!(f, "fdr"),
            ErrorCategory::Args => write!(f, "args"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Suggested actions for agents to take in response to errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Retry the operation.
    Retry,
    /// Correct the input data at its source.
    FixInput,
    /// Correct the invocation arguments.
    FixArguments,
    /// Run the settings validator.
    RunCheck,
    /// Reset settings to defaults.
    ResetConfig,
    /// Manual intervention required.
    ManualIntervention,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::Retry => write!(f, "retry"),
            SuggestedAction::FixInput => write!(f, "fix_input"),
            SuggestedAction::FixArguments => write!(f, "fix_arguments"),
            SuggestedAction::RunCheck => write!(f, "run_check"),
            SuggestedAction::ResetConfig => write!(f, "reset_config"),
            SuggestedAction::ManualIntervention => write!(f, "manual_intervention"),
        }
    }
}

/// Unified error type for q-value triage.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid setting {field}: {message}")]
    InvalidSetting { field: String, message: String },

    #[error("settings schema version mismatch: expected {expected}, got {actual}")]
    SchemaVersion { expected: String, actual: String },

    // Input errors (20-29)
    #[error("malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    #[error("record '{id}' at {location} has no error probability and no posterior to derive one from")]
    MissingProbability { id: String, location: String },

    // FDR errors (30-39)
    #[error("error probability for '{id}' must be in [0, 1], got {value}")]
    InvalidProbability { id: String, value: f64 },

    #[error("target FDR must be in (0, 1], got {target}")]
    InvalidThreshold { target: f64 },

    #[error("invalid posterior for '{id}' at {location}: {message}")]
    InvalidPosterior {
        id: String,
        location: String,
        message: String,
    },

    // Argument errors (40-49)
    #[error("invalid value for {argument}: {message}")]
    InvalidArgument { argument: String, message: String },

    // I/O errors (60-69)
    #[error("I/O error reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code.
    ///
    /// - 10-19: Configuration errors
    /// - 20-29: Input errors
    /// - 30-39: FDR precondition errors
    /// - 40-49: Argument errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidSetting { .. } => 11,
            Error::SchemaVersion { .. } => 12,
            Error::MalformedRecord { .. } => 21,
            Error::MissingProbability { .. } => 22,
            Error::InvalidProbability { .. } => 30,
            Error::InvalidThreshold { .. } => 31,
            Error::InvalidPosterior { .. } => 32,
            Error::InvalidArgument { .. } => 40,
            Error::Read { .. } => 60,
            Error::Io(_) => 61,
            Error::Json(_) => 62,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidSetting { .. } | Error::SchemaVersion { .. } => {
                ErrorCategory::Config
            }
            Error::MalformedRecord { .. } | Error::MissingProbability { .. } => ErrorCategory::Input,
            Error::InvalidProbability { .. }
            | Error::InvalidThreshold { .. }
            | Error::InvalidPosterior { .. } => ErrorCategory::Fdr,
            Error::InvalidArgument { .. } => ErrorCategory::Args,
            Error::Read { .. } | Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether the caller can fix the problem and try again.
    ///
    /// Everything except a failure to serialize our own output is
    /// caused by the caller's data, arguments, or environment.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Json(_))
    }

    /// Returns the suggested action for agents.
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::Config(_) => SuggestedAction::RunCheck,
            Error::InvalidSetting { .. } => SuggestedAction::RunCheck,
            Error::SchemaVersion { .. } => SuggestedAction::ResetConfig,

            Error::MalformedRecord { .. }
            | Error::MissingProbability { .. }
            | Error::InvalidProbability { .. }
            | Error::InvalidPosterior { .. } => SuggestedAction::FixInput,

            Error::InvalidThreshold { .. } | Error::InvalidArgument { .. } => {
                SuggestedAction::FixArguments
            }

            Error::Read { .. } | Error::Io(_) => SuggestedAction::Retry,
            Error::Json(_) => SuggestedAction::ManualIntervention,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) | Error::InvalidSetting { .. } => {
                "Run 'qv-core config validate' to check the settings file."
            }
            Error::SchemaVersion { .. } => {
                "Regenerate the settings file with 'qv-core config show' and re-apply your changes."
            }
            Error::MalformedRecord { .. } => {
                "Fix the record on the reported line; each record needs an id and a probability."
            }
            Error::MissingProbability { .. } => {
                "Provide 'error_probability' per record, or 'alpha'/'beta' together with '--cutoff'."
            }
            Error::InvalidProbability { .. } => {
                "Error probabilities are posterior probabilities; re-check the upstream estimation step."
            }
            Error::InvalidThreshold { .. } => {
                "Pass a target FDR greater than 0 and at most 1, e.g. '--target-fdr 0.05'."
            }
            Error::InvalidPosterior { .. } => {
                "Beta shape parameters must be positive and the cutoff must lie strictly between 0 and 1."
            }
            Error::InvalidArgument { .. } => {
                "Check the flag value against 'qv-core <command> --help'."
            }
            Error::Read { .. } | Error::Io(_) => {
                "Check that the file exists and is readable, then retry."
            }
            Error::Json(_) => "Internal serialization failure. Please report it with the input that triggered it.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidSetting { .. } => "Invalid Setting",
            Error::SchemaVersion { .. } => "Settings Schema Mismatch",
            Error::MalformedRecord { .. } => "Malformed Record",
            Error::MissingProbability { .. } => "Missing Error Probability",
            Error::InvalidProbability { .. } => "Invalid Error Probability",
            Error::InvalidThreshold { .. } => "Invalid Target FDR",
            Error::InvalidPosterior { .. } => "Invalid Posterior",
            Error::InvalidArgument { .. } => "Invalid Argument",
            Error::Read { .. } | Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Suggested action for agents.
    pub suggested_action: SuggestedAction,

    /// Additional structured context (offending id, value, path...).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::InvalidSetting { field, .. } => {
                context.insert("field".to_string(), serde_json::json!(field));
            }
            Error::MalformedRecord { line, .. } => {
                context.insert("line".to_string(), serde_json::json!(line));
            }
            Error::MissingProbability { id, location }
            | Error::InvalidPosterior { id, location, .. } => {
                context.insert("id".to_string(), serde_json::json!(id));
                context.insert("location".to_string(), serde_json::json!(location));
            }
            Error::InvalidProbability { id, value } => {
                context.insert("id".to_string(), serde_json::json!(id));
                context.insert("value".to_string(), serde_json::json!(value));
            }
            Error::InvalidThreshold { target } => {
                context.insert("target_fdr".to_string(), serde_json::json!(target));
            }
            Error::InvalidArgument { argument, .. } => {
                context.insert("argument".to_string(), serde_json::json!(argument));
            }
            Error::Read { path, .. } => {
                context.insert("path".to_string(), serde_json::json!(path));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to a compact JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
