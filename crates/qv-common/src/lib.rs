//! Q-value triage common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - Hypothesis and run identity types
//! - The unified error taxonomy with stable codes
//! - Output formats
//! - Report schema versioning

pub mod error;
pub mod id;
pub mod output;

pub use error::{
    format_error_human, Error, ErrorCategory, Result, StructuredError, SuggestedAction,
};
pub use id::{HypothesisId, RunId};
pub use output::OutputFormat;

/// Schema version stamped on every report payload.
pub const SCHEMA_VERSION: &str = "1.0.0";
