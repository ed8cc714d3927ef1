//! Exit codes for the qv-core CLI.
//!
//! Exit code ranges:
//! - 0-1: Operational outcomes (the run completed)
//! - 10-19: User errors (fix arguments, input, or settings)
//! - 20-29: Internal and I/O errors

use qv_common::{Error, ErrorCategory};

/// Exit codes for qv-core operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Clean = 0,

    /// Ran fine, but no rank met the target FDR
    EmptySelection = 1,

    /// Invalid arguments (out-of-range flag values included)
    ArgsError = 10,

    /// Invalid input data (malformed records, probabilities outside [0, 1])
    InputError = 11,

    /// Invalid settings file or preset
    ConfigError = 12,

    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Codes 0-1: the run completed.
    pub fn is_operational(self) -> bool {
        (self as i32) < 10
    }

    /// Codes 10-19.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Codes 20 and up.
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Stable name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::EmptySelection => "OK_EMPTY_SELECTION",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Exit code for a failed run.
    pub fn for_error(err: &Error) -> ExitCode {
        match err {
            Error::InvalidThreshold { .. } => ExitCode::ArgsError,
            Error::Json(_) => ExitCode::InternalError,
            _ => match err.category() {
                ErrorCategory::Config => ExitCode::ConfigError,
                ErrorCategory::Input | ErrorCategory::Fdr => ExitCode::InputError,
                ErrorCategory::Args => ExitCode::ArgsError,
                ErrorCategory::Io => ExitCode::IoError,
            },
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        assert!(ExitCode::Clean.is_operational());
        assert!(ExitCode::EmptySelection.is_operational());
        assert!(ExitCode::ArgsError.is_user_error());
        assert!(ExitCode::ConfigError.is_user_error());
        assert!(ExitCode::IoError.is_internal_error());
        assert!(!ExitCode::InputError.is_internal_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::EmptySelection.to_string(), "OK_EMPTY_SELECTION (1)");
        assert_eq!(i32::from(ExitCode::InputError), 11);
    }

    #[test]
    fn test_for_error() {
        let cases = [
            (
                Error::InvalidProbability {
                    id: "a".into(),
                    value: 2.0,
                },
                ExitCode::InputError,
            ),
            (Error::InvalidThreshold { target: 0.0 }, ExitCode::ArgsError),
            (
                Error::InvalidArgument {
                    argument: "--cutoff".into(),
                    message: "Must be in (0, 1), got 2".into(),
                },
                ExitCode::ArgsError,
            ),
            (
                Error::InvalidSetting {
                    field: "target_fdr".into(),
                    message: "bad".into(),
                },
                ExitCode::ConfigError,
            ),
            (
                Error::MalformedRecord {
                    line: 1,
                    message: "x".into(),
                },
                ExitCode::InputError,
            ),
            (
                Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "boom")),
                ExitCode::IoError,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ExitCode::for_error(&err), expected, "{err}");
        }
    }
}
