//! Downstream crates reach the error helpers through the crate root.

use qv_common::{format_error_human, Error, ErrorCategory, StructuredError};

#[test]
fn human_rendering_is_exported() {
    let err = Error::InvalidThreshold { target: 0.0 };
    let text = format_error_human(&err, false);

    assert!(text.contains(err.headline()), "{text}");
    assert!(text.contains("Reason: "), "{text}");
    assert!(text.contains("Fix: "), "{text}");
    assert!(!text.contains('\x1b'), "no color codes when disabled");
}

#[test]
fn structured_error_is_exported() {
    let err = Error::InvalidArgument {
        argument: "--max-rows".to_string(),
        message: "Must be positive when set".to_string(),
    };
    assert_eq!(err.category(), ErrorCategory::Args);

    let structured = StructuredError::from(&err);
    assert_eq!(structured.code, 40);
    assert_eq!(structured.category, ErrorCategory::Args);
}
