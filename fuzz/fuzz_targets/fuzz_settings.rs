//! Fuzz target for fdr.json settings parsing.
//!
//! Parsed settings go through validation too; neither step may panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use qv_config::{validate_settings, FdrSettings};

fuzz_target!(|data: &[u8]| {
    if let Ok(settings) = serde_json::from_slice::<FdrSettings>(data) {
        let _ = validate_settings(&settings);
    }
});
