//! Fuzz target for hypothesis record parsing.
//!
//! Tests that `parse_hypotheses` handles arbitrary text in every format
//! without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use qv_config::PosteriorSettings;
use qv_core::input::{parse_hypotheses, InputFormat};

fuzz_target!(|data: &str| {
    let posterior = PosteriorSettings {
        cutoff: Some(0.1),
        ..PosteriorSettings::default()
    };
    for format in [
        InputFormat::Auto,
        InputFormat::Json,
        InputFormat::Jsonl,
        InputFormat::Tsv,
    ] {
        let _ = parse_hypotheses(data, format, &posterior);
    }
});
