//! Hypothesis record parsing.
//!
//! Accepted shapes:
//! - JSON array of records
//! - JSON lines, one record per line (blank lines skipped)
//! - Delimited text: `id<TAB|,|space>pep`, or `id alpha beta` in
//!   posterior mode; `#` comments, and an optional header row whose
//!   second column is named `pep`, `error_probability`, `probability`
//!   or `alpha`
//!
//! A JSON record is `{"id", "error_probability" | "pep"}` or
//! `{"id", "alpha", "beta"}` when a posterior cutoff is configured.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::fdr::Hypothesis;
use qv_config::PosteriorSettings;
use qv_math::posterior_error_probability;

/// Input encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum InputFormat {
    /// Guess from file extension, then from the first character
    #[default]
    Auto,
    /// JSON array of records
    Json,
    /// One JSON record per line
    Jsonl,
    /// Delimited text (tab, comma, or whitespace)
    Tsv,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Auto => write!(f, "auto"),
            InputFormat::Json => write!(f, "json"),
            InputFormat::Jsonl => write!(f, "jsonl"),
            InputFormat::Tsv => write!(f, "tsv"),
        }
    }
}

/// Where records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `None` and `-` mean stdin.
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            None => InputSource::Stdin,
            Some(p) if p.as_os_str() == "-" => InputSource::Stdin,
            Some(p) => InputSource::File(p.to_path_buf()),
        }
    }

    fn extension_format(&self) -> Option<InputFormat> {
        let InputSource::File(path) = self else {
            return None;
        };
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(InputFormat::Json),
            "jsonl" | "ndjson" => Some(InputFormat::Jsonl),
            "tsv" | "csv" | "txt" => Some(InputFormat::Tsv),
            _ => None,
        }
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::Stdin => write!(f, "<stdin>"),
            InputSource::File(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Where a record sits in its source. Both positions are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLocation {
    /// Text line (JSON lines, delimited text).
    Line(usize),
    /// Element of a JSON array.
    Record(usize),
}

impl std::fmt::Display for RecordLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordLocation::Line(n) => write!(f, "line {}", n),
            RecordLocation::Record(n) => write!(f, "record {}", n),
        }
    }
}

/// Record parsing errors. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("malformed record at line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("record '{id}' at {at} has no error probability")]
    MissingProbability { at: RecordLocation, id: String },

    #[error("record '{id}' at {at}: {message}")]
    InvalidPosterior {
        at: RecordLocation,
        id: String,
        message: String,
    },

    #[error("I/O error reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read stdin: {0}")]
    Stdin(#[source] std::io::Error),
}

impl From<InputError> for qv_common::Error {
    fn from(err: InputError) -> Self {
        match err {
            InputError::Malformed { line, message } => {
                qv_common::Error::MalformedRecord { line, message }
            }
            InputError::MissingProbability { at, id } => qv_common::Error::MissingProbability {
                id,
                location: at.to_string(),
            },
            InputError::InvalidPosterior { at, id, message } => {
                qv_common::Error::InvalidPosterior {
                    id,
                    location: at.to_string(),
                    message,
                }
            }
            InputError::Read { path, source } => qv_common::Error::Read { path, source },
            InputError::Stdin(source) => qv_common::Error::Io(source),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    id: RawId,
    #[serde(default, alias = "pep")]
    error_probability: Option<f64>,
    #[serde(default)]
    alpha: Option<f64>,
    #[serde(default)]
    beta: Option<f64>,
}

/// Read and parse all records from `source`.
pub fn read_hypotheses(
    source: &InputSource,
    format: InputFormat,
    posterior: &PosteriorSettings,
) -> Result<Vec<Hypothesis>, InputError> {
    let text = match source {
        InputSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(InputError::Stdin)?;
            buf
        }
        InputSource::File(path) => {
            std::fs::read_to_string(path).map_err(|source| InputError::Read {
                path: path.clone(),
                source,
            })?
        }
    };

    let format = match format {
        InputFormat::Auto => source
            .extension_format()
            .unwrap_or_else(|| sniff_format(&text)),
        explicit => explicit,
    };
    let hypotheses = parse_hypotheses(&text, format, posterior)?;
    debug!(source = %source, format = %format, records = hypotheses.len(), "parsed input");
    Ok(hypotheses)
}

/// Guess the format from the first non-blank character.
pub fn sniff_format(text: &str) -> InputFormat {
    match text.trim_start().chars().next() {
        Some('[') => InputFormat::Json,
        Some('{') => InputFormat::Jsonl,
        _ => InputFormat::Tsv,
    }
}

/// Parse records from text.
pub fn parse_hypotheses(
    text: &str,
    format: InputFormat,
    posterior: &PosteriorSettings,
) -> Result<Vec<Hypothesis>, InputError> {
    match format {
        InputFormat::Auto => parse_hypotheses(text, sniff_format(text), posterior),
        InputFormat::Json => parse_json(text, posterior),
        InputFormat::Jsonl => parse_jsonl(text, posterior),
        InputFormat::Tsv => parse_delimited(text, posterior),
    }
}

fn parse_json(text: &str, posterior: &PosteriorSettings) -> Result<Vec<Hypothesis>, InputError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let records: Vec<RawRecord> =
        serde_json::from_str(text).map_err(|e| InputError::Malformed {
            line: e.line(),
            message: e.to_string(),
        })?;
    records
        .into_iter()
        .enumerate()
        .map(|(i, r)| resolve(r, RecordLocation::Record(i + 1), posterior))
        .collect()
}

fn parse_jsonl(text: &str, posterior: &PosteriorSettings) -> Result<Vec<Hypothesis>, InputError> {
    let mut out = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record: RawRecord =
            serde_json::from_str(trimmed).map_err(|e| InputError::Malformed {
                line: line_no,
                message: e.to_string(),
            })?;
        out.push(resolve(record, RecordLocation::Line(line_no), posterior)?);
    }
    Ok(out)
}

fn parse_delimited(
    text: &str,
    posterior: &PosteriorSettings,
) -> Result<Vec<Hypothesis>, InputError> {
    let mut out = Vec::new();
    let mut seen_data = false;

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields = split_fields(trimmed);
        if fields.len() < 2 {
            return Err(InputError::Malformed {
                line: line_no,
                message: format!("expected at least 2 fields, found {}", fields.len()),
            });
        }

        // Only a leading row that names a known column is a header.
        if !seen_data && is_header(&fields) {
            seen_data = true;
            continue;
        }
        seen_data = true;

        let numbers = fields[1..]
            .iter()
            .map(|f| {
                f.parse::<f64>().map_err(|_| InputError::Malformed {
                    line: line_no,
                    message: format!("'{}' is not a number", f),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let record = match numbers.as_slice() {
            [pep] => RawRecord {
                id: RawId::Text(fields[0].to_string()),
                error_probability: Some(*pep),
                alpha: None,
                beta: None,
            },
            [alpha, beta] => RawRecord {
                id: RawId::Text(fields[0].to_string()),
                error_probability: None,
                alpha: Some(*alpha),
                beta: Some(*beta),
            },
            _ => {
                return Err(InputError::Malformed {
                    line: line_no,
                    message: format!("expected 2 or 3 fields, found {}", fields.len()),
                })
            }
        };
        out.push(resolve(record, RecordLocation::Line(line_no), posterior)?);
    }
    Ok(out)
}

const HEADER_COLUMNS: [&str; 4] = ["pep", "error_probability", "probability", "alpha"];

fn is_header(fields: &[&str]) -> bool {
    HEADER_COLUMNS
        .iter()
        .any(|name| fields[1].eq_ignore_ascii_case(name))
}

fn split_fields(line: &str) -> Vec<&str> {
    if line.contains('\t') {
        line.split('\t').map(str::trim).collect()
    } else if line.contains(',') {
        line.split(',').map(str::trim).collect()
    } else {
        line.split_whitespace().collect()
    }
}

/// Turn a raw record into a hypothesis, deriving PEP from a posterior when
/// no probability is given.
fn resolve(
    record: RawRecord,
    at: RecordLocation,
    posterior: &PosteriorSettings,
) -> Result<Hypothesis, InputError> {
    let id = record.id.into_string();
    if let Some(p) = record.error_probability {
        return Ok(Hypothesis::new(id, p));
    }

    let (Some(alpha), Some(beta)) = (record.alpha, record.beta) else {
        return Err(InputError::MissingProbability { at, id });
    };
    let Some(cutoff) = posterior.cutoff else {
        return Err(InputError::InvalidPosterior {
            at,
            id,
            message: "record has alpha/beta but no posterior cutoff is set (use --cutoff)"
                .to_string(),
        });
    };

    match posterior_error_probability(alpha, beta, cutoff, posterior.direction) {
        Ok(pep) => Ok(Hypothesis::new(id, pep)),
        Err(e) => Err(InputError::InvalidPosterior {
            at,
            id,
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qv_math::Direction;

    fn no_posterior() -> PosteriorSettings {
        PosteriorSettings::default()
    }

    fn with_cutoff(cutoff: f64, direction: Direction) -> PosteriorSettings {
        PosteriorSettings {
            cutoff: Some(cutoff),
            direction,
        }
    }

    #[test]
    fn test_json_array() {
        let text = r#"[{"id": "A", "error_probability": 0.01}, {"id": 7, "pep": 0.2}]"#;
        let hs = parse_hypotheses(text, InputFormat::Json, &no_posterior()).unwrap();
        assert_eq!(hs.len(), 2);
        assert_eq!(hs[0].id.as_str(), "A");
        assert_eq!(hs[1].id.as_str(), "7");
        assert_eq!(hs[1].error_probability, 0.2);
    }

    #[test]
    fn test_json_empty_text() {
        assert!(parse_hypotheses("  \n", InputFormat::Json, &no_posterior())
            .unwrap()
            .is_empty());
        assert!(parse_hypotheses("[]", InputFormat::Json, &no_posterior())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_jsonl_skips_blank_lines_and_names_bad_line() {
        let text = "{\"id\":\"a\",\"pep\":0.1}\n\n{\"id\":\"b\",\"pep\":0.2}\n";
        let hs = parse_hypotheses(text, InputFormat::Jsonl, &no_posterior()).unwrap();
        assert_eq!(hs.len(), 2);

        let bad = "{\"id\":\"a\",\"pep\":0.1}\n{oops}\n";
        match parse_hypotheses(bad, InputFormat::Jsonl, &no_posterior()) {
            Err(InputError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_delimited_separators_and_header() {
        let text = "# scores\nid\tpep\nA\t0.01\nB\t0.5\n";
        let hs = parse_hypotheses(text, InputFormat::Tsv, &no_posterior()).unwrap();
        assert_eq!(hs.len(), 2);
        assert_eq!(hs[1].id.as_str(), "B");

        let csv = "id,pep\nA, 0.01\n";
        let hs = parse_hypotheses(csv, InputFormat::Tsv, &no_posterior()).unwrap();
        assert_eq!(hs[0].error_probability, 0.01);

        let spaced = "A 0.3\nB   0.4\n";
        let hs = parse_hypotheses(spaced, InputFormat::Tsv, &no_posterior()).unwrap();
        assert_eq!(hs.len(), 2);
    }

    #[test]
    fn test_delimited_bad_number_after_data() {
        let text = "A\t0.1\nB\tlots\n";
        match parse_hypotheses(text, InputFormat::Tsv, &no_posterior()) {
            Err(InputError::Malformed { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("lots"));
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_delimited_typo_in_first_row_is_not_a_header() {
        match parse_hypotheses("A\t0.o1\nB\t0.4\n", InputFormat::Tsv, &no_posterior()) {
            Err(InputError::Malformed { line, message }) => {
                assert_eq!(line, 1);
                assert!(message.contains("0.o1"));
            }
            other => panic!("expected Malformed, got {other:?}"),
        }

        // Mixed separators leave a non-numeric second field.
        assert!(matches!(
            parse_hypotheses("A,0.1\tx\n", InputFormat::Tsv, &no_posterior()),
            Err(InputError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_delimited_header_names_known_column() {
        for header in ["id\tpep", "ID,Error_Probability", "name probability", "site\talpha\tbeta"] {
            let text = format!("{header}\nA\t0.25\t0.5\n");
            let posterior = with_cutoff(0.3, Direction::Above);
            let parsed = parse_hypotheses(&text, InputFormat::Tsv, &posterior);
            assert!(parsed.is_ok(), "{header}: {parsed:?}");
        }

        // A header after data is just a bad record.
        assert!(matches!(
            parse_hypotheses("A\t0.1\nid\tpep\n", InputFormat::Tsv, &no_posterior()),
            Err(InputError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn test_delimited_single_field_rejected() {
        assert!(matches!(
            parse_hypotheses("lonely\n", InputFormat::Tsv, &no_posterior()),
            Err(InputError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_delimited_nan_passes_through() {
        // Range checks belong to the controller.
        let hs = parse_hypotheses("A\tNaN\n", InputFormat::Tsv, &no_posterior()).unwrap();
        assert!(hs[0].error_probability.is_nan());
    }

    #[test]
    fn test_missing_probability() {
        let text = r#"[{"id": "A"}]"#;
        assert!(matches!(
            parse_hypotheses(text, InputFormat::Json, &no_posterior()),
            Err(InputError::MissingProbability {
                at: RecordLocation::Record(1),
                ..
            })
        ));
    }

    #[test]
    fn test_missing_probability_location_per_format() {
        let json = r#"[{"id": "A", "pep": 0.1}, {"id": "B", "pep": 0.2}, {"id": "C"}]"#;
        let err = parse_hypotheses(json, InputFormat::Json, &no_posterior()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "record 'C' at record 3 has no error probability"
        );

        let jsonl = "{\"id\":\"A\",\"pep\":0.1}\n\n{\"id\":\"B\"}\n";
        let err = parse_hypotheses(jsonl, InputFormat::Jsonl, &no_posterior()).unwrap_err();
        assert!(matches!(
            err,
            InputError::MissingProbability {
                at: RecordLocation::Line(3),
                ..
            }
        ));

        let unified: qv_common::Error = err.into();
        assert!(unified.to_string().contains("at line 3"));
    }

    #[test]
    fn test_posterior_requires_cutoff() {
        let text = r#"{"id": "A", "alpha": 2, "beta": 8}"#;
        assert!(matches!(
            parse_hypotheses(text, InputFormat::Jsonl, &no_posterior()),
            Err(InputError::InvalidPosterior { .. })
        ));
    }

    #[test]
    fn test_posterior_mode_derives_pep() {
        // Beta(1,1) is uniform: PEP of "above 0.3" is 0.3.
        let text = "A 1 1\n";
        let hs =
            parse_hypotheses(text, InputFormat::Tsv, &with_cutoff(0.3, Direction::Above)).unwrap();
        assert!((hs[0].error_probability - 0.3).abs() < 1e-9);

        let hs =
            parse_hypotheses(text, InputFormat::Tsv, &with_cutoff(0.3, Direction::Below)).unwrap();
        assert!((hs[0].error_probability - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_pep_wins_over_posterior() {
        let text = r#"[{"id": "A", "pep": 0.05, "alpha": 1, "beta": 1}]"#;
        let hs =
            parse_hypotheses(text, InputFormat::Json, &with_cutoff(0.3, Direction::Above)).unwrap();
        assert_eq!(hs[0].error_probability, 0.05);
    }

    #[test]
    fn test_bad_posterior_shape() {
        let text = r#"[{"id": "A", "alpha": -1, "beta": 1}]"#;
        assert!(matches!(
            parse_hypotheses(text, InputFormat::Json, &with_cutoff(0.3, Direction::Above)),
            Err(InputError::InvalidPosterior { .. })
        ));
    }

    #[test]
    fn test_sniff_format() {
        assert_eq!(sniff_format("  [ ]"), InputFormat::Json);
        assert_eq!(sniff_format("{\"id\":1}"), InputFormat::Jsonl);
        assert_eq!(sniff_format("A\t0.1"), InputFormat::Tsv);
        assert_eq!(sniff_format(""), InputFormat::Tsv);
    }

    #[test]
    fn test_input_source_from_arg() {
        assert_eq!(InputSource::from_arg(None), InputSource::Stdin);
        assert_eq!(InputSource::from_arg(Some(Path::new("-"))), InputSource::Stdin);
        let src = InputSource::from_arg(Some(Path::new("scores.jsonl")));
        assert_eq!(src.extension_format(), Some(InputFormat::Jsonl));
    }

    #[test]
    fn test_error_conversion_codes() {
        let err: qv_common::Error = InputError::Malformed {
            line: 3,
            message: "x".into(),
        }
        .into();
        assert_eq!(err.code(), 21);
        let err: qv_common::Error = InputError::MissingProbability {
            at: RecordLocation::Line(1),
            id: "a".into(),
        }
        .into();
        assert_eq!(err.code(), 22);

        let err: qv_common::Error = InputError::InvalidPosterior {
            at: RecordLocation::Record(2),
            id: "b".into(),
            message: "bad shape".into(),
        }
        .into();
        assert_eq!(err.code(), 32);
        assert_eq!(err.to_string(), "invalid posterior for 'b' at record 2: bad shape");
    }
}
