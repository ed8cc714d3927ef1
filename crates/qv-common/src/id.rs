//! Identity types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a hypothesis (a player key, a gene, a feature...).
///
/// Identifiers are not required to be unique within a batch; duplicates
/// are ranked as distinct hypotheses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HypothesisId(pub String);

impl HypothesisId {
    pub fn new(id: impl Into<String>) -> Self {
        HypothesisId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HypothesisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for HypothesisId {
    fn from(s: &str) -> Self {
        HypothesisId(s.to_string())
    }
}

impl From<String> for HypothesisId {
    fn from(s: String) -> Self {
        HypothesisId(s)
    }
}

/// Per-invocation run identifier used to correlate log lines and reports.
///
/// Format: `run-<12 hex chars>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a fresh run id.
    pub fn new() -> Self {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        RunId(format!("run-{}", &uuid[..12]))
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hypothesis_id_serializes_transparently() {
        let id = HypothesisId::from("aaronha01");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"aaronha01\"");
        let back: HypothesisId = serde_json::from_str("\"ruthba01\"").unwrap();
        assert_eq!(back.as_str(), "ruthba01");
    }

    #[test]
    fn run_id_format() {
        let a = RunId::new();
        let b = RunId::new();
        assert!(a.0.starts_with("run-"));
        assert_eq!(a.0.len(), 16);
        assert!(a.0[4..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
