//! Report payloads and their renderings.
//!
//! A [`Report`] is built once per invocation and rendered into one of the
//! [`OutputFormat`]s. Rendering never touches stderr.

mod render;

pub use render::render;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fdr::{CurvePoint, InclusionSet, RankedHypothesis};
use qv_common::OutputFormat;
use qv_config::ConfigSnapshot;

/// Which subcommand produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Rank,
    Select,
    Curve,
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportKind::Rank => write!(f, "rank"),
            ReportKind::Select => write!(f, "select"),
            ReportKind::Curve => write!(f, "curve"),
        }
    }
}

/// Output of a rank, select, or curve run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub run_id: String,
    pub kind: ReportKind,
    /// Where the records were read from.
    pub input: String,
    pub monotone_q_values: bool,
    pub settings: ConfigSnapshot,
    /// Number of hypotheses ranked.
    pub candidates: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranked: Option<Vec<RankedHypothesis>>,
    /// Ranked rows dropped by `max_rows`.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rows_omitted: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<InclusionSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<Vec<CurvePoint>>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl Report {
    pub fn new(
        kind: ReportKind,
        run_id: impl Into<String>,
        input: impl Into<String>,
        settings: ConfigSnapshot,
        monotone_q_values: bool,
        candidates: usize,
    ) -> Self {
        Report {
            schema_version: qv_common::SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            run_id: run_id.into(),
            kind,
            input: input.into(),
            monotone_q_values,
            settings,
            candidates,
            ranked: None,
            rows_omitted: 0,
            selection: None,
            curve: None,
        }
    }

    /// Attach ranked rows, keeping at most `max_rows`.
    pub fn with_ranked(mut self, mut ranked: Vec<RankedHypothesis>, max_rows: Option<usize>) -> Self {
        if let Some(max) = max_rows {
            if ranked.len() > max {
                self.rows_omitted = ranked.len() - max;
                ranked.truncate(max);
            }
        }
        self.ranked = Some(ranked);
        self
    }

    pub fn with_selection(mut self, selection: InclusionSet) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_curve(mut self, curve: Vec<CurvePoint>) -> Self {
        self.curve = Some(curve);
        self
    }

    /// Whether `rank` falls inside the selection, if there is one.
    pub fn is_included(&self, rank: usize) -> Option<bool> {
        self.selection
            .as_ref()
            .map(|s| s.boundary_rank.is_some_and(|b| rank <= b))
    }

    /// Render in `format`.
    pub fn render(&self, format: OutputFormat) -> Result<String, qv_common::Error> {
        render(self, format)
    }
}
