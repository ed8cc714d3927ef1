//! Renderers for each output format.

use std::fmt::Write;

use serde_json::{json, Value};

use super::Report;
use qv_common::OutputFormat;

/// Render a report.
pub fn render(report: &Report, format: OutputFormat) -> Result<String, qv_common::Error> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Jsonl => render_jsonl(report),
        OutputFormat::Md => Ok(render_markdown(report)),
        OutputFormat::Tsv => Ok(render_tsv(report)),
        OutputFormat::Summary => Ok(render_summary(report)),
    }
}

fn tagged(kind: &str, value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            map.insert("type".to_string(), json!(kind));
            Value::Object(map)
        }
        other => json!({ "type": kind, "value": other }),
    }
}

fn render_jsonl(report: &Report) -> Result<String, qv_common::Error> {
    let mut lines = Vec::new();

    if let Some(ranked) = &report.ranked {
        for row in ranked {
            let mut value = serde_json::to_value(row)?;
            if let (Value::Object(map), Some(included)) =
                (&mut value, report.is_included(row.rank))
            {
                map.insert("included".to_string(), json!(included));
            }
            lines.push(serde_json::to_string(&tagged("ranked", value))?);
        }
    }
    if let Some(selection) = &report.selection {
        let value = serde_json::to_value(selection)?;
        lines.push(serde_json::to_string(&tagged("selection", value))?);
    }
    if let Some(curve) = &report.curve {
        for point in curve {
            let value = serde_json::to_value(point)?;
            lines.push(serde_json::to_string(&tagged("curve", value))?);
        }
    }

    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{:.6}", x)).unwrap_or_else(|| "-".to_string())
}

fn render_markdown(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Q-value report ({})", report.kind);
    let _ = writeln!(out);
    let _ = writeln!(out, "- Run: `{}`", report.run_id);
    let _ = writeln!(out, "- Input: `{}`", report.input);
    let _ = writeln!(out, "- Hypotheses: {}", report.candidates);
    let _ = writeln!(
        out,
        "- Settings: {} (`{}`)",
        report.settings.source,
        report.settings.short_id()
    );
    if report.monotone_q_values {
        let _ = writeln!(out, "- Q-values: monotone (tail running minimum)");
    }

    if let Some(selection) = &report.selection {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Selection");
        let _ = writeln!(out);
        let _ = writeln!(out, "| target FDR | included | realized q | expected false discoveries |");
        let _ = writeln!(out, "|---:|---:|---:|---:|");
        let _ = writeln!(
            out,
            "| {} | {} / {} | {} | {:.4} |",
            selection.target_fdr,
            selection.size,
            selection.candidates,
            fmt_opt(selection.realized_q_value),
            selection.expected_false_discoveries
        );
        if selection.non_monotone {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "> Some included ranks have q-values at or above the target; the boundary q-value is {}.",
                fmt_opt(selection.boundary_q_value)
            );
        }
    }

    if let Some(ranked) = &report.ranked {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Ranked hypotheses");
        let _ = writeln!(out);
        let with_flag = report.selection.is_some();
        if with_flag {
            let _ = writeln!(out, "| rank | id | PEP | q-value | included |");
            let _ = writeln!(out, "|---:|---|---:|---:|:---:|");
        } else {
            let _ = writeln!(out, "| rank | id | PEP | q-value |");
            let _ = writeln!(out, "|---:|---|---:|---:|");
        }
        for row in ranked {
            let _ = write!(
                out,
                "| {} | {} | {:.6} | {:.6} |",
                row.rank,
                escape_md(row.id.as_str()),
                row.error_probability,
                row.q_value
            );
            if with_flag {
                let mark = if report.is_included(row.rank) == Some(true) {
                    "✓"
                } else {
                    ""
                };
                let _ = write!(out, " {} |", mark);
            }
            let _ = writeln!(out);
        }
        if report.rows_omitted > 0 {
            let _ = writeln!(out);
            let _ = writeln!(out, "_{} more rows omitted._", report.rows_omitted);
        }
    }

    if let Some(curve) = &report.curve {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Inclusion curve");
        let _ = writeln!(out);
        let _ = writeln!(out, "| threshold | included | expected false discoveries |");
        let _ = writeln!(out, "|---:|---:|---:|");
        for point in curve {
            let _ = writeln!(
                out,
                "| {} | {} | {:.4} |",
                point.threshold, point.size, point.expected_false_discoveries
            );
        }
    }

    out
}

fn escape_md(s: &str) -> String {
    s.replace('|', "\\|")
}

fn render_tsv(report: &Report) -> String {
    let mut out = String::new();

    if let Some(curve) = &report.curve {
        out.push_str("threshold\tsize\texpected_false_discoveries\n");
        for point in curve {
            let _ = writeln!(
                out,
                "{}\t{}\t{}",
                point.threshold, point.size, point.expected_false_discoveries
            );
        }
        return out;
    }

    let with_flag = report.selection.is_some();
    out.push_str("rank\tid\terror_probability\tq_value");
    if with_flag {
        out.push_str("\tincluded");
    }
    out.push('\n');
    for row in report.ranked.iter().flatten() {
        let _ = write!(
            out,
            "{}\t{}\t{}\t{}",
            row.rank, row.id, row.error_probability, row.q_value
        );
        if with_flag {
            let flag = report.is_included(row.rank) == Some(true);
            let _ = write!(out, "\t{}", flag);
        }
        out.push('\n');
    }
    out
}

fn render_summary(report: &Report) -> String {
    if let Some(selection) = &report.selection {
        return format!(
            "selected {}/{} at target FDR {} (realized q {}, expected false discoveries {:.4})\n",
            selection.size,
            selection.candidates,
            selection.target_fdr,
            fmt_opt(selection.realized_q_value),
            selection.expected_false_discoveries
        );
    }
    if let Some(curve) = &report.curve {
        let points: Vec<String> = curve
            .iter()
            .map(|p| format!("{}:{}", p.threshold, p.size))
            .collect();
        return format!(
            "curve over {} hypotheses: {}\n",
            report.candidates,
            points.join(" ")
        );
    }
    let max_q = report
        .ranked
        .as_ref()
        .and_then(|r| r.last())
        .map(|r| r.q_value);
    format!(
        "ranked {} hypotheses (max q {})\n",
        report.candidates,
        fmt_opt(max_q)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fdr::inclusion_curve;
    use crate::output::tests::sample_report;
    use crate::output::ReportKind;

    #[test]
    fn test_json_is_pretty_and_complete() {
        let out = render(&sample_report(), OutputFormat::Json).unwrap();
        assert!(out.contains('\n'));
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["selection"]["size"], 4);
        assert_eq!(value["ranked"][0]["id"], "A");
        assert_eq!(value["candidates"], 5);
    }

    #[test]
    fn test_jsonl_lines_tagged() {
        let out = render(&sample_report(), OutputFormat::Jsonl).unwrap();
        let lines: Vec<Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0]["type"], "ranked");
        assert_eq!(lines[3]["included"], true);
        assert_eq!(lines[4]["included"], false);
        assert_eq!(lines[5]["type"], "selection");
        assert_eq!(lines[5]["size"], 4);
    }

    #[test]
    fn test_markdown_table() {
        let out = render(&sample_report(), OutputFormat::Md).unwrap();
        assert!(out.starts_with("# Q-value report (select)"));
        assert!(out.contains("| rank | id | PEP | q-value | included |"));
        assert!(out.contains("| 4 | D | 0.090000 | 0.040250 | ✓ |"));
        assert!(out.contains("| 5 | E | 0.500000 | 0.132200 |  |"));
    }

    #[test]
    fn test_tsv_rows() {
        let out = render(&sample_report(), OutputFormat::Tsv).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "rank\tid\terror_probability\tq_value\tincluded");
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("1\tA\t0.001\t0.001\ttrue"));
        assert!(lines[5].ends_with("\tfalse"));
    }

    #[test]
    fn test_summary_line() {
        let out = render(&sample_report(), OutputFormat::Summary).unwrap();
        assert!(out.starts_with("selected 4/5 at target FDR 0.05"));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_curve_renderings() {
        let base = sample_report();
        let ranked = base.ranked.clone().unwrap();
        let curve = inclusion_curve(&ranked, &[0.01, 0.05]).unwrap();
        let report = Report::new(
            ReportKind::Curve,
            "run-x",
            "-",
            base.settings.clone(),
            false,
            5,
        )
        .with_curve(curve);

        let tsv = render(&report, OutputFormat::Tsv).unwrap();
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines[0], "threshold\tsize\texpected_false_discoveries");
        assert_eq!(lines[1], "0.01\t1\t0.001");
        assert!(lines[2].starts_with("0.05\t4\t0.16"));

        let summary = render(&report, OutputFormat::Summary).unwrap();
        assert_eq!(summary, "curve over 5 hypotheses: 0.01:1 0.05:4\n");
    }

    #[test]
    fn test_empty_rank_report() {
        let report = Report::new(
            ReportKind::Rank,
            "run-x",
            "-",
            sample_report().settings,
            false,
            0,
        )
        .with_ranked(Vec::new(), None);
        assert_eq!(render(&report, OutputFormat::Jsonl).unwrap(), "");
        assert_eq!(
            render(&report, OutputFormat::Summary).unwrap(),
            "ranked 0 hypotheses (max q -)\n"
        );
    }
}
