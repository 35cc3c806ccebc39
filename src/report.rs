//! Plain-text rendering of an [`AnalysisResult`].

use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use crate::analyzer::{AnalysisResult, NormalizationKind, Severity};

/// Right-pads `text` to `width` display columns.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{text}{}", " ".repeat(fill))
}

fn column_width<'a>(cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(UnicodeWidthStr::width).max().unwrap_or(0)
}

fn location(table: Option<&str>, field: Option<&str>) -> String {
    match (table, field) {
        (Some(t), Some(f)) => format!("{t}.{f}"),
        (Some(t), None) => t.to_string(),
        (None, _) => "-".to_string(),
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "CRITICAL",
        Severity::Warning => "WARNING",
        Severity::Info => "INFO",
    }
}

fn kind_label(kind: NormalizationKind) -> &'static str {
    match kind {
        NormalizationKind::Violation => "VIOLATION",
        NormalizationKind::Warning => "WARNING",
        NormalizationKind::Suggestion => "SUGGESTION",
    }
}

/// Build a text report with aligned issue tables.
pub fn build_report(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let s = &result.summary;

    let _ = writeln!(out, "Schema Analysis Report");
    let _ = writeln!(out, "======================");
    let _ = writeln!(out);
    let _ = writeln!(out, "Overall score:  {}/100", result.overall_score);
    let _ = writeln!(
        out,
        "Security {} | Normalization {} | Robustness {:.1}",
        s.security_score, s.normalization_score, s.robustness_score
    );
    let _ = writeln!(
        out,
        "{} tables, {} fields, {} relationships",
        s.total_tables, s.total_fields, s.total_relationships
    );
    let _ = writeln!(
        out,
        "{} critical, {} warnings, {} suggestions",
        s.critical_issues, s.warnings, s.suggestions
    );

    if !result.security_issues.is_empty() {
        let rows: Vec<(&str, String, &str)> = result
            .security_issues
            .iter()
            .map(|i| {
                (
                    severity_label(i.severity),
                    location(i.table.as_deref(), i.field.as_deref()),
                    i.title.as_str(),
                )
            })
            .collect();
        write_section(&mut out, "Security", &rows);
    }

    if !result.normalization_issues.is_empty() {
        let rows: Vec<(&str, String, &str)> = result
            .normalization_issues
            .iter()
            .map(|i| {
                (
                    kind_label(i.kind),
                    format!("{} ({})", location(Some(i.table.as_str()), None), i.fields.join(", ")),
                    i.title.as_str(),
                )
            })
            .collect();
        write_section(&mut out, "Normalization", &rows);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Robustness");
    let _ = writeln!(out, "----------");
    let width = column_width(result.robustness_metrics.iter().map(|m| m.category.as_str()));
    for metric in &result.robustness_metrics {
        let _ = writeln!(
            out,
            "{}  {:>3}  {:?}",
            pad(&metric.category, width),
            metric.score,
            metric.status
        );
        for suggestion in &metric.suggestions {
            let _ = writeln!(out, "{}  - {suggestion}", pad("", width));
        }
    }

    out
}

fn write_section(out: &mut String, heading: &str, rows: &[(&str, String, &str)]) {
    let label_width = column_width(rows.iter().map(|r| r.0));
    let location_width = column_width(rows.iter().map(|r| r.1.as_str()));

    let _ = writeln!(out);
    let _ = writeln!(out, "{heading}");
    let _ = writeln!(out, "{}", "-".repeat(heading.len()));
    for (label, location, title) in rows {
        let _ = writeln!(
            out,
            "{}  {}  {title}",
            pad(label, label_width),
            pad(location, location_width)
        );
    }
}
