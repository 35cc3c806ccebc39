//! Static analysis of a schema graph: security, normalization and robustness
//! checks aggregated into scores.

mod findings;
mod normalization;
mod reserved;
mod robustness;
mod rules;
mod security;

pub use findings::{
    Impact, MetricStatus, NormalForm, NormalizationIssue, NormalizationKind, RobustnessMetric,
    SecurityCategory, SecurityIssue, Severity,
};
pub use reserved::is_reserved;
pub use security::find_cycles;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::graph::{Relationship, SchemaGraph, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_tables: usize,
    pub total_fields: usize,
    pub total_relationships: usize,
    pub security_score: u32,
    pub normalization_score: u32,
    pub robustness_score: f64,
    pub critical_issues: usize,
    pub warnings: usize,
    pub suggestions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: u32,
    pub security_issues: Vec<SecurityIssue>,
    pub normalization_issues: Vec<NormalizationIssue>,
    pub robustness_metrics: Vec<RobustnessMetric>,
    pub summary: Summary,
}

impl AnalysisResult {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Security weight of one issue by severity and impact.
fn security_weight(severity: Severity, impact: Impact) -> u32 {
    match (severity, impact) {
        (Severity::Critical, Impact::High) => 15,
        (Severity::Critical, Impact::Medium) => 10,
        (Severity::Critical, Impact::Low) => 5,
        (Severity::Warning, Impact::High) => 10,
        (Severity::Warning, Impact::Medium) => 7,
        (Severity::Warning, Impact::Low) => 3,
        (Severity::Info, Impact::High) => 5,
        (Severity::Info, Impact::Medium) => 3,
        (Severity::Info, Impact::Low) => 1,
    }
}

/// 100 minus the weighted issue count, floored at 0.
pub fn security_score(issues: &[SecurityIssue]) -> u32 {
    let penalty: u32 = issues
        .iter()
        .map(|i| security_weight(i.severity, i.impact))
        .sum();
    100u32.saturating_sub(penalty)
}

pub fn normalization_score(issues: &[NormalizationIssue]) -> u32 {
    let penalty: u32 = issues
        .iter()
        .map(|i| match i.kind {
            NormalizationKind::Violation => 15,
            NormalizationKind::Warning => 10,
            NormalizationKind::Suggestion => 5,
        })
        .sum();
    100u32.saturating_sub(penalty)
}

pub fn robustness_score(metrics: &[RobustnessMetric]) -> f64 {
    if metrics.is_empty() {
        return 50.0;
    }
    metrics.iter().map(|m| f64::from(m.score)).sum::<f64>() / metrics.len() as f64
}

/// Runs every check family over one table/relationship set.
pub struct Analyzer<'a> {
    tables: &'a [Table],
    relationships: &'a [Relationship],
}

impl<'a> Analyzer<'a> {
    pub fn new(tables: &'a [Table], relationships: &'a [Relationship]) -> Self {
        Self {
            tables,
            relationships,
        }
    }

    pub fn analyze(&self) -> AnalysisResult {
        let security_issues = security::check_security(self.tables, self.relationships);
        let normalization_issues = normalization::check_normalization(self.tables);
        let robustness_metrics = robustness::check_robustness(self.tables, self.relationships);

        let security = security_score(&security_issues);
        let normalization = normalization_score(&normalization_issues);
        let robustness = robustness_score(&robustness_metrics);
        let overall = ((f64::from(security) + f64::from(normalization) + robustness) / 3.0).round();

        let count_security = |severity: Severity| {
            security_issues
                .iter()
                .filter(|i| i.severity == severity)
                .count()
        };
        let count_normalization = |kind: NormalizationKind| {
            normalization_issues
                .iter()
                .filter(|i| i.kind == kind)
                .count()
        };

        let summary = Summary {
            total_tables: self.tables.len(),
            total_fields: self.tables.iter().map(|t| t.fields.len()).sum(),
            total_relationships: self.relationships.len(),
            security_score: security,
            normalization_score: normalization,
            robustness_score: robustness,
            critical_issues: count_security(Severity::Critical)
                + count_normalization(NormalizationKind::Violation),
            warnings: count_security(Severity::Warning)
                + count_normalization(NormalizationKind::Warning),
            suggestions: count_security(Severity::Info)
                + count_normalization(NormalizationKind::Suggestion),
        };

        info!(
            overall,
            security,
            normalization,
            robustness,
            critical = summary.critical_issues,
            "schema analyzed"
        );

        AnalysisResult {
            overall_score: overall as u32,
            security_issues,
            normalization_issues,
            robustness_metrics,
            summary,
        }
    }
}

pub fn analyze_schema(graph: &SchemaGraph) -> AnalysisResult {
    Analyzer::new(&graph.tables, &graph.relationships).analyze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ConstraintTag, Field};

    fn issue(severity: Severity, impact: Impact) -> SecurityIssue {
        SecurityIssue {
            severity,
            category: SecurityCategory::Integrity,
            title: String::new(),
            description: String::new(),
            table: None,
            field: None,
            recommendation: String::new(),
            impact,
        }
    }

    #[test]
    fn test_security_weights_and_floor() {
        let issues = vec![
            issue(Severity::Critical, Impact::High),
            issue(Severity::Warning, Impact::Medium),
            issue(Severity::Info, Impact::Low),
        ];
        assert_eq!(security_score(&issues), 100 - 15 - 7 - 1);
        assert_eq!(security_score(&vec![issue(Severity::Critical, Impact::High); 10]), 0);
    }

    #[test]
    fn test_empty_graph_scores() {
        let result = analyze_schema(&SchemaGraph::default());
        assert!(result.security_issues.is_empty());
        assert!(result.normalization_issues.is_empty());
        assert_eq!(result.summary.security_score, 100);
        assert_eq!(result.summary.normalization_score, 100);
        assert_eq!(result.robustness_metrics.len(), 6);
        // (60 + 50 + 70 + 75 + 65 + 100) / 6 = 70
        assert_eq!(result.summary.robustness_score, 70.0);
        assert_eq!(result.overall_score, 90);
    }

    #[test]
    fn test_summary_counts() {
        let tables = vec![Table::new(
            "accounts",
            vec![
                Field::new("id", "integer").with(ConstraintTag::Pk),
                Field::new("password", "varchar(20)"),
                Field::new("tags", "text"),
            ],
        )];
        let result = Analyzer::new(&tables, &[]).analyze();
        let critical = result
            .security_issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count();
        let violations = result
            .normalization_issues
            .iter()
            .filter(|i| i.kind == NormalizationKind::Violation)
            .count();
        assert_eq!(result.summary.critical_issues, critical + violations);
        assert_eq!(result.summary.total_fields, 3);
        assert_eq!(result.summary.total_tables, 1);
    }
}
