//! Finding and metric types reported by the analyzer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecurityCategory {
    DataProtection,
    Authentication,
    Audit,
    AccessControl,
    InputValidation,
    Integrity,
    Naming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityIssue {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub category: SecurityCategory,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub recommendation: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationKind {
    Violation,
    Warning,
    Suggestion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalForm {
    #[serde(rename = "1NF")]
    First,
    #[serde(rename = "2NF")]
    Second,
    #[serde(rename = "3NF")]
    Third,
    #[serde(rename = "data-types")]
    DataTypes,
}

impl NormalForm {
    pub fn label(self) -> &'static str {
        match self {
            Self::First => "1NF",
            Self::Second => "2NF",
            Self::Third => "3NF",
            Self::DataTypes => "data-types",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationIssue {
    #[serde(rename = "type")]
    pub kind: NormalizationKind,
    pub normal_form: NormalForm,
    pub title: String,
    pub description: String,
    pub table: String,
    pub fields: Vec<String>,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl MetricStatus {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            _ => Self::Poor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobustnessMetric {
    pub category: String,
    pub score: u32,
    pub status: MetricStatus,
    pub description: String,
    pub suggestions: Vec<String>,
}

impl RobustnessMetric {
    pub fn new(category: &str, score: u32, description: String, suggestions: Vec<String>) -> Self {
        let score = score.min(100);
        Self {
            category: category.to_string(),
            score,
            status: MetricStatus::from_score(score),
            description,
            suggestions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_thresholds() {
        assert_eq!(MetricStatus::from_score(100), MetricStatus::Excellent);
        assert_eq!(MetricStatus::from_score(80), MetricStatus::Excellent);
        assert_eq!(MetricStatus::from_score(79), MetricStatus::Good);
        assert_eq!(MetricStatus::from_score(60), MetricStatus::Good);
        assert_eq!(MetricStatus::from_score(40), MetricStatus::Fair);
        assert_eq!(MetricStatus::from_score(39), MetricStatus::Poor);
    }

    #[test]
    fn test_issue_json_omits_missing_location() {
        let issue = SecurityIssue {
            severity: Severity::Warning,
            category: SecurityCategory::AccessControl,
            title: "t".to_string(),
            description: "d".to_string(),
            table: None,
            field: None,
            recommendation: "r".to_string(),
            impact: Impact::Medium,
        };
        assert_eq!(
            serde_json::to_string(&issue).unwrap(),
            r#"{"type":"warning","category":"access-control","title":"t","description":"d","recommendation":"r","impact":"medium"}"#
        );
    }
}
