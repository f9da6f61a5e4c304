//! Report generation over validation outcomes
//!
//! Folds a [`RunOutcome`] into a [`Report`]: every finding is given a
//! severity and a category, counted, and rendered as JSON, Markdown or
//! plain text. Classification is driven purely by the finding's test
//! name, so reports stay stable across runs.
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

use crate::error::{Error, Result};
use crate::service::RunOutcome;
use chrono::{DateTime, Utc};
use japi_validators::Finding;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A conformance violation; the exchange fails
    Error,
    /// Questionable but not disqualifying
    Warning,
    /// A passing or informational observation
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// What kind of rule produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Document shape: required members, exclusivity, value types
    Structural,
    /// Lexical rules: member-name grammar, URLs, pointers, media types
    Format,
    /// Cross-cutting coherence: fieldsets, pagination, status codes
    Semantic,
    /// Warnings; recommendations rather than rules
    Advisory,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Structural => write!(f, "structural"),
            Category::Format => write!(f, "format"),
            Category::Semantic => write!(f, "semantic"),
            Category::Advisory => write!(f, "advisory"),
        }
    }
}

/// Test-name prefixes whose findings are lexical/format rules
const FORMAT_TESTS: &[&str] = &[
    "member-name:",
    "json-pointer:",
    "link:",
    "url-structure:",
    "content-type:",
    "accept:",
    "jsonapi:",
    "error: status",
];

/// Test-name prefixes whose findings are cross-cutting coherence rules
const SEMANTIC_TESTS: &[&str] = &[
    "fieldset:",
    "pagination:",
    "http-status:",
    "document: data errors exclusive",
    "document: included without data",
];

/// Classify a finding by its test name
pub fn categorize(test: &str) -> Category {
    if FORMAT_TESTS.iter().any(|prefix| test.starts_with(prefix)) {
        Category::Format
    } else if SEMANTIC_TESTS.iter().any(|prefix| test.starts_with(prefix)) {
        Category::Semantic
    } else {
        Category::Structural
    }
}

/// One finding with its classification attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedFinding {
    pub severity: Severity,
    pub category: Category,
    #[serde(flatten)]
    pub finding: Finding,
}

/// Overall verdict of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Every validator passed
    Passed,
    /// At least one conformance error
    Failed,
    /// The run stopped before validation (network, non-JSON body)
    Aborted,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::Passed => write!(f, "passed"),
            ReportStatus::Failed => write!(f, "failed"),
            ReportStatus::Aborted => write!(f, "aborted"),
        }
    }
}

/// Finding counts by severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

/// The rendered-agnostic report model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// What was validated, normally the request URL
    pub subject: String,
    pub status: ReportStatus,
    /// Terminal failure message when the run aborted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    pub summary: ReportSummary,
    pub findings: Vec<ClassifiedFinding>,
}

/// Output format for rendered reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Markdown,
    Text,
}

/// Builds and renders [`Report`]s
pub struct ValidationReporter;

impl ValidationReporter {
    /// Fold a run outcome into a report
    pub fn build(outcome: &RunOutcome, subject: &str) -> Report {
        match outcome {
            RunOutcome::Completed(result) => {
                let mut findings = Vec::new();
                for finding in result.errors() {
                    findings.push(ClassifiedFinding {
                        severity: Severity::Error,
                        category: categorize(&finding.test),
                        finding: finding.clone(),
                    });
                }
                for finding in result.warnings() {
                    findings.push(ClassifiedFinding {
                        severity: Severity::Warning,
                        category: Category::Advisory,
                        finding: finding.clone(),
                    });
                }
                for finding in result.details() {
                    findings.push(ClassifiedFinding {
                        severity: Severity::Info,
                        category: categorize(&finding.test),
                        finding: finding.clone(),
                    });
                }

                Report {
                    generated_at: Utc::now(),
                    subject: subject.to_string(),
                    status: if result.is_valid() {
                        ReportStatus::Passed
                    } else {
                        ReportStatus::Failed
                    },
                    failure: None,
                    summary: ReportSummary {
                        errors: result.errors().len(),
                        warnings: result.warnings().len(),
                        infos: result.details().len(),
                    },
                    findings,
                }
            }
            RunOutcome::Failed { message } => Report {
                generated_at: Utc::now(),
                subject: subject.to_string(),
                status: ReportStatus::Aborted,
                failure: Some(message.clone()),
                summary: ReportSummary::default(),
                findings: Vec::new(),
            },
        }
    }

    /// Render a report in the given format
    pub fn render(report: &Report, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => serde_json::to_string_pretty(report).map_err(|e| Error::Report {
                message: format!("Failed to serialize report: {e}"),
                source: Some(e),
            }),
            ReportFormat::Markdown => Ok(Self::render_markdown(report)),
            ReportFormat::Text => Ok(Self::render_text(report)),
        }
    }

    fn render_markdown(report: &Report) -> String {
        let mut out = String::new();
        out.push_str("# JSON:API Conformance Report\n\n");
        out.push_str(&format!("- **Subject**: {}\n", report.subject));
        out.push_str(&format!(
            "- **Generated**: {}\n",
            report.generated_at.to_rfc3339()
        ));
        out.push_str(&format!("- **Status**: {}\n\n", report.status));

        if let Some(failure) = &report.failure {
            out.push_str(&format!("> Run aborted: {failure}\n"));
            return out;
        }

        out.push_str("## Summary\n\n");
        out.push_str("| Severity | Count |\n|---|---|\n");
        out.push_str(&format!("| errors | {} |\n", report.summary.errors));
        out.push_str(&format!("| warnings | {} |\n", report.summary.warnings));
        out.push_str(&format!("| info | {} |\n\n", report.summary.infos));

        for (severity, heading) in [
            (Severity::Error, "## Errors"),
            (Severity::Warning, "## Warnings"),
            (Severity::Info, "## Details"),
        ] {
            let section: Vec<&ClassifiedFinding> = report
                .findings
                .iter()
                .filter(|f| f.severity == severity)
                .collect();
            if section.is_empty() {
                continue;
            }
            out.push_str(heading);
            out.push_str("\n\n");
            for classified in section {
                let finding = &classified.finding;
                match &finding.context {
                    Some(context) => out.push_str(&format!(
                        "- `{}` ({}): {} _at {}_\n",
                        finding.test, classified.category, finding.message, context
                    )),
                    None => out.push_str(&format!(
                        "- `{}` ({}): {}\n",
                        finding.test, classified.category, finding.message
                    )),
                }
            }
            out.push('\n');
        }
        out
    }

    fn render_text(report: &Report) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "JSON:API conformance: {} [{}] at {}\n",
            report.subject,
            report.status,
            report.generated_at.to_rfc3339()
        ));
        if let Some(failure) = &report.failure {
            out.push_str(&format!("run aborted: {failure}\n"));
            return out;
        }
        out.push_str(&format!(
            "{} errors, {} warnings, {} info\n",
            report.summary.errors, report.summary.warnings, report.summary.infos
        ));
        for classified in &report.findings {
            let finding = &classified.finding;
            match &finding.context {
                Some(context) => out.push_str(&format!(
                    "[{}][{}] {}: {} (at {})\n",
                    classified.severity, classified.category, finding.test, finding.message, context
                )),
                None => out.push_str(&format!(
                    "[{}][{}] {}: {}\n",
                    classified.severity, classified.category, finding.test, finding.message
                )),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use japi_validators::{Context, ValidationResult};

    fn sample_outcome() -> RunOutcome {
        let mut result = ValidationResult::new();
        result.error(
            "member-name: format",
            "Member name 'Bad' has invalid characters",
            &Context::new("data.attributes"),
        );
        result.error(
            "resource: type presence",
            "Resource object is missing `type`",
            &Context::new("data"),
        );
        result.warning(
            "pagination: links presence",
            "Collection response has no pagination links",
            &Context::root(),
        );
        result.detail("http-status: coherence", "Status 200 is coherent", &Context::new("status"));
        RunOutcome::Completed(result)
    }

    #[test]
    fn test_categorize_by_test_name() {
        assert_eq!(categorize("member-name: format"), Category::Format);
        assert_eq!(categorize("error: status"), Category::Format);
        assert_eq!(categorize("error: unknown member"), Category::Structural);
        assert_eq!(categorize("pagination: page size exceeded"), Category::Semantic);
        assert_eq!(categorize("document: data errors exclusive"), Category::Semantic);
        assert_eq!(categorize("document: data type"), Category::Structural);
        assert_eq!(categorize("resource: id presence"), Category::Structural);
    }

    #[test]
    fn test_build_classifies_and_counts() {
        let report = ValidationReporter::build(&sample_outcome(), "https://example.com/articles");

        assert_eq!(report.status, ReportStatus::Failed);
        assert_eq!(report.summary.errors, 2);
        assert_eq!(report.summary.warnings, 1);
        assert_eq!(report.summary.infos, 1);

        assert_eq!(report.findings[0].category, Category::Format);
        assert_eq!(report.findings[1].category, Category::Structural);
        // Warnings are always advisory
        assert_eq!(report.findings[2].severity, Severity::Warning);
        assert_eq!(report.findings[2].category, Category::Advisory);
    }

    #[test]
    fn test_aborted_run_builds_an_empty_report() {
        let outcome = RunOutcome::Failed {
            message: "connection refused".to_string(),
        };
        let report = ValidationReporter::build(&outcome, "https://example.com/articles");
        assert_eq!(report.status, ReportStatus::Aborted);
        assert_eq!(report.failure.as_deref(), Some("connection refused"));
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_json_render_flattens_findings() {
        let report = ValidationReporter::build(&sample_outcome(), "https://example.com/articles");
        let rendered = ValidationReporter::render(&report, ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["status"], "failed");
        assert_eq!(value["findings"][0]["severity"], "error");
        assert_eq!(value["findings"][0]["category"], "format");
        assert_eq!(value["findings"][0]["test"], "member-name: format");
    }

    #[test]
    fn test_markdown_render_has_sections() {
        let report = ValidationReporter::build(&sample_outcome(), "https://example.com/articles");
        let rendered = ValidationReporter::render(&report, ReportFormat::Markdown).unwrap();

        assert!(rendered.starts_with("# JSON:API Conformance Report"));
        assert!(rendered.contains("## Errors"));
        assert!(rendered.contains("## Warnings"));
        assert!(rendered.contains("`member-name: format`"));
    }

    #[test]
    fn test_text_render_is_one_line_per_finding() {
        let report = ValidationReporter::build(&sample_outcome(), "https://example.com/articles");
        let rendered = ValidationReporter::render(&report, ReportFormat::Text).unwrap();
        assert!(rendered.contains("[error][format] member-name: format:"));
        assert!(rendered.contains("2 errors, 1 warnings, 1 info"));
    }
}
