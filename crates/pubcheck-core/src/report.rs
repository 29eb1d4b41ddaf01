//! Findings and the validation report
//!
//! A [`Finding`] is one reported rule violation; a [`Report`] is the
//! complete, immutable outcome of a single validation run. No validation
//! logic lives here: the report is a data carrier plus derived queries.

use crate::document::path::NodePath;
use serde::Serialize;

/// Severity of a single finding
///
/// Severity is part of a rule's identity: the same input always produces
/// the same severity. `error` findings make the document unusable by a
/// conforming reader; `warning` findings are best-practice deviations a
/// reader can tolerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Best-practice deviation; does not affect `is_valid`
    Warning,
    /// Violation that makes the document unusable downstream
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single reported rule violation
///
/// Immutable once created. All fields are render-ready: the message is
/// sanitized at construction so no control characters reach a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    /// Severity of the violation
    pub severity: Severity,
    /// Identifier of the rule that produced this finding
    pub rule: String,
    /// Location of the violation within the document
    pub path: NodePath,
    /// Human-readable description of the violation
    pub message: String,
}

impl Finding {
    /// Create an error-severity finding
    pub fn error(rule: &str, path: NodePath, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, rule, path, message)
    }

    /// Create a warning-severity finding
    pub fn warning(rule: &str, path: NodePath, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, rule, path, message)
    }

    fn new(severity: Severity, rule: &str, path: NodePath, message: impl Into<String>) -> Self {
        Self {
            severity,
            rule: rule.to_string(),
            path,
            message: sanitize(&message.into()),
        }
    }
}

/// Replace control characters so renderers never have to re-parse messages
///
/// Document values (hrefs, titles) are interpolated into messages and may
/// carry embedded newlines or escapes from the source JSON.
fn sanitize(message: &str) -> String {
    message
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// The complete, immutable outcome of one validation run
///
/// Built incrementally during traversal, then frozen; the caller owns it.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    findings: Vec<Finding>,
}

impl Report {
    /// Freeze an ordered list of findings into a report
    pub fn new(findings: Vec<Finding>) -> Self {
        Self { findings }
    }

    /// `true` when no finding has `error` severity
    pub fn is_valid(&self) -> bool {
        !self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    /// All findings, in traversal order
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Findings with `error` severity, in traversal order
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.by_severity(Severity::Error)
    }

    /// Findings with `warning` severity, in traversal order
    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.by_severity(Severity::Warning)
    }

    /// Findings of the given severity, in traversal order
    pub fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    /// Number of error-severity findings
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Number of warning-severity findings
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Findings whose path starts with `prefix`
    pub fn findings_under<'a>(&'a self, prefix: &'a NodePath) -> impl Iterator<Item = &'a Finding> {
        self.findings.iter().filter(move |f| f.path.starts_with(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Report {
        Report::new(vec![
            Finding::error(
                "internal-href-resolves",
                NodePath::root().key("readingOrder").index(1),
                "no resource entry matches href `track2.mp3`",
            ),
            Finding::warning(
                "total-duration-consistency",
                NodePath::root().key("metadata"),
                "declared duration 100 differs from reading-order sum 101",
            ),
        ])
    }

    #[test]
    fn is_valid_derives_only_from_error_severity() {
        let report = sample_report();
        assert!(!report.is_valid());
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);

        let warnings_only = Report::new(vec![Finding::warning(
            "toc-entry-title",
            NodePath::root().key("toc").index(0),
            "toc entry has no title",
        )]);
        assert!(warnings_only.is_valid());
    }

    #[test]
    fn findings_under_filters_by_path_prefix() {
        let report = sample_report();
        let prefix = NodePath::root().key("readingOrder");
        let matched: Vec<_> = report.findings_under(&prefix).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].rule, "internal-href-resolves");
    }

    #[test]
    fn messages_are_sanitized() {
        let finding = Finding::error(
            "link-href-valid",
            NodePath::root().key("links").index(0),
            "href contains\ncontrol\tcharacters",
        );
        assert_eq!(finding.message, "href contains control characters");
    }

    #[test]
    fn findings_serialize_render_ready() {
        let finding = Finding::warning(
            "feed-self-link",
            NodePath::root().key("links"),
            "feed has no self link",
        );
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["path"], "$.links");
    }
}
