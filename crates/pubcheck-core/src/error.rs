//! Error types for the pubcheck core library
//!
//! Two failure kinds exist at this level, and they are deliberately kept
//! apart from validation findings: a [`Structural`](Error::Structural) error
//! means the input could not be turned into a document at all, while a
//! [`RuleFailure`](Error::RuleFailure) means a rule implementation panicked
//! on a well-typed node, which is a defect in the rule and must fail the
//! run loudly rather than surface as a finding.

use thiserror::Error;

/// Main error type for pubcheck-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// The input cannot be parsed into a document
    ///
    /// Raised by the document model at construction time; always fatal to
    /// the single validation call it aborts.
    #[error("structural error at {path}: {reason}")]
    Structural {
        /// Path of the offending node, rendered JSONPath-style
        path: String,
        /// What was wrong at that path
        reason: String,
    },

    /// A validation rule panicked while evaluating a node
    ///
    /// This is a programming error in the rule itself, never a property of
    /// the document under validation.
    #[error("rule '{rule}' failed at {path}: rule implementations must not panic")]
    RuleFailure {
        /// Identifier of the offending rule
        rule: String,
        /// Path of the node the rule was evaluating
        path: String,
    },
}

impl Error {
    /// Create a structural error for the given path
    pub fn structural(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Structural {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_error_names_path_and_reason() {
        let err = Error::structural("$.metadata", "missing required field `title`");
        let rendered = err.to_string();
        assert!(rendered.contains("$.metadata"));
        assert!(rendered.contains("missing required field `title`"));
    }

    #[test]
    fn rule_failure_names_rule() {
        let err = Error::RuleFailure {
            rule: "audio-media-type".to_string(),
            path: "$.readingOrder[0]".to_string(),
        };
        assert!(err.to_string().contains("audio-media-type"));
    }
}
