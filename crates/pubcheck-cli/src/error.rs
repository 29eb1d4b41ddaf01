//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more documents failed validation
    #[error("{errors} validation error(s) across {files} file(s)")]
    ValidationFailed { errors: usize, files: usize },

    /// Error from pubcheck-core (structural rejection or rule defect)
    #[error("{0}")]
    Core(#[from] pubcheck_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The file is not parseable JSON
    #[error("Invalid JSON in {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error while rendering output
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ValidationFailed { .. } => 1,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::InvalidJson { .. } => 4,
            Self::Io(_) => 5,
            Self::Config(_) => 6,
            Self::Json(_) => 7,
            Self::Other { .. } => 99,
        }
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(Error::ValidationFailed { errors: 2, files: 1 }.exit_code(), 1);
        assert_eq!(
            Error::Core(pubcheck_core::Error::structural("$", "missing `metadata`")).exit_code(),
            2
        );
        assert_eq!(
            Error::FileNotFound { path: PathBuf::from("missing.json") }.exit_code(),
            3
        );
        assert_eq!(Error::other("boom").exit_code(), 99);
    }

    #[test]
    fn format_error_is_plain_without_color() {
        let err = Error::config("unreadable config");
        assert_eq!(format_error(&err, false), "Error: Configuration error: unreadable config");
    }
}
