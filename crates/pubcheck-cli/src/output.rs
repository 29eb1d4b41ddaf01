//! Output formatting and writing utilities
//!
//! Reports go to stdout in the selected format; status chatter is
//! suppressed in quiet mode and in the machine-readable formats.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use pubcheck_core::{Finding, Report, Severity};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// The per-file envelope emitted by the JSON formats
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// Path of the validated file, as given on the command line
    pub file: String,
    /// `true` when the file validated with no error-severity finding
    pub is_valid: bool,
    /// Number of error-severity findings
    pub error_count: usize,
    /// Number of warning-severity findings
    pub warning_count: usize,
    /// All findings, in document order
    pub findings: Vec<Finding>,
    /// Why validation could not run at all (unreadable, bad JSON,
    /// structural rejection); absent for files that validated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    /// Build an envelope from a finished validation run
    pub fn new(path: &Path, report: &Report) -> Self {
        Self {
            file: path.display().to_string(),
            is_valid: report.is_valid(),
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            findings: report.findings().to_vec(),
            error: None,
        }
    }

    /// Build an envelope for a file that could not be validated
    pub fn failed(path: &Path, error: &crate::error::Error) -> Self {
        Self {
            file: path.display().to_string(),
            is_valid: false,
            error_count: 0,
            warning_count: 0,
            findings: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer targeting stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[allow(dead_code)]
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Write an informational status line (human format only)
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }
        writeln!(self.writer, "{}", message)?;
        Ok(())
    }

    /// Write the full batch of per-file reports
    pub fn write_reports(&mut self, reports: &[FileReport]) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let rendered = serde_json::to_string(reports)?;
                writeln!(self.writer, "{}", rendered)?;
            }
            OutputFormat::JsonPretty => {
                let rendered = serde_json::to_string_pretty(reports)?;
                writeln!(self.writer, "{}", rendered)?;
            }
            OutputFormat::Human => {
                for report in reports {
                    let rendered = self.render_file_human(report);
                    write!(self.writer, "{}", rendered)?;
                }
                if reports.len() > 1 && !self.quiet {
                    writeln!(self.writer, "{}", self.render_summary(reports))?;
                }
            }
        }
        Ok(())
    }

    fn render_file_human(&self, report: &FileReport) -> String {
        let mut out = String::new();

        if let Some(error) = &report.error {
            out.push_str(&format!(
                "{}: {}\n  {}\n",
                report.file,
                self.paint("failed", |s| s.red().bold().to_string()),
                error
            ));
            return out;
        }

        let status = if report.findings.is_empty() {
            self.paint("ok", |s| s.green().to_string())
        } else {
            format!(
                "{} error(s), {} warning(s)",
                report.error_count, report.warning_count
            )
        };
        out.push_str(&format!("{}: {}\n", report.file, status));

        for finding in &report.findings {
            out.push_str(&format!(
                "  {}  {}  {}  {}\n",
                self.render_severity(finding.severity),
                finding.rule,
                finding.path,
                finding.message
            ));
        }
        out
    }

    fn render_summary(&self, reports: &[FileReport]) -> String {
        let errors: usize = reports.iter().map(|r| r.error_count).sum();
        let warnings: usize = reports.iter().map(|r| r.warning_count).sum();
        format!(
            "Checked {} file(s): {} error(s), {} warning(s)",
            reports.len(),
            errors,
            warnings
        )
    }

    fn render_severity(&self, severity: Severity) -> String {
        match severity {
            Severity::Error => self.paint("error", |s| s.red().bold().to_string()),
            Severity::Warning => self.paint("warning", |s| s.yellow().to_string()),
        }
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> String) -> String {
        if self.use_color {
            style(text)
        } else {
            text.to_string()
        }
    }
}
