//! Validation command handlers
//!
//! Both subcommands share the same batch pipeline: expand paths, validate
//! every file against one shared rule set, then render the reports in
//! input order. Files are independent, so the batch runs in parallel.

use crate::cli::ValidateArgs;
use crate::error::{Error, Result};
use crate::handlers::utils;
use crate::output::{FileReport, OutputWriter};
use pubcheck_core::{validate, Document, DocumentKind, RuleSet};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Handle the manifest command
#[instrument(skip(args, output), fields(files = args.paths.len()))]
pub fn handle_manifest(args: ValidateArgs, output: &mut OutputWriter) -> Result<()> {
    run_validation(args, DocumentKind::Manifest, output)
}

/// Handle the feed command
#[instrument(skip(args, output), fields(files = args.paths.len()))]
pub fn handle_feed(args: ValidateArgs, output: &mut OutputWriter) -> Result<()> {
    run_validation(args, DocumentKind::Feed, output)
}

fn run_validation(
    args: ValidateArgs,
    kind: DocumentKind,
    output: &mut OutputWriter,
) -> Result<()> {
    let files = utils::collect_documents(&args.paths)?;
    info!(kind = %kind, files = files.len(), "starting validation batch");
    output.info(&format!("Validating {} {} file(s)", files.len(), kind))?;

    let rule_set = RuleSet::standard();
    let (reports, first_failure) = batch_reports(&files, kind, &rule_set);

    output.write_reports(&reports)?;

    let errors: usize = reports.iter().map(|r| r.error_count).sum();
    let warnings: usize = reports.iter().map(|r| r.warning_count).sum();
    debug!(errors, warnings, "validation batch finished");

    // A file that could not be validated at all outranks any finding.
    if let Some(error) = first_failure {
        return Err(error);
    }

    let failing = if args.strict { errors + warnings } else { errors };
    if failing > 0 {
        let files_affected = reports
            .iter()
            .filter(|r| !r.is_valid || (args.strict && r.warning_count > 0))
            .count();
        return Err(Error::ValidationFailed {
            errors: failing,
            files: files_affected,
        });
    }
    Ok(())
}

/// Validate every file in the batch, converting per-file failures
/// (unreadable, bad JSON, structural rejection) into error envelopes so
/// one broken file never hides the reports of the rest. The first
/// failure's error comes back alongside the full batch so the exit
/// status can reflect it after all reports are rendered.
fn batch_reports(
    files: &[PathBuf],
    kind: DocumentKind,
    rule_set: &RuleSet,
) -> (Vec<FileReport>, Option<Error>) {
    // collect() keeps input order, so reports and exit codes are stable
    // regardless of scheduling.
    let outcomes: Vec<Result<FileReport>> = files
        .par_iter()
        .map(|path| check_file(path, kind, rule_set))
        .collect();

    let mut reports = Vec::with_capacity(outcomes.len());
    let mut first_failure = None;
    for (path, outcome) in files.iter().zip(outcomes) {
        match outcome {
            Ok(report) => reports.push(report),
            Err(error) => {
                tracing::error!(file = %path.display(), %error, "file could not be validated");
                reports.push(FileReport::failed(path, &error));
                if first_failure.is_none() {
                    first_failure = Some(error);
                }
            }
        }
    }
    (reports, first_failure)
}

fn check_file(path: &Path, kind: DocumentKind, rule_set: &RuleSet) -> Result<FileReport> {
    let content = fs::read_to_string(path)?;
    let raw: serde_json::Value =
        serde_json::from_str(&content).map_err(|source| Error::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;

    let document = match kind {
        DocumentKind::Manifest => Document::parse_manifest(&raw)?,
        DocumentKind::Feed => Document::parse_feed(&raw)?,
    };
    let report = validate(&document, rule_set)?;
    Ok(FileReport::new(path, &report))
}
