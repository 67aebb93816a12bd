//! File discovery and the parallel batch runner.
//!
//! Each file is read, transformed with a fresh session and, depending on
//! [`RunMode`], written back. A failing file becomes an error entry in the
//! report; it never stops the rest of the batch.

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use rayon::prelude::*;
use schemashift_rewrite::{RewriteError, RewriteOptions, transform};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::report::{FileOutcome, FileReport, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Write changed files back in place.
    Write,
    /// Report what would change, write nothing.
    DryRun,
    /// Keep rewritten text for printing, write nothing.
    Print,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mode: RunMode,
    pub rewrite: RewriteOptions,
    /// Extensions, without dots, picked up from directory walks.
    pub extensions: Vec<String>,
    /// Gitignore-style patterns skipped during directory walks.
    pub exclude: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
enum FileError {
    #[error("failed to read file: {0}")]
    Read(#[source] std::io::Error),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error("failed to write file: {0}")]
    Write(#[source] std::io::Error),
}

/// Expand `paths` into the files to process, sorted and deduplicated.
///
/// Directories are walked honoring `.gitignore`, the extension filter and
/// the exclude patterns. Paths that are not directories are always kept,
/// whatever their extension; a missing one surfaces later as a read error.
pub fn discover(paths: &[PathBuf], options: &RunOptions) -> Result<Vec<PathBuf>, ignore::Error> {
    let mut files = BTreeSet::new();
    for path in paths {
        if !path.is_dir() {
            files.insert(path.clone());
            continue;
        }

        let mut overrides = OverrideBuilder::new(path);
        for pattern in &options.exclude {
            overrides.add(&format!("!{pattern}"))?;
        }
        let walker = WalkBuilder::new(path)
            .hidden(true)
            .git_ignore(true)
            .overrides(overrides.build()?)
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("skipping unreadable entry: {err}");
                    continue;
                }
            };
            let file = entry.path();
            if entry.file_type().is_some_and(|t| t.is_file()) && has_extension(file, &options.extensions)
            {
                files.insert(file.to_path_buf());
            }
        }
    }
    tracing::debug!(files = files.len(), "discovered input files");
    Ok(files.into_iter().collect())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

/// Process every file in parallel. Report order follows `files`.
pub fn run(files: &[PathBuf], options: &RunOptions) -> Report {
    tracing::debug!(files = files.len(), mode = ?options.mode, "running");
    let reports: Vec<FileReport> = files
        .par_iter()
        .map(|path| process(path, options))
        .collect();
    Report::new(reports)
}

fn process(path: &Path, options: &RunOptions) -> FileReport {
    let span = tracing::info_span!("file", path = %path.display());
    let _enter = span.enter();

    match rewrite_file(path, options) {
        Ok(report) => {
            tracing::info!(outcome = ?report.outcome, notes = report.notes.len(), "processed");
            report
        }
        Err(err) => {
            tracing::info!("failed: {err}");
            FileReport::error(path.to_path_buf(), err.to_string())
        }
    }
}

fn rewrite_file(path: &Path, options: &RunOptions) -> Result<FileReport, FileError> {
    let source = std::fs::read_to_string(path).map_err(FileError::Read)?;
    let result = transform(&source, path, &options.rewrite)?;

    let outcome = if result.changed {
        FileOutcome::Rewritten
    } else {
        FileOutcome::Unchanged
    };

    let mut output = None;
    if result.changed {
        match options.mode {
            RunMode::Write => std::fs::write(path, &result.output).map_err(FileError::Write)?,
            RunMode::Print => output = Some(result.output),
            RunMode::DryRun => {}
        }
    }

    Ok(FileReport {
        path: path.to_path_buf(),
        outcome,
        notes: result.notes,
        output,
    })
}
