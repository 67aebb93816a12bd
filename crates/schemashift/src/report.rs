//! Batch report: per-file outcomes, counts and their rendering.

use schemashift_rewrite::Note;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::runner::RunMode;

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    Rewritten,
    Unchanged,
    Error { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
    /// Rewritten text, kept only when it is to be printed.
    #[serde(skip)]
    pub output: Option<String>,
}

impl FileReport {
    pub fn error(path: PathBuf, message: impl Into<String>) -> Self {
        Self {
            path,
            outcome: FileOutcome::Error {
                message: message.into(),
            },
            notes: Vec::new(),
            output: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub files: usize,
    pub rewritten: usize,
    pub unchanged: usize,
    pub errors: usize,
    pub notes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub summary: Summary,
    pub files: Vec<FileReport>,
}

impl Report {
    pub fn new(files: Vec<FileReport>) -> Self {
        let mut summary = Summary {
            files: files.len(),
            ..Summary::default()
        };
        for file in &files {
            match file.outcome {
                FileOutcome::Rewritten => summary.rewritten += 1,
                FileOutcome::Unchanged => summary.unchanged += 1,
                FileOutcome::Error { .. } => summary.errors += 1,
            }
            summary.notes += file.notes.len();
        }
        Self { summary, files }
    }

    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable listing of rewritten and failed files, their notes,
    /// and a closing summary line. Unchanged files are only counted.
    pub fn render_human(&self, mode: RunMode) -> String {
        let verb = match mode {
            RunMode::Write => "rewrote",
            RunMode::DryRun => "would rewrite",
            RunMode::Print => "printed",
        };

        let mut out = String::new();
        for file in &self.files {
            let path = file.path.display();
            match &file.outcome {
                FileOutcome::Rewritten => {
                    let _ = writeln!(out, "{verb} {path}");
                }
                FileOutcome::Unchanged => {}
                FileOutcome::Error { message } => {
                    let _ = writeln!(out, "error: {path}: {message}");
                }
            }
            for note in &file.notes {
                let _ = writeln!(out, "  note: {path}:{}: {}", note.line, note.message);
            }
        }

        let s = &self.summary;
        let _ = writeln!(
            out,
            "{} {}: {} rewritten, {} unchanged, {} {}, {} {}",
            s.files,
            plural(s.files, "file", "files"),
            s.rewritten,
            s.unchanged,
            s.errors,
            plural(s.errors, "error", "errors"),
            s.notes,
            plural(s.notes, "note", "notes"),
        );
        out
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}
