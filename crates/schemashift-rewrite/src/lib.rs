//! Rewrite engine converting runtypes schema code to zod.
//!
//! # Pipeline
//!
//! ```text
//! source ─> parse ─> imports::resolve ─> builtins::classify ─> Rewriter::render ─> inject::plan ─> apply_edits
//!                     (Session)           (UsageTable)          (types, methods,
//!                                                                namespace)
//! ```
//!
//! Every stage works on one unit and a [`Session`] created for it. A unit
//! that does not import the source library comes back byte-identical.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use schemashift_rewrite::{RewriteOptions, transform};
//!
//! let source = "import { Array, String } from 'runtypes';\nconst A = Array(String);\n";
//! let result = transform(source, Path::new("a.ts"), &RewriteOptions::default()).unwrap();
//! assert_eq!(result.output, "import { z } from 'zod';\nconst A = z.array(z.string());\n");
//! ```

use std::collections::HashSet;
use std::path::Path;

use schemashift_syntax::{Edit, apply_edits, parse};

mod builtins;
mod engine;
mod error;
mod imports;
mod inject;
mod methods;
mod namespace;
mod options;
mod session;
mod tables;
mod types;

pub use builtins::{Usage, UsageTable, classify};
pub use engine::Rewriter;
pub use error::RewriteError;
pub use imports::{ImportScan, ModuleStyle, RemovedImport, resolve};
pub use options::RewriteOptions;
pub use session::{ImportStyle, Note, Session};
pub use tables::{METHOD_TABLE, MethodRule, TYPE_TABLE, TypeTemplate};

/// Result of transforming one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub output: String,
    /// `false` means `output` is the input, byte for byte.
    pub changed: bool,
    pub notes: Vec<Note>,
}

impl Transformed {
    fn unchanged(source: &str, notes: Vec<Note>) -> Self {
        Self {
            output: source.to_string(),
            changed: false,
            notes,
        }
    }
}

/// Rewrite runtypes usage in `source` to zod.
///
/// `path` only labels log output; nothing is read from disk.
pub fn transform(
    source: &str,
    path: &Path,
    options: &RewriteOptions,
) -> Result<Transformed, RewriteError> {
    let span = tracing::debug_span!("transform", path = %path.display());
    let _enter = span.enter();

    options.validate()?;
    let tree = parse(source)?;
    let mut session = Session::new(options);

    let scan = imports::resolve(&tree, options, &mut session);
    if scan.removed.is_empty() {
        tracing::debug!("no source import, skipping");
        return Ok(Transformed::unchanged(source, session.notes));
    }

    tracing::debug!(style = ?session.style, removed = scan.removed.len(), "resolved imports");
    let usage = builtins::classify(&tree, &session);
    let removed: HashSet<usize> = scan.removed.iter().map(|r| r.node.id()).collect();

    let mut edits = Vec::new();
    let root = tree.root();
    let mut cursor = root.walk();
    let statements: Vec<_> = root.children(&mut cursor).collect();
    {
        let mut rewriter = Rewriter::new(&tree, &mut session, &usage);
        for stmt in statements {
            if removed.contains(&stmt.id()) {
                continue;
            }
            if let Some(text) = rewriter.render(stmt) {
                edits.push(Edit::new(stmt.start_byte()..stmt.end_byte(), text));
            }
        }
    }
    edits.extend(inject::plan(&tree, &scan, &session, options));

    let output = apply_edits(source, edits)?;
    let changed = output != source;
    tracing::debug!(changed, notes = session.notes.len(), "transformed");
    Ok(Transformed {
        output,
        changed,
        notes: session.notes,
    })
}
