//! Batch rewriting of runtypes schemas to zod.
//!
//! The pure per-file engine lives in `schemashift_rewrite`; this crate adds
//! what a run over a codebase needs: [`config`] loading, file discovery and
//! the parallel [`runner`], and the [`report`] handed back to the caller.

pub mod config;
pub mod report;
pub mod runner;

pub use config::{ConfigError, SchemashiftConfig};
pub use report::{FileOutcome, FileReport, Report, Summary};
pub use runner::{RunMode, RunOptions, discover, run};
pub use schemashift_rewrite::{Note, RewriteError, RewriteOptions, Transformed, transform};
