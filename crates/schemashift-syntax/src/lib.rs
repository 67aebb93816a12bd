//! Syntax capability for schemashift.
//!
//! `schemashift-syntax` is the tree layer the rewrite engine is built on:
//! it parses TypeScript/JavaScript into a tree-sitter tree, exposes typed
//! views over the node shapes the engine cares about, and turns newly
//! constructed expressions back into source text.
//!
//! # Architecture
//!
//! ```text
//! source text ──> parse() ──> SyntaxTree ──> ExprView / TypeView   (query)
//!                                                 │
//!                          Expr (ir.rs) <─────────┘                 (construct)
//!                             │
//!                   TypeScriptWriter::emit ──> Edit ──> apply_edits (serialize)
//! ```
//!
//! Untouched regions of a file are never re-emitted: rewrites are spliced
//! into the original text as byte-span [`Edit`]s, so formatting outside a
//! rewritten expression survives verbatim.
//!
//! # Example
//!
//! ```ignore
//! use schemashift_syntax::{Expr, TypeScriptWriter, parse};
//!
//! let tree = parse("const x = String;")?;
//! assert_eq!(tree.root().kind(), "program");
//!
//! let call = Expr::call(Expr::member(Expr::ident("z"), "string"), vec![]);
//! assert_eq!(TypeScriptWriter::emit(&call), "z.string()");
//! ```

pub mod edit;
pub mod ir;
pub mod output;
pub mod parse;
pub mod view;

pub use edit::{Edit, EditError, apply_edits};
pub use ir::{Args, Expr, Literal};
pub use output::{TypeScriptWriter, is_valid_identifier};
pub use parse::{ParseError, SyntaxTree, parse};
pub use view::{
    ExprView, TypeView, expr_view, is_field, named_children, string_value, type_view, unparen,
    unquote,
};
