//! Per-unit rewrite state.
//!
//! A [`Session`] is created fresh for every source unit and threaded by
//! reference through each stage. Nothing in it outlives the unit, which is
//! what makes transforming many files in parallel safe.

use std::collections::{HashMap, HashSet};

use schemashift_syntax::{ExprView, SyntaxTree, expr_view};
use serde::Serialize;
use tree_sitter::Node;

use crate::options::RewriteOptions;
use crate::tables::HOST_CONVERSIONS;

/// How the source library was imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportStyle {
    #[default]
    None,
    NamedImports,
    NamespaceImport,
}

/// A spot that needs manual follow-up after rewriting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub line: usize,
    pub message: String,
}

#[derive(Debug)]
pub struct Session {
    pub style: ImportStyle,
    /// Local aliases bound to the whole module (`* as t`, default, `require`).
    pub namespace_aliases: Vec<String>,
    /// Local name -> imported name, for named imports.
    pub bindings: HashMap<String, String>,
    /// Local names whose imported name collides with a host conversion function.
    pub builtin_aliases: HashSet<String>,
    /// Qualifier used for every emitted target reference.
    pub target_binding: String,
    /// An import of the target module already exists and is kept.
    pub target_import_present: bool,
    pub mutated: bool,
    pub notes: Vec<Note>,
}

impl Session {
    pub fn new(options: &RewriteOptions) -> Self {
        Self {
            style: ImportStyle::None,
            namespace_aliases: Vec::new(),
            bindings: HashMap::new(),
            builtin_aliases: HashSet::new(),
            target_binding: options.target_binding.clone(),
            target_import_present: false,
            mutated: false,
            notes: Vec::new(),
        }
    }

    /// Record a named import of `imported` under `local`.
    pub fn bind(&mut self, local: &str, imported: &str) {
        if HOST_CONVERSIONS.contains(&imported) {
            self.builtin_aliases.insert(local.to_string());
        }
        self.bindings.insert(local.to_string(), imported.to_string());
        if self.style == ImportStyle::None {
            self.style = ImportStyle::NamedImports;
        }
    }

    /// Record a namespace-style alias for the whole module.
    pub fn bind_namespace(&mut self, alias: &str) {
        if !self.is_alias(alias) {
            self.namespace_aliases.push(alias.to_string());
        }
        self.style = ImportStyle::NamespaceImport;
    }

    /// Imported name behind local `name`, for named imports.
    pub fn binding(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    pub fn is_alias(&self, name: &str) -> bool {
        self.namespace_aliases.iter().any(|a| a == name)
    }

    /// Whether `name` refers to the source module in some form.
    pub fn is_source_name(&self, name: &str) -> bool {
        self.bindings.contains_key(name) || self.is_alias(name)
    }

    /// Member name of a qualified reference `alias.Member`.
    pub fn qualified_name<'s>(&self, tree: &SyntaxTree<'s>, node: Node) -> Option<&'s str> {
        let ExprView::Member {
            object,
            property,
            optional: false,
        } = expr_view(node)
        else {
            return None;
        };
        if object.kind() != "identifier"
            || property.kind() != "property_identifier"
            || !self.is_alias(tree.text(object))
        {
            return None;
        }
        Some(tree.text(property))
    }

    pub fn note(&mut self, line: usize, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(line, "{message}");
        self.notes.push(Note { line, message });
    }
}
