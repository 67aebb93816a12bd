//! Import resolution.
//!
//! Scans the top-level statements of a unit for ESM imports and CommonJS
//! requires of the source library, records their bindings in the session
//! and reports which statements are to be removed.

use schemashift_syntax::{SyntaxTree, named_children, unquote};
use tree_sitter::Node;

use crate::options::RewriteOptions;
use crate::session::Session;
use crate::tables::{type_reference, type_template};

/// Module system a statement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStyle {
    Esm,
    CommonJs,
}

/// A source-library import scheduled for removal.
#[derive(Debug, Clone)]
pub struct RemovedImport<'t> {
    pub node: Node<'t>,
    pub style: ModuleStyle,
    /// Quote character of the module specifier.
    pub quote: char,
    pub semicolon: bool,
}

#[derive(Debug, Default)]
pub struct ImportScan<'t> {
    pub removed: Vec<RemovedImport<'t>>,
    /// Last import or require that stays in the unit, counted only within
    /// the leading run of imports, requires and directives.
    pub last_kept: Option<Node<'t>>,
}

/// Resolve the unit's imports into `session`.
pub fn resolve<'t>(
    tree: &'t SyntaxTree<'_>,
    options: &RewriteOptions,
    session: &mut Session,
) -> ImportScan<'t> {
    let mut scan = ImportScan::default();
    // Still inside the leading run of imports, requires and directives.
    let mut prelude = true;

    for stmt in named_children(tree.root()) {
        let (style, source) = match stmt.kind() {
            "import_statement" => match stmt.child_by_field_name("source") {
                Some(source) => (ModuleStyle::Esm, source),
                None => continue,
            },
            "lexical_declaration" | "variable_declaration" => match require_source(tree, stmt) {
                Some(source) => (ModuleStyle::CommonJs, source),
                None => {
                    prelude = false;
                    continue;
                }
            },
            "export_statement" => {
                note_source_reexport(tree, stmt, options, session);
                prelude = false;
                continue;
            }
            "hash_bang_line" => continue,
            _ => {
                prelude &= is_directive(stmt);
                continue;
            }
        };

        let Some(specifier) = unquote(tree.text(source)) else {
            continue;
        };

        if options.is_source_module(specifier) {
            tracing::debug!(specifier, line = tree.line(stmt), "removing source import");
            match style {
                ModuleStyle::Esm => bind_import_clause(tree, stmt, session),
                ModuleStyle::CommonJs => bind_require_pattern(tree, stmt, session),
            }
            scan.removed.push(RemovedImport {
                node: stmt,
                style,
                quote: tree.text(source).chars().next().unwrap_or('\''),
                semicolon: tree.text(stmt).trim_end().ends_with(';'),
            });
            session.mutated = true;
        } else {
            if options.is_target_module(specifier) {
                adopt_target_import(tree, stmt, style, options, session);
            }
            if prelude {
                scan.last_kept = Some(stmt);
            }
        }
    }

    scan
}

/// `'use strict'` and other string-literal statements of a prologue.
fn is_directive(stmt: Node) -> bool {
    if stmt.kind() != "expression_statement" {
        return false;
    }
    let children = named_children(stmt);
    matches!(children[..], [expr] if expr.kind() == "string")
}

/// `export { X } from 'runtypes'` and `export * from 'runtypes'` are left in
/// place: the names they forward have no single zod counterpart.
fn note_source_reexport(
    tree: &SyntaxTree<'_>,
    stmt: Node,
    options: &RewriteOptions,
    session: &mut Session,
) {
    let Some(source) = stmt.child_by_field_name("source") else {
        return;
    };
    if unquote(tree.text(source)).is_some_and(|specifier| options.is_source_module(specifier)) {
        session.note(
            tree.line(stmt),
            "re-export from the source library left unchanged; export zod schemas instead",
        );
    }
}

/// Module specifier of `const x = require('...')`, for single-declarator statements.
fn require_source<'t>(tree: &SyntaxTree<'_>, stmt: Node<'t>) -> Option<Node<'t>> {
    let declarators = named_children(stmt);
    let [declarator] = declarators[..] else {
        return None;
    };
    let value = declarator.child_by_field_name("value")?;
    if value.kind() != "call_expression" {
        return None;
    }
    let callee = value.child_by_field_name("function")?;
    if tree.text(callee) != "require" {
        return None;
    }
    let arguments = named_children(value.child_by_field_name("arguments")?);
    match arguments[..] {
        [source] if source.kind() == "string" => Some(source),
        _ => None,
    }
}

fn declarator_pattern<'t>(stmt: Node<'t>) -> Option<Node<'t>> {
    named_children(stmt)
        .first()
        .and_then(|declarator| declarator.child_by_field_name("name"))
}

fn bind_import_clause(tree: &SyntaxTree<'_>, stmt: Node, session: &mut Session) {
    let Some(clause) = named_children(stmt)
        .into_iter()
        .find(|c| c.kind() == "import_clause")
    else {
        return;
    };

    for part in named_children(clause) {
        match part.kind() {
            // Default import: the module object under another name.
            "identifier" => session.bind_namespace(tree.text(part)),
            "namespace_import" => {
                if let Some(alias) = named_children(part)
                    .into_iter()
                    .find(|c| c.kind() == "identifier")
                {
                    session.bind_namespace(tree.text(alias));
                }
            }
            "named_imports" => {
                for specifier in named_children(part) {
                    let Some(name) = specifier.child_by_field_name("name") else {
                        continue;
                    };
                    let imported = tree.text(name);
                    let local = specifier
                        .child_by_field_name("alias")
                        .map(|alias| tree.text(alias))
                        .unwrap_or(imported);
                    bind_named(tree, specifier, local, imported, session);
                }
            }
            _ => {}
        }
    }
}

fn bind_require_pattern(tree: &SyntaxTree<'_>, stmt: Node, session: &mut Session) {
    let Some(pattern) = declarator_pattern(stmt) else {
        return;
    };
    match pattern.kind() {
        "identifier" => session.bind_namespace(tree.text(pattern)),
        "object_pattern" => {
            for property in named_children(pattern) {
                match property.kind() {
                    "shorthand_property_identifier_pattern" => {
                        let name = tree.text(property);
                        bind_named(tree, property, name, name, session);
                    }
                    "pair_pattern" => {
                        if let (Some(key), Some(value)) = (
                            property.child_by_field_name("key"),
                            property.child_by_field_name("value"),
                        ) {
                            bind_named(tree, property, tree.text(value), tree.text(key), session);
                        }
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

fn bind_named(
    tree: &SyntaxTree<'_>,
    node: Node,
    local: &str,
    imported: &str,
    session: &mut Session,
) {
    if type_template(imported).is_none() && type_reference(imported).is_none() {
        session.note(
            tree.line(node),
            format!("`{imported}` has no zod equivalent; its uses need manual follow-up"),
        );
    }
    session.bind(local, imported);
}

/// Keep an existing target import and emit references through its binding.
fn adopt_target_import(
    tree: &SyntaxTree<'_>,
    stmt: Node,
    style: ModuleStyle,
    options: &RewriteOptions,
    session: &mut Session,
) {
    let binding = match style {
        ModuleStyle::Esm => esm_target_binding(tree, stmt, options),
        ModuleStyle::CommonJs => cjs_target_binding(tree, stmt, options),
    };
    if let Some(binding) = binding {
        tracing::debug!(binding, "reusing existing target import");
        session.target_binding = binding.to_string();
        session.target_import_present = true;
    }
}

fn esm_target_binding<'s>(
    tree: &SyntaxTree<'s>,
    stmt: Node,
    options: &RewriteOptions,
) -> Option<&'s str> {
    let clause = named_children(stmt)
        .into_iter()
        .find(|c| c.kind() == "import_clause")?;
    for part in named_children(clause) {
        match part.kind() {
            "identifier" => return Some(tree.text(part)),
            "namespace_import" => {
                return named_children(part)
                    .into_iter()
                    .find(|c| c.kind() == "identifier")
                    .map(|alias| tree.text(alias));
            }
            "named_imports" => {
                for specifier in named_children(part) {
                    let Some(name) = specifier.child_by_field_name("name") else {
                        continue;
                    };
                    if tree.text(name) == options.target_binding {
                        let local = specifier.child_by_field_name("alias").unwrap_or(name);
                        return Some(tree.text(local));
                    }
                }
            }
            _ => {}
        }
    }
    None
}

fn cjs_target_binding<'s>(
    tree: &SyntaxTree<'s>,
    stmt: Node,
    options: &RewriteOptions,
) -> Option<&'s str> {
    let pattern = declarator_pattern(stmt)?;
    match pattern.kind() {
        "identifier" => Some(tree.text(pattern)),
        "object_pattern" => named_children(pattern)
            .into_iter()
            .find_map(|property| match property.kind() {
                "shorthand_property_identifier_pattern"
                    if tree.text(property) == options.target_binding =>
                {
                    Some(tree.text(property))
                }
                "pair_pattern" => {
                    let key = property.child_by_field_name("key")?;
                    let value = property.child_by_field_name("value")?;
                    (tree.text(key) == options.target_binding).then(|| tree.text(value))
                }
                _ => None,
            }),
        _ => None,
    }
}
