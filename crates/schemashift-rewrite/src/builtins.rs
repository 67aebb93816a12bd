//! Builtin-collision classification.
//!
//! One walk over the unit, before any rewriting, decides for every
//! reference to the source library whether it is a schema use or a host
//! use. The resulting [`UsageTable`] is read-only for the rest of the
//! transform, so every rewriter sees the same decision for a node.
//!
//! A node is only ever recorded when it actually refers to the import:
//! names shadowed by a parameter or local declaration are skipped.

use std::collections::HashMap;

use schemashift_syntax::{ExprView, SyntaxTree, expr_view, is_field, named_children};
use tree_sitter::Node;

use crate::session::Session;
use crate::tables::{HOST_CONVERSIONS, MethodRule, method_rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    /// Eligible for schema rewriting.
    Schema,
    /// Refers to the import but sits where only the host builtin makes sense.
    Host,
}

/// Per-node classification, keyed by node id.
#[derive(Debug, Default)]
pub struct UsageTable {
    usage: HashMap<usize, Usage>,
}

impl UsageTable {
    pub fn get(&self, node: Node) -> Option<Usage> {
        self.usage.get(&node.id()).copied()
    }

    pub fn is_schema(&self, node: Node) -> bool {
        self.get(node) == Some(Usage::Schema)
    }

    pub(crate) fn len(&self) -> usize {
        self.usage.len()
    }
}

/// Classify every source-library reference in the unit.
pub fn classify(tree: &SyntaxTree<'_>, session: &Session) -> UsageTable {
    let mut classifier = Classifier {
        tree,
        session,
        table: UsageTable::default(),
        shadowed: Vec::new(),
    };
    classifier.walk(tree.root());
    tracing::debug!(references = classifier.table.len(), "classified source references");
    classifier.table
}

struct Classifier<'a, 's> {
    tree: &'a SyntaxTree<'s>,
    session: &'a Session,
    table: UsageTable,
    /// Source names re-declared by enclosing scopes.
    shadowed: Vec<String>,
}

impl Classifier<'_, '_> {
    fn walk(&mut self, node: Node) {
        match node.kind() {
            "import_statement" => return,
            "identifier" | "shorthand_property_identifier" => self.visit_identifier(node),
            "member_expression" => self.visit_member(node),
            _ => {}
        }

        let depth = self.shadowed.len();
        let declared = self.scope_declarations(node);
        self.shadowed.extend(declared);

        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        for child in children {
            self.walk(child);
        }

        self.shadowed.truncate(depth);
    }

    fn is_shadowed(&self, name: &str) -> bool {
        self.shadowed.iter().any(|s| s == name)
    }

    fn record(&mut self, node: Node, usage: Usage) {
        self.table.usage.insert(node.id(), usage);
    }

    fn visit_identifier(&mut self, node: Node) {
        let name = self.tree.text(node);
        if self.is_shadowed(name) {
            return;
        }
        if self.session.binding(name).is_some() {
            let colliding = self.session.builtin_aliases.contains(name);
            let usage = self.position(node, colliding);
            self.record(node, usage);
        } else if self.session.is_alias(name) {
            // The qualifier of `t.X` is handled through the member expression.
            let usage = match node.parent() {
                Some(parent)
                    if parent.kind() == "member_expression" && is_field(parent, "object", node) =>
                {
                    Usage::Host
                }
                _ => self.position(node, false),
            };
            self.record(node, usage);
        }
    }

    fn visit_member(&mut self, node: Node) {
        let Some(name) = self.session.qualified_name(self.tree, node) else {
            return;
        };
        let alias = node
            .child_by_field_name("object")
            .map(|object| self.tree.text(object))
            .unwrap_or_default();
        if self.is_shadowed(alias) {
            return;
        }
        let usage = self.position(node, HOST_CONVERSIONS.contains(&name));
        self.record(node, usage);
    }

    /// Decide a reference's usage from the position it appears in.
    fn position(&self, node: Node, colliding: bool) -> Usage {
        let Some(parent) = node.parent() else {
            return Usage::Schema;
        };
        match parent.kind() {
            "call_expression" if is_field(parent, "function", node) => {
                let arity = parent
                    .child_by_field_name("arguments")
                    .map_or(0, |args| named_children(args).len());
                if colliding && arity > 0 {
                    Usage::Host
                } else {
                    Usage::Schema
                }
            }
            "member_expression" if is_field(parent, "object", node) => {
                let method = parent
                    .child_by_field_name("property")
                    .and_then(|property| method_rule(self.tree.text(property)));
                if method.is_some() {
                    Usage::Schema
                } else {
                    Usage::Host
                }
            }
            "arguments" => {
                let schema_call = parent.parent().is_some_and(|call| self.is_schema_call(call));
                if colliding && !schema_call {
                    Usage::Host
                } else {
                    Usage::Schema
                }
            }
            "variable_declarator" if is_field(parent, "name", node) => Usage::Host,
            "assignment_expression" | "augmented_assignment_expression"
                if is_field(parent, "left", node) =>
            {
                Usage::Host
            }
            "arrow_function" if is_field(parent, "parameter", node) => Usage::Host,
            "new_expression"
            | "update_expression"
            | "required_parameter"
            | "optional_parameter"
            | "function_declaration"
            | "function_expression"
            | "class_declaration"
            | "class"
            | "catch_clause"
            | "labeled_statement"
            | "export_specifier"
            | "type_query"
            | "pair_pattern"
            | "array_pattern"
            | "rest_pattern"
            | "assignment_pattern"
            | "object_assignment_pattern" => Usage::Host,
            _ => Usage::Schema,
        }
    }

    /// Whether `call` builds a schema, so its arguments are schema operands.
    fn is_schema_call(&self, call: Node) -> bool {
        let Some(callee) = call.child_by_field_name("function") else {
            return false;
        };
        match expr_view(callee) {
            ExprView::Identifier => {
                let name = self.tree.text(callee);
                self.session.binding(name).is_some() && !self.is_shadowed(name)
            }
            ExprView::Member { property, .. } => {
                self.session.qualified_name(self.tree, callee).is_some()
                    || matches!(
                        method_rule(self.tree.text(property)),
                        Some(MethodRule::Combine(_))
                    )
            }
            _ => false,
        }
    }

    /// Source names that `node` re-declares for its subtree.
    fn scope_declarations(&self, node: Node) -> Vec<String> {
        let mut names = Vec::new();
        match node.kind() {
            "arrow_function"
            | "function_declaration"
            | "function_expression"
            | "function"
            | "generator_function"
            | "generator_function_declaration"
            | "method_definition" => {
                if let Some(param) = node.child_by_field_name("parameter") {
                    self.collect_pattern(param, &mut names);
                }
                if let Some(params) = node.child_by_field_name("parameters") {
                    for param in named_children(params) {
                        let pattern = param.child_by_field_name("pattern").unwrap_or(param);
                        self.collect_pattern(pattern, &mut names);
                    }
                }
            }
            "statement_block" => {
                for stmt in named_children(node) {
                    self.collect_declaration(stmt, &mut names);
                }
            }
            "catch_clause" => {
                if let Some(param) = node.child_by_field_name("parameter") {
                    self.collect_pattern(param, &mut names);
                }
            }
            "for_statement" => {
                if let Some(init) = node.child_by_field_name("initializer") {
                    self.collect_declaration(init, &mut names);
                }
            }
            "for_in_statement" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.collect_pattern(left, &mut names);
                }
            }
            _ => {}
        }
        names.retain(|name| self.session.is_source_name(name));
        names
    }

    fn collect_declaration(&self, stmt: Node, names: &mut Vec<String>) {
        match stmt.kind() {
            "lexical_declaration" | "variable_declaration" => {
                for declarator in named_children(stmt) {
                    if let Some(name) = declarator.child_by_field_name("name") {
                        self.collect_pattern(name, names);
                    }
                }
            }
            "function_declaration" | "class_declaration" => {
                if let Some(name) = stmt.child_by_field_name("name") {
                    names.push(self.tree.text(name).to_string());
                }
            }
            _ => {}
        }
    }

    fn collect_pattern(&self, node: Node, names: &mut Vec<String>) {
        match node.kind() {
            "identifier" | "shorthand_property_identifier_pattern" => {
                names.push(self.tree.text(node).to_string());
            }
            "pair_pattern" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.collect_pattern(value, names);
                }
            }
            "assignment_pattern" | "object_assignment_pattern" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.collect_pattern(left, names);
                }
            }
            "object_pattern" | "array_pattern" | "rest_pattern" => {
                for child in named_children(node) {
                    self.collect_pattern(child, names);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imports;
    use crate::options::RewriteOptions;
    use schemashift_syntax::parse;

    /// Usage of every recorded node, as `(text, usage)` in document order.
    fn usages(source: &str) -> Vec<(String, Usage)> {
        let options = RewriteOptions::default();
        let tree = parse(source).unwrap();
        let mut session = Session::new(&options);
        imports::resolve(&tree, &options, &mut session);
        let table = classify(&tree, &session);

        fn collect(
            node: Node,
            tree: &SyntaxTree<'_>,
            table: &UsageTable,
            out: &mut Vec<(String, Usage)>,
        ) {
            if let Some(usage) = table.get(node) {
                out.push((tree.text(node).to_string(), usage));
            }
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            for child in children {
                collect(child, tree, table, out);
            }
        }

        let mut out = Vec::new();
        collect(tree.root(), &tree, &table, &mut out);
        out
    }

    fn usage_of(usages: &[(String, Usage)], text: &str) -> Vec<Usage> {
        usages
            .iter()
            .filter(|(t, _)| t == text)
            .map(|(_, u)| *u)
            .collect()
    }

    #[test]
    fn test_conversion_with_argument_is_host() {
        let u = usages("import { String } from 'runtypes';\nconst a = String(42);\nconst b = String;\n");
        assert_eq!(usage_of(&u, "String"), vec![Usage::Host, Usage::Schema]);
    }

    #[test]
    fn test_callback_argument_is_host() {
        let u = usages("import { Boolean } from 'runtypes';\nitems.filter(Boolean);\n");
        assert_eq!(usage_of(&u, "Boolean"), vec![Usage::Host]);
    }

    #[test]
    fn test_schema_constructor_argument_is_schema() {
        let u = usages(
            "import { Array, String, Number } from 'runtypes';\nconst a = Array(String);\nconst b = a.or(Number);\n",
        );
        assert_eq!(usage_of(&u, "String"), vec![Usage::Schema]);
        assert_eq!(usage_of(&u, "Number"), vec![Usage::Schema]);
        assert_eq!(usage_of(&u, "Array"), vec![Usage::Schema]);
    }

    #[test]
    fn test_unimported_global_never_recorded() {
        let u = usages("import { Array } from 'runtypes';\nconst a = String(1);\nitems.filter(Boolean);\n");
        assert!(usage_of(&u, "String").is_empty());
        assert!(usage_of(&u, "Boolean").is_empty());
    }

    #[test]
    fn test_member_object_depends_on_method() {
        let u = usages("import { String } from 'runtypes';\nString.check(x);\nString.prototype;\n");
        assert_eq!(usage_of(&u, "String"), vec![Usage::Schema, Usage::Host]);
    }

    #[test]
    fn test_qualified_references() {
        let u = usages("import * as t from 'runtypes';\nconst a = t.Array(t.String);\nconst s = t.String(1);\n");
        assert_eq!(usage_of(&u, "t.Array"), vec![Usage::Schema]);
        assert_eq!(usage_of(&u, "t.String"), vec![Usage::Schema, Usage::Host]);
        assert_eq!(usage_of(&u, "t"), vec![Usage::Host, Usage::Host, Usage::Host]);
    }

    #[test]
    fn test_shadowed_alias_skipped() {
        let u = usages("import * as t from 'runtypes';\nitems.map(t => t.id);\nconst a = t.String;\n");
        assert!(usage_of(&u, "t.id").is_empty());
        assert_eq!(usage_of(&u, "t.String"), vec![Usage::Schema]);
    }

    #[test]
    fn test_shorthand_property_is_schema() {
        let u = usages("import { Object, String } from 'runtypes';\nconst User = Object({ String });\n");
        assert_eq!(usage_of(&u, "String"), vec![Usage::Schema]);
    }

    #[test]
    fn test_export_and_typeof_are_host() {
        let u = usages(
            "import { String } from 'runtypes';\nexport { String };\ntype S = Static<typeof String>;\n",
        );
        assert_eq!(usage_of(&u, "String"), vec![Usage::Host, Usage::Host]);
    }

    #[test]
    fn test_shadowed_local_skipped() {
        let u = usages(
            "import { String } from 'runtypes';\nfunction f() {\n  const String = 1;\n  return String;\n}\nconst s = String;\n",
        );
        assert_eq!(usage_of(&u, "String"), vec![Usage::Schema]);
    }
}
