//! Tree rendering and rewrite dispatch.
//!
//! [`Rewriter::render`] walks a subtree and returns its new text only when
//! something inside it changed. Rewritten children are spliced back into the
//! node's original text, so formatting outside a rewritten expression is
//! preserved byte for byte.
//!
//! Each node is offered to [`Rewriter::rewrite_node`] once, which answers
//! with an [`Outcome`]: replace the node, descend into its children, or
//! leave the whole subtree alone.

use schemashift_syntax::{
    Expr, ExprView, SyntaxTree, TypeScriptWriter, TypeView, expr_view, type_view, unparen,
};
use tree_sitter::Node;

use crate::builtins::{Usage, UsageTable};
use crate::session::Session;
use crate::tables::{HOST_GLOBALS, method_rule};

/// What to do with a node.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// Replace the node's text.
    Replace(String),
    /// Keep the node, render its children.
    Descend,
    /// Keep the node and everything below it.
    Opaque,
}

/// Node kinds that can take a member access without parentheses.
const PRIMARY_KINDS: &[&str] = &[
    "identifier",
    "member_expression",
    "subscript_expression",
    "call_expression",
    "parenthesized_expression",
    "non_null_expression",
    "array",
    "object",
    "string",
    "template_string",
    "number",
    "this",
    "true",
    "false",
    "null",
    "undefined",
];

pub struct Rewriter<'a, 's> {
    pub(crate) tree: &'a SyntaxTree<'s>,
    pub(crate) session: &'a mut Session,
    pub(crate) usage: &'a UsageTable,
}

impl<'a, 's> Rewriter<'a, 's> {
    pub fn new(tree: &'a SyntaxTree<'s>, session: &'a mut Session, usage: &'a UsageTable) -> Self {
        Self {
            tree,
            session,
            usage,
        }
    }

    /// New text for `node`, or `None` if nothing in it was rewritten.
    pub fn render(&mut self, node: Node) -> Option<String> {
        match self.rewrite_node(node) {
            Outcome::Replace(text) => {
                tracing::debug!(
                    line = self.tree.line(node),
                    from = self.text(node),
                    to = %text,
                    "rewrite"
                );
                self.session.mutated = true;
                Some(text)
            }
            Outcome::Descend => self.render_with(node, &[]),
            Outcome::Opaque => None,
        }
    }

    /// Render `node`'s children into its text, with `overrides` taking the
    /// place of the listed children.
    pub(crate) fn render_with(&mut self, node: Node, overrides: &[(Node, String)]) -> Option<String> {
        let base = node.start_byte();
        let source = self.text(node);

        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();

        let mut output = String::new();
        let mut position = 0;
        let mut changed = false;
        for child in children {
            let replacement = match overrides.iter().find(|(n, _)| n.id() == child.id()) {
                Some((_, text)) => Some(text.clone()),
                None => self.render(child),
            };
            let Some(replacement) = replacement else {
                continue;
            };
            let start = child.start_byte() - base;
            output.push_str(source.get(position..start).unwrap_or_default());
            output.push_str(&replacement);
            position = child.end_byte() - base;
            changed = true;
        }

        if !changed {
            return None;
        }
        output.push_str(source.get(position..).unwrap_or_default());
        Some(output)
    }

    /// Rendered text of `node`, rewritten or original.
    pub(crate) fn rendered(&mut self, node: Node) -> String {
        match self.render(node) {
            Some(text) => text,
            None => self.text(node).to_string(),
        }
    }

    pub(crate) fn text(&self, node: Node) -> &'s str {
        self.tree.text(node)
    }

    pub(crate) fn line(&self, node: Node) -> usize {
        self.tree.line(node)
    }

    pub(crate) fn note(&mut self, node: Node, message: impl Into<String>) {
        let line = self.line(node);
        self.session.note(line, message);
    }

    /// `z.<name>`
    pub(crate) fn target(&self, name: &str) -> Expr {
        Expr::member(Expr::ident(self.session.target_binding.as_str()), name)
    }

    /// `z.<name>(args...)`
    pub(crate) fn target_call(&self, name: &str, args: Vec<Expr>) -> Expr {
        Expr::call(self.target(name), args)
    }

    pub(crate) fn emit(&self, expr: &Expr) -> Outcome {
        Outcome::Replace(TypeScriptWriter::emit(expr))
    }

    /// `node`, rendered, for use as a call argument or array element.
    pub(crate) fn operand(&mut self, node: Node) -> Expr {
        Expr::verbatim(self.rendered(node))
    }

    /// `node`, rendered, for use as the receiver of a method call.
    pub(crate) fn receiver(&mut self, node: Node) -> Expr {
        let text = self.rendered(node);
        if PRIMARY_KINDS.contains(&node.kind()) {
            Expr::verbatim(text)
        } else {
            Expr::verbatim(format!("({text})"))
        }
    }

    /// Rendered contents of an `arguments` node, without the parentheses.
    pub(crate) fn arguments_source(&mut self, arguments: Node) -> String {
        let text = self.rendered(arguments);
        text.strip_prefix('(')
            .and_then(|inner| inner.strip_suffix(')'))
            .map(str::to_string)
            .unwrap_or(text)
    }

    /// Imported name of a reference to the source library that is in
    /// schema position.
    pub(crate) fn schema_name(&self, node: Node) -> Option<String> {
        if !self.usage.is_schema(node) {
            return None;
        }
        match node.kind() {
            "identifier" => self.session.binding(self.text(node)).map(str::to_string),
            "member_expression" => self
                .session
                .qualified_name(self.tree, node)
                .map(str::to_string),
            _ => None,
        }
    }

    fn rewrite_node(&mut self, node: Node) -> Outcome {
        match node.kind() {
            "import_statement" => return Outcome::Opaque,
            "shorthand_property_identifier" => return self.rewrite_shorthand(node),
            "export_specifier" => return self.rewrite_export_specifier(node),
            _ => {}
        }

        match expr_view(node) {
            ExprView::Call {
                callee,
                arguments,
                args,
            } => return self.rewrite_call(node, callee, arguments, &args),
            ExprView::Member { .. } => return self.rewrite_member(node),
            ExprView::Identifier => return self.rewrite_identifier(node),
            _ => {}
        }

        match type_view(node) {
            TypeView::Generic {
                name,
                type_arguments,
            } => self.rewrite_generic_type(name, type_arguments),
            TypeView::Nested { module, name } => self.rewrite_nested_type(node, module, name),
            TypeView::Identifier => self.rewrite_type_identifier(node),
            TypeView::Query => self.rewrite_type_query(node),
            TypeView::Other => Outcome::Descend,
        }
    }

    fn rewrite_call(
        &mut self,
        node: Node,
        callee: Node,
        arguments: Node,
        args: &[Node],
    ) -> Outcome {
        if let Some(name) = self.schema_name(callee) {
            return self.rewrite_constructor(node, &name, arguments, args);
        }

        if let ExprView::Member {
            object,
            property,
            optional: false,
        } = expr_view(callee)
            && let Some(rule) = method_rule(self.text(property))
            && self.is_method_receiver(object)
        {
            return self.rewrite_method(node, rule, callee, object, property, args);
        }

        Outcome::Descend
    }

    /// Whether a method call on `object` may be a schema method.
    fn is_method_receiver(&self, object: Node) -> bool {
        let object = unparen(object);
        if object.kind() != "identifier" {
            return true;
        }
        let name = self.text(object);
        let recorded = self.usage.get(object).is_some();
        if self.session.is_alias(name) && recorded {
            return false;
        }
        !(HOST_GLOBALS.contains(&name) && !recorded)
    }

    fn rewrite_identifier(&mut self, node: Node) -> Outcome {
        if !self.usage.is_schema(node) {
            return Outcome::Descend;
        }
        let name = self.text(node);
        if let Some(imported) = self.session.binding(name).map(str::to_string) {
            return self.rewrite_reference(node, &imported);
        }
        if self.session.is_alias(name) {
            let binding = self.session.target_binding.clone();
            self.note(
                node,
                format!("namespace `{name}` used as a value; replaced with `{binding}`"),
            );
            return Outcome::Replace(binding);
        }
        Outcome::Descend
    }

    /// `{ String }` keeps its key and takes the rewritten value.
    fn rewrite_shorthand(&mut self, node: Node) -> Outcome {
        match self.rewrite_identifier(node) {
            Outcome::Replace(value) => Outcome::Replace(format!("{}: {value}", self.text(node))),
            other => other,
        }
    }

    /// `export { String }` forwards a name the removed import no longer binds.
    fn rewrite_export_specifier(&mut self, node: Node) -> Outcome {
        let forwarded = node
            .parent()
            .and_then(|clause| clause.parent())
            .is_some_and(|stmt| stmt.child_by_field_name("source").is_some());
        if !forwarded
            && let Some(name) = node.child_by_field_name("name")
            && self.usage.get(name).is_some()
        {
            let name = self.text(name);
            self.note(
                node,
                format!("export of `{name}` refers to the removed import; export a zod schema instead"),
            );
        }
        Outcome::Opaque
    }

    /// `typeof T` is kept as written. Naming the removed import there leaves
    /// a dangling reference, so it gets a note.
    fn rewrite_type_query(&mut self, node: Node) -> Outcome {
        if self.mentions_source(node) {
            let query = self.text(node);
            self.note(
                node,
                format!("`{query}` refers to the removed import; manual follow-up needed"),
            );
        }
        Outcome::Opaque
    }

    fn mentions_source(&self, node: Node) -> bool {
        if self.usage.get(node).is_some() {
            return true;
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        children.into_iter().any(|child| self.mentions_source(child))
    }

    fn rewrite_member(&mut self, node: Node) -> Outcome {
        let Some(usage) = self.usage.get(node) else {
            return Outcome::Descend;
        };
        let Some(name) = self.session.qualified_name(self.tree, node) else {
            return Outcome::Descend;
        };
        match usage {
            Usage::Schema => self.rewrite_qualified(node, name),
            Usage::Host => self.residual_value(node, name),
        }
    }
}
