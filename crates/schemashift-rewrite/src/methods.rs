//! Instance-method rewrites: `check`, `guard`, `withConstraint`, `pick`,
//! `or` and friends.

use schemashift_syntax::{
    Expr, ExprView, SyntaxTree, expr_view, is_field, named_children, string_value, unparen,
};
use tree_sitter::Node;

use crate::engine::{Outcome, Rewriter};
use crate::tables::{BOOLEAN_CALLBACKS, MethodRule};

impl Rewriter<'_, '_> {
    /// `receiver.method(args)` where `method` has a table entry.
    pub(crate) fn rewrite_method(
        &mut self,
        node: Node,
        rule: MethodRule,
        callee: Node,
        object: Node,
        property: Node,
        args: &[Node],
    ) -> Outcome {
        match rule {
            MethodRule::Rename(target) => self.rename_method(node, callee, property, target),

            MethodRule::SafeParse => {
                let Outcome::Replace(call) = self.rename_method(node, callee, property, "safeParse")
                else {
                    return Outcome::Descend;
                };
                if in_boolean_position(self.tree, node) {
                    Outcome::Replace(format!("{call}.success"))
                } else {
                    Outcome::Replace(call)
                }
            }

            MethodRule::Refine => match args {
                [predicate] => {
                    let receiver = self.receiver(object);
                    let refined = self.refinement(node, receiver, *predicate);
                    self.emit(&refined)
                }
                _ => self.rename_method(node, callee, property, "refine"),
            },

            MethodRule::Select => {
                let Some(keys) = self.field_names(args) else {
                    return Outcome::Descend;
                };
                let method = self.text(property);
                let mask = keys
                    .into_iter()
                    .map(|key| (key, Expr::bool(true)))
                    .collect();
                let receiver = self.receiver(object);
                self.emit(&Expr::method(receiver, method, vec![Expr::object(mask)]))
            }

            MethodRule::FreeFunction(target) => {
                if !args.is_empty() {
                    return Outcome::Descend;
                }
                let receiver = self.operand(object);
                self.emit(&self.target_call(target, vec![receiver]))
            }

            MethodRule::Combine(target) => match args {
                [other] => {
                    let left = self.operand(object);
                    let right = self.operand(*other);
                    self.emit(&self.target_call(target, vec![Expr::array(vec![left, right])]))
                }
                _ => Outcome::Descend,
            },
        }
    }

    /// Same call with the method name swapped; receiver and arguments are
    /// rendered in place.
    fn rename_method(&mut self, node: Node, callee: Node, property: Node, target: &str) -> Outcome {
        if self.text(property) == target {
            return Outcome::Descend;
        }
        let callee_text = self
            .render_with(callee, &[(property, target.to_string())])
            .unwrap_or_else(|| self.text(callee).to_string());
        match self.render_with(node, &[(callee, callee_text)]) {
            Some(text) => Outcome::Replace(text),
            None => Outcome::Descend,
        }
    }

    /// `receiver.refine(predicate, message)` from a predicate of the form
    /// `v => test || 'message'`. Other predicates are passed through whole.
    pub(crate) fn refinement(&mut self, node: Node, receiver: Expr, predicate: Node) -> Expr {
        match split_predicate(predicate) {
            Some((params, test, message)) => {
                let params = self.text(params);
                let test = self.rendered(test);
                let message = self.rendered(message);
                Expr::method(
                    receiver,
                    "refine",
                    vec![Expr::arrow(params, Expr::verbatim(test)), Expr::verbatim(message)],
                )
            }
            None => {
                self.note(
                    node,
                    "constraint predicate does not have the form `v => test || 'message'`; \
                     check the refine call returns a boolean",
                );
                let predicate = self.operand(predicate);
                Expr::method(receiver, "refine", vec![predicate])
            }
        }
    }

    /// Field names of `pick('a', 'b')`, if every argument is a string literal.
    fn field_names(&self, args: &[Node]) -> Option<Vec<String>> {
        if args.is_empty() {
            return None;
        }
        args.iter()
            .map(|arg| match expr_view(*arg) {
                ExprView::String => string_value(self.text(*arg)),
                _ => None,
            })
            .collect()
    }
}

/// Split `v => test || 'message'` into its parameters, test and message.
pub(crate) fn split_predicate(predicate: Node) -> Option<(Node, Node, Node)> {
    let ExprView::Arrow {
        parameters,
        arity: 1,
        body,
    } = expr_view(unparen(predicate))
    else {
        return None;
    };
    let ExprView::Binary {
        left,
        operator: "||",
        right,
    } = expr_view(unparen(body))
    else {
        return None;
    };
    match expr_view(right) {
        ExprView::String | ExprView::Template => Some((parameters, left, right)),
        _ => None,
    }
}

/// Whether the value of `node` is consumed as a boolean.
pub(crate) fn in_boolean_position(tree: &SyntaxTree<'_>, node: Node) -> bool {
    let mut current = node;
    while let Some(parent) = current.parent() {
        if parent.kind() != "parenthesized_expression" {
            break;
        }
        current = parent;
    }
    let Some(parent) = current.parent() else {
        return false;
    };

    match parent.kind() {
        "if_statement" | "while_statement" | "do_statement" | "ternary_expression"
        | "for_statement" => is_field(parent, "condition", current),
        "expression_statement" => parent.parent().is_some_and(|grandparent| {
            grandparent.kind() == "for_statement" && is_field(grandparent, "condition", parent)
        }),
        "unary_expression" => matches!(
            expr_view(parent),
            ExprView::Unary { operator: "!", .. }
        ),
        "binary_expression" => matches!(
            expr_view(parent),
            ExprView::Binary {
                operator: "&&" | "||",
                ..
            }
        ),
        "arrow_function" => {
            is_field(parent, "body", current) && is_boolean_callback(tree, parent)
        }
        _ => false,
    }
}

/// Whether `arrow` is the callback of `xs.filter(...)` and similar.
fn is_boolean_callback(tree: &SyntaxTree<'_>, arrow: Node) -> bool {
    let Some(arguments) = arrow.parent().filter(|p| p.kind() == "arguments") else {
        return false;
    };
    let first = named_children(arguments).first().map(|first| first.id());
    if first != Some(arrow.id()) {
        return false;
    }
    let Some(callee) = arguments
        .parent()
        .and_then(|call| call.child_by_field_name("function"))
    else {
        return false;
    };
    match expr_view(callee) {
        ExprView::Member { property, .. } => BOOLEAN_CALLBACKS.contains(&tree.text(property)),
        _ => false,
    }
}
