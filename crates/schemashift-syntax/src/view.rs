//! Typed views over tree-sitter nodes.
//!
//! The rewrite engine never branches on raw kind strings scattered through
//! its passes. It asks for an [`ExprView`] or [`TypeView`] and matches on
//! that; every shape it does not model lands in the `Other` arm.

use tree_sitter::Node;

/// Expression-level shape of a node.
#[derive(Debug, Clone)]
pub enum ExprView<'t> {
    /// Bare identifier reference.
    Identifier,
    /// `object.property` (or `object?.property`).
    Member {
        object: Node<'t>,
        property: Node<'t>,
        optional: bool,
    },
    /// `callee(args...)`. `arguments` is the parenthesized list node.
    Call {
        callee: Node<'t>,
        arguments: Node<'t>,
        args: Vec<Node<'t>>,
    },
    /// `[a, b, ...]`
    Array(Vec<Node<'t>>),
    /// `{ ... }` with its members (pairs, shorthands, spreads, methods).
    Object(Vec<Node<'t>>),
    /// Single- or double-quoted string literal.
    String,
    /// Backtick template literal.
    Template,
    Number,
    /// `true`, `false`, `null`, `undefined`.
    Keyword,
    /// `params => body`. `parameters` is either a lone identifier or the
    /// parenthesized parameter list.
    Arrow {
        parameters: Node<'t>,
        arity: usize,
        body: Node<'t>,
    },
    Binary {
        left: Node<'t>,
        operator: &'static str,
        right: Node<'t>,
    },
    Unary {
        operator: &'static str,
        argument: Node<'t>,
    },
    Paren(Node<'t>),
    Other,
}

/// Type-level shape of a node.
#[derive(Debug, Clone)]
pub enum TypeView<'t> {
    /// `Name<Args>` where `name` is a type identifier or a nested one.
    Generic {
        name: Node<'t>,
        type_arguments: Node<'t>,
    },
    /// `module.Name` in type position.
    Nested { module: Node<'t>, name: Node<'t> },
    /// Plain type identifier.
    Identifier,
    /// `typeof value`
    Query,
    Other,
}

/// Classify an expression node.
pub fn expr_view(node: Node<'_>) -> ExprView<'_> {
    match node.kind() {
        "identifier" => ExprView::Identifier,

        "member_expression" => {
            match (
                node.child_by_field_name("object"),
                node.child_by_field_name("property"),
            ) {
                (Some(object), Some(property)) => {
                    let mut cursor = node.walk();
                    let optional = node
                        .children(&mut cursor)
                        .any(|c| c.kind() == "optional_chain");
                    ExprView::Member {
                        object,
                        property,
                        optional,
                    }
                }
                _ => ExprView::Other,
            }
        }

        "call_expression" => {
            match (
                node.child_by_field_name("function"),
                node.child_by_field_name("arguments"),
            ) {
                // Tagged templates carry a template string instead of an argument list.
                (Some(callee), Some(arguments)) if arguments.kind() == "arguments" => {
                    ExprView::Call {
                        callee,
                        arguments,
                        args: named_children(arguments),
                    }
                }
                _ => ExprView::Other,
            }
        }

        "array" => ExprView::Array(named_children(node)),
        "object" => ExprView::Object(named_children(node)),
        "string" => ExprView::String,
        "template_string" => ExprView::Template,
        "number" => ExprView::Number,
        "true" | "false" | "null" | "undefined" => ExprView::Keyword,

        "arrow_function" => {
            let body = node.child_by_field_name("body");
            if let Some(param) = node.child_by_field_name("parameter") {
                return match body {
                    Some(body) => ExprView::Arrow {
                        parameters: param,
                        arity: 1,
                        body,
                    },
                    None => ExprView::Other,
                };
            }
            match (node.child_by_field_name("parameters"), body) {
                (Some(parameters), Some(body)) => ExprView::Arrow {
                    parameters,
                    arity: named_children(parameters).len(),
                    body,
                },
                _ => ExprView::Other,
            }
        }

        "binary_expression" => match (
            node.child_by_field_name("left"),
            node.child_by_field_name("operator"),
            node.child_by_field_name("right"),
        ) {
            (Some(left), Some(operator), Some(right)) => ExprView::Binary {
                left,
                operator: operator.kind(),
                right,
            },
            _ => ExprView::Other,
        },

        "unary_expression" => match (
            node.child_by_field_name("operator"),
            node.child_by_field_name("argument"),
        ) {
            (Some(operator), Some(argument)) => ExprView::Unary {
                operator: operator.kind(),
                argument,
            },
            _ => ExprView::Other,
        },

        "parenthesized_expression" => match named_children(node).as_slice() {
            [inner] => ExprView::Paren(*inner),
            _ => ExprView::Other,
        },

        _ => ExprView::Other,
    }
}

/// Classify a type node.
pub fn type_view(node: Node<'_>) -> TypeView<'_> {
    match node.kind() {
        "generic_type" => match (
            node.child_by_field_name("name"),
            node.child_by_field_name("type_arguments"),
        ) {
            (Some(name), Some(type_arguments)) => TypeView::Generic {
                name,
                type_arguments,
            },
            _ => TypeView::Other,
        },
        "nested_type_identifier" => match (
            node.child_by_field_name("module"),
            node.child_by_field_name("name"),
        ) {
            (Some(module), Some(name)) => TypeView::Nested { module, name },
            _ => TypeView::Other,
        },
        "type_identifier" => TypeView::Identifier,
        "type_query" => TypeView::Query,
        _ => TypeView::Other,
    }
}

/// Named children of `node`, skipping comments.
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

/// Whether `child` sits in `parent`'s `field` slot.
pub fn is_field(parent: Node, field: &str, child: Node) -> bool {
    parent
        .child_by_field_name(field)
        .is_some_and(|n| n.id() == child.id())
}

/// Strip any number of enclosing parentheses.
pub fn unparen(mut node: Node<'_>) -> Node<'_> {
    while let ExprView::Paren(inner) = expr_view(node) {
        node = inner;
    }
    node
}

/// Contents of a quoted string literal, without its delimiters.
pub fn unquote(text: &str) -> Option<&str> {
    let first = text.chars().next()?;
    if !matches!(first, '"' | '\'' | '`') || text.len() < 2 || !text.ends_with(first) {
        return None;
    }
    Some(&text[1..text.len() - 1])
}

/// Value of a string literal, with escape sequences decoded.
///
/// `None` for text that is not a quoted literal, for templates with
/// substitutions and for escapes that do not name a Unicode scalar value.
pub fn string_value(text: &str) -> Option<String> {
    let body = unquote(text)?;
    if text.starts_with('`') && body.contains("${") {
        return None;
    }

    let mut value = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next()? {
            'n' => value.push('\n'),
            'r' => value.push('\r'),
            't' => value.push('\t'),
            'b' => value.push('\u{8}'),
            'f' => value.push('\u{c}'),
            'v' => value.push('\u{b}'),
            '0' => value.push('\0'),
            // Line continuation.
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                chars.next_if_eq(&'\n');
            }
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                value.push(hex_char(&hex, 2)?);
            }
            'u' if chars.next_if_eq(&'{').is_some() => {
                let hex: String = chars.by_ref().take_while(|c| *c != '}').collect();
                value.push(hex_char(&hex, hex.len().max(1))?);
            }
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                value.push(hex_char(&hex, 4)?);
            }
            other => value.push(other),
        }
    }
    Some(value)
}

fn hex_char(hex: &str, len: usize) -> Option<char> {
    if hex.len() != len {
        return None;
    }
    char::from_u32(u32::from_str_radix(hex, 16).ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    /// First node of `kind` in document order.
    fn find<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
        if node.kind() == kind {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        children.into_iter().find_map(|c| find(c, kind))
    }

    #[test]
    fn test_call_view() {
        let tree = parse("Union(A, /* b */ B);").unwrap();
        let call = find(tree.root(), "call_expression").unwrap();
        match expr_view(call) {
            ExprView::Call { callee, args, .. } => {
                assert_eq!(tree.text(callee), "Union");
                assert_eq!(args.len(), 2);
                assert_eq!(tree.text(args[1]), "B");
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn test_member_view() {
        let tree = parse("t.String.check(x);").unwrap();
        let call = find(tree.root(), "call_expression").unwrap();
        let ExprView::Call { callee, .. } = expr_view(call) else {
            panic!("expected call");
        };
        match expr_view(callee) {
            ExprView::Member {
                object,
                property,
                optional,
            } => {
                assert_eq!(tree.text(object), "t.String");
                assert_eq!(tree.text(property), "check");
                assert!(!optional);
            }
            other => panic!("expected member, got {other:?}"),
        }
    }

    #[test]
    fn test_arrow_view() {
        let tree = parse("const f = v => v > 0 || 'neg';").unwrap();
        let arrow = find(tree.root(), "arrow_function").unwrap();
        match expr_view(arrow) {
            ExprView::Arrow {
                parameters,
                arity,
                body,
            } => {
                assert_eq!(tree.text(parameters), "v");
                assert_eq!(arity, 1);
                match expr_view(body) {
                    ExprView::Binary { operator, .. } => assert_eq!(operator, "||"),
                    other => panic!("expected binary, got {other:?}"),
                }
            }
            other => panic!("expected arrow, got {other:?}"),
        }
    }

    #[test]
    fn test_parenthesized_arrow_params() {
        let tree = parse("const f = (a, b) => a;").unwrap();
        let arrow = find(tree.root(), "arrow_function").unwrap();
        match expr_view(arrow) {
            ExprView::Arrow { arity, .. } => assert_eq!(arity, 2),
            other => panic!("expected arrow, got {other:?}"),
        }
    }

    #[test]
    fn test_generic_type_view() {
        let tree = parse("type A = t.Static<typeof B>;").unwrap();
        let generic = find(tree.root(), "generic_type").unwrap();
        match type_view(generic) {
            TypeView::Generic { name, .. } => match type_view(name) {
                TypeView::Nested { module, name } => {
                    assert_eq!(tree.text(module), "t");
                    assert_eq!(tree.text(name), "Static");
                }
                other => panic!("expected nested type, got {other:?}"),
            },
            other => panic!("expected generic, got {other:?}"),
        }
    }

    #[test]
    fn test_unparen() {
        let tree = parse("const x = ((y));").unwrap();
        let paren = find(tree.root(), "parenthesized_expression").unwrap();
        assert_eq!(tree.text(unparen(paren)), "y");
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'abc'"), Some("abc"));
        assert_eq!(unquote("\"a b\""), Some("a b"));
        assert_eq!(unquote("abc"), None);
        assert_eq!(unquote("'"), None);
    }

    #[test]
    fn test_string_value_decodes_escapes() {
        assert_eq!(string_value(r"'it\'s'").as_deref(), Some("it's"));
        assert_eq!(string_value(r#""a\"b""#).as_deref(), Some("a\"b"));
        assert_eq!(string_value(r"'back\\slash'").as_deref(), Some("back\\slash"));
        assert_eq!(string_value(r"'tab\there'").as_deref(), Some("tab\there"));
        assert_eq!(string_value(r"'\x41\u0042\u{43}'").as_deref(), Some("ABC"));
        assert_eq!(string_value("'line\\\ncontinued'").as_deref(), Some("linecontinued"));
        assert_eq!(string_value("`plain`").as_deref(), Some("plain"));
    }

    #[test]
    fn test_string_value_rejects() {
        assert_eq!(string_value("name"), None);
        assert_eq!(string_value("`a${b}`"), None);
        assert_eq!(string_value(r"'\u12'"), None);
        assert_eq!(string_value(r"'\uD800'"), None);
    }
}
