//! Tree-sitter based TypeScript parsing.

use tree_sitter::{Node, Parser, Tree};

/// Error that can occur when parsing a source unit.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("tree-sitter init: {0}")]
    Language(String),

    #[error("failed to parse TypeScript")]
    Failed,

    #[error("syntax error at {line}:{column}")]
    Syntax { line: usize, column: usize },
}

/// A parsed source unit: the tree plus the text it was parsed from.
pub struct SyntaxTree<'s> {
    source: &'s str,
    tree: Tree,
}

impl<'s> SyntaxTree<'s> {
    /// Root `program` node.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// The source text this tree was parsed from.
    pub fn source(&self) -> &'s str {
        self.source
    }

    /// Source text covered by `node`.
    pub fn text(&self, node: Node) -> &'s str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// 1-based line on which `node` starts.
    pub fn line(&self, node: Node) -> usize {
        node.start_position().row + 1
    }
}

/// Parse TypeScript (or plain JavaScript) source.
///
/// Trees containing error or missing nodes are rejected: the rewrite engine
/// only ever sees well-formed units.
pub fn parse(source: &str) -> Result<SyntaxTree<'_>, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_typescript::language().into())
        .map_err(|e| ParseError::Language(e.to_string()))?;

    let tree = parser.parse(source, None).ok_or(ParseError::Failed)?;

    let root = tree.root_node();
    if root.has_error() {
        let position = first_error(root).start_position();
        return Err(ParseError::Syntax {
            line: position.row + 1,
            column: position.column + 1,
        });
    }

    Ok(SyntaxTree { source, tree })
}

/// Innermost error (or missing) node below `node`.
fn first_error(node: Node) -> Node {
    if node.is_error() || node.is_missing() {
        return node;
    }
    let mut cursor = node.walk();
    let child = node
        .children(&mut cursor)
        .find(|c| c.has_error() || c.is_missing());
    match child {
        Some(child) => first_error(child),
        None => node,
    }
}
