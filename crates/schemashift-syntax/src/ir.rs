//! Owned expression IR for newly constructed code.
//!
//! Rewrites build an [`Expr`] and hand it to
//! [`TypeScriptWriter`](crate::TypeScriptWriter). Sub-expressions that were
//! already rendered from the original source travel as [`Expr::Verbatim`],
//! so nothing the user wrote gets reformatted on the way through.

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    /// String literal delimited by `quote`.
    String { value: String, quote: char },
}

/// Argument list of a call.
#[derive(Debug, Clone, PartialEq)]
pub enum Args {
    /// Structured arguments, emitted `, `-separated inside parentheses.
    List(Vec<Expr>),
    /// The inner text of an existing argument list, emitted as-is.
    Source(String),
}

/// Expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Literal(Literal),
    Member { object: Box<Expr>, property: String },
    Call { callee: Box<Expr>, args: Args },
    Array(Vec<Expr>),
    /// Object literal; keys that are not identifiers get quoted on output.
    Object(Vec<(String, Expr)>),
    /// Arrow function with a verbatim parameter list.
    Arrow { params: String, body: Box<Expr> },
    /// Source fragment reproduced exactly.
    Verbatim(String),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn bool(value: bool) -> Self {
        Expr::Literal(Literal::Bool(value))
    }

    pub fn string(value: impl Into<String>, quote: char) -> Self {
        Expr::Literal(Literal::String {
            value: value.into(),
            quote,
        })
    }

    pub fn verbatim(text: impl Into<String>) -> Self {
        Expr::Verbatim(text.into())
    }

    pub fn member(object: Expr, property: impl Into<String>) -> Self {
        Expr::Member {
            object: Box::new(object),
            property: property.into(),
        }
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args: Args::List(args),
        }
    }

    /// Call whose argument list is copied from source (without parentheses).
    pub fn call_source(callee: Expr, args: impl Into<String>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args: Args::Source(args.into()),
        }
    }

    /// `receiver.method(args...)`
    pub fn method(receiver: Expr, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::call(Expr::member(receiver, method), args)
    }

    pub fn array(items: Vec<Expr>) -> Self {
        Expr::Array(items)
    }

    pub fn object(pairs: Vec<(String, Expr)>) -> Self {
        Expr::Object(pairs)
    }

    pub fn arrow(params: impl Into<String>, body: Expr) -> Self {
        Expr::Arrow {
            params: params.into(),
            body: Box::new(body),
        }
    }
}
