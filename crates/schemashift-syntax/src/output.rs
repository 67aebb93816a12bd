//! TypeScript writer for the expression IR.
//!
//! Emits [`Expr`] trees as single-line TypeScript source.

use crate::ir::*;

/// Emits IR as TypeScript source code.
pub struct TypeScriptWriter {
    output: String,
}

impl TypeScriptWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    /// Emit an expression to TypeScript source.
    pub fn emit(expr: &Expr) -> String {
        let mut writer = Self::new();
        writer.write_expr(expr);
        writer.output
    }

    fn write_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => self.output.push_str(name),

            Expr::Literal(lit) => self.write_literal(lit),

            Expr::Verbatim(text) => self.output.push_str(text),

            Expr::Member { object, property } => {
                // An arrow receiver has to be parenthesized to take a member.
                if matches!(object.as_ref(), Expr::Arrow { .. }) {
                    self.output.push('(');
                    self.write_expr(object);
                    self.output.push(')');
                } else {
                    self.write_expr(object);
                }
                self.output.push('.');
                self.output.push_str(property);
            }

            Expr::Call { callee, args } => {
                self.write_expr(callee);
                self.output.push('(');
                match args {
                    Args::List(items) => self.write_list(items),
                    Args::Source(text) => self.output.push_str(text),
                }
                self.output.push(')');
            }

            Expr::Array(items) => {
                self.output.push('[');
                self.write_list(items);
                self.output.push(']');
            }

            Expr::Object(pairs) => {
                if pairs.is_empty() {
                    self.output.push_str("{}");
                    return;
                }
                self.output.push_str("{ ");
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    if is_valid_identifier(key) {
                        self.output.push_str(key);
                    } else {
                        self.write_quoted(key, '"');
                    }
                    self.output.push_str(": ");
                    self.write_expr(value);
                }
                self.output.push_str(" }");
            }

            Expr::Arrow { params, body } => {
                self.output.push_str(params);
                self.output.push_str(" => ");
                // Object bodies would otherwise parse as a block.
                if matches!(body.as_ref(), Expr::Object(_)) {
                    self.output.push('(');
                    self.write_expr(body);
                    self.output.push(')');
                } else {
                    self.write_expr(body);
                }
            }
        }
    }

    fn write_list(&mut self, items: &[Expr]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.write_expr(item);
        }
    }

    fn write_literal(&mut self, lit: &Literal) {
        match lit {
            Literal::Bool(true) => self.output.push_str("true"),
            Literal::Bool(false) => self.output.push_str("false"),
            Literal::String { value, quote } => self.write_quoted(value, *quote),
        }
    }

    fn write_quoted(&mut self, value: &str, quote: char) {
        self.output.push(quote);
        self.output.push_str(&escape_string(value, quote));
        self.output.push(quote);
    }
}

impl Default for TypeScriptWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_string(s: &str, quote: char) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c == quote => {
                escaped.push('\\');
                escaped.push(c);
            }
            c => escaped.push(c),
        }
    }
    escaped
}

/// Whether `s` can be written as a bare identifier (or object key).
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_alphabetic() && first != '_' && first != '$' {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
