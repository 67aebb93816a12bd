//! Primitive, composite-constructor and type-reference rewrites.

use schemashift_syntax::{Expr, ExprView, TypeView, expr_view, type_view};
use tree_sitter::Node;

use crate::engine::{Outcome, Rewriter};
use crate::tables::{TypeTemplate, type_reference, type_template};

impl Rewriter<'_, '_> {
    /// Target expression for a primitive used as a plain reference.
    pub(crate) fn primitive(&self, name: &str) -> Option<Expr> {
        match type_template(name)? {
            TypeTemplate::Primitive(target) => Some(self.target_call(target, vec![])),
            TypeTemplate::Expression(build) => Some(build(&self.session.target_binding)),
            _ => None,
        }
    }

    /// A bare reference to a named import: `String` -> `z.string()`.
    pub(crate) fn rewrite_reference(&mut self, node: Node, imported: &str) -> Outcome {
        if let Some(expr) = self.primitive(imported) {
            return self.emit(&expr);
        }
        if type_template(imported).is_some() {
            self.note(
                node,
                format!("`{imported}` could not be rewritten here; manual follow-up needed"),
            );
        }
        Outcome::Descend
    }

    /// A call whose callee is a source constructor, named or qualified.
    pub(crate) fn rewrite_constructor(
        &mut self,
        node: Node,
        name: &str,
        arguments: Node,
        args: &[Node],
    ) -> Outcome {
        let Some(template) = type_template(name) else {
            return Outcome::Descend;
        };

        match template {
            TypeTemplate::Primitive(_) | TypeTemplate::Expression(_) => {
                if !args.is_empty() {
                    self.note(node, format!("`{name}` called with arguments; left unchanged"));
                    return Outcome::Opaque;
                }
                match self.primitive(name) {
                    Some(expr) => self.emit(&expr),
                    None => Outcome::Descend,
                }
            }

            TypeTemplate::Constructor(target) => {
                let args = self.arguments_source(arguments);
                self.emit(&Expr::call_source(self.target(target), args))
            }

            TypeTemplate::Variadic(target) => self.variadic(target, args),

            TypeTemplate::Union => match self.literal_values(args) {
                Some(values) => {
                    self.emit(&self.target_call("enum", vec![Expr::array(values)]))
                }
                None => self.variadic("union", args),
            },

            TypeTemplate::Optional => match args {
                [inner] => {
                    let inner = self.receiver(*inner);
                    self.emit(&Expr::method(inner, "optional", vec![]))
                }
                _ => Outcome::Descend,
            },

            TypeTemplate::Record => match args {
                [shape] => {
                    let shape = self.operand(*shape);
                    self.emit(&self.target_call("object", vec![shape]))
                }
                [key, value] => {
                    let key = self.operand(*key);
                    let value = self.operand(*value);
                    self.emit(&self.target_call("record", vec![key, value]))
                }
                _ => Outcome::Descend,
            },

            TypeTemplate::Dictionary => match args {
                [value] => {
                    let key = self.target_call("string", vec![]);
                    let value = self.operand(*value);
                    self.emit(&self.target_call("record", vec![key, value]))
                }
                [key, value] => {
                    let key = self.operand(*key);
                    let value = self.operand(*value);
                    self.emit(&self.target_call("record", vec![key, value]))
                }
                _ => Outcome::Descend,
            },

            TypeTemplate::Constraint => match args {
                [inner, predicate] => {
                    let inner = self.receiver(*inner);
                    let refined = self.refinement(node, inner, *predicate);
                    self.emit(&refined)
                }
                _ => Outcome::Descend,
            },

            TypeTemplate::Brand => match args {
                [brand, inner] => {
                    let brand = self.operand(*brand);
                    let inner = self.receiver(*inner);
                    self.emit(&Expr::method(inner, "brand", vec![brand]))
                }
                _ => Outcome::Descend,
            },
        }
    }

    /// `Tuple(A, B)` -> `z.tuple([A', B'])`, keeping argument order.
    fn variadic(&mut self, target: &str, args: &[Node]) -> Outcome {
        let items = args.iter().map(|arg| self.operand(*arg)).collect();
        self.emit(&self.target_call(target, vec![Expr::array(items)]))
    }

    /// Raw values of `Union(Literal('a'), Literal('b'))`, when every member
    /// is a string literal.
    fn literal_values(&self, args: &[Node]) -> Option<Vec<Expr>> {
        if args.is_empty() {
            return None;
        }
        args.iter()
            .map(|arg| {
                let ExprView::Call { callee, args, .. } = expr_view(*arg) else {
                    return None;
                };
                if self.schema_name(callee).as_deref() != Some("Literal") {
                    return None;
                }
                match args[..] {
                    [value] if matches!(expr_view(value), ExprView::String) => {
                        Some(Expr::verbatim(self.text(value)))
                    }
                    _ => None,
                }
            })
            .collect()
    }

    /// Source name of a type reference's head, named or qualified.
    fn type_name(&self, node: Node) -> Option<String> {
        match type_view(node) {
            TypeView::Identifier => self.session.binding(self.text(node)).map(str::to_string),
            TypeView::Nested { module, name } if self.session.is_alias(self.text(module)) => {
                Some(self.text(name).to_string())
            }
            _ => None,
        }
    }

    /// `Static<typeof T>` -> `z.infer<typeof T>`, `Runtype<X>` -> `z.ZodType<X>`.
    pub(crate) fn rewrite_generic_type(&mut self, name: Node, type_arguments: Node) -> Outcome {
        let Some(target) = self
            .type_name(name)
            .and_then(|source| type_reference(&source))
        else {
            return Outcome::Descend;
        };
        let type_arguments = self.rendered(type_arguments);
        Outcome::Replace(format!(
            "{}.{target}{type_arguments}",
            self.session.target_binding
        ))
    }

    /// A named type import used on its own.
    pub(crate) fn rewrite_type_identifier(&mut self, node: Node) -> Outcome {
        match self.session.binding(self.text(node)).map(str::to_string) {
            Some(imported) => self.residual_type(node, &imported),
            None => Outcome::Descend,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{RewriteOptions, transform};
    use std::path::Path;

    fn rewrite(source: &str) -> String {
        transform(source, Path::new("test.ts"), &RewriteOptions::default())
            .unwrap()
            .output
    }

    fn body(source: &str) -> String {
        let output = rewrite(&format!("import {{ Array, Tuple, Object, Record, Dictionary, Union, Intersect, Optional, Literal, Lazy, InstanceOf, Template, Guard, Constraint, Brand, String, Number, Boolean, BigInt, Symbol, Null, Undefined, Unknown, Void, Never, Function, Nullish, Static, Runtype }} from 'runtypes';\n{source}"));
        output
            .split_once('\n')
            .map(|(_, rest)| rest.to_string())
            .unwrap_or(output)
    }

    #[test]
    fn test_primitives() {
        insta::assert_snapshot!(body("const a = [String, Number, Boolean, BigInt, Symbol];"), @"const a = [z.string(), z.number(), z.boolean(), z.bigint(), z.symbol()];");
        insta::assert_snapshot!(body("const b = [Null, Undefined, Unknown, Void, Never, Function];"), @"const b = [z.null(), z.undefined(), z.unknown(), z.void(), z.never(), z.function()];");
        insta::assert_snapshot!(body("const n = Nullish;"), @"const n = z.union([z.null(), z.undefined()]);");
    }

    #[test]
    fn test_array_and_object() {
        insta::assert_snapshot!(body("const A = Array(String);"), @"const A = z.array(z.string());");
        insta::assert_snapshot!(
            body("const X = Object({ a: String, b: Array(Number) });"),
            @"const X = z.object({ a: z.string(), b: z.array(z.number()) });"
        );
    }

    #[test]
    fn test_variadic_call_shape() {
        insta::assert_snapshot!(body("const T = Tuple(String, Number);"), @"const T = z.tuple([z.string(), z.number()]);");
        insta::assert_snapshot!(body("const U = Union(Number, String, Boolean);"), @"const U = z.union([z.number(), z.string(), z.boolean()]);");
        insta::assert_snapshot!(body("const I = Intersect(A, B);"), @"const I = z.intersection([A, B]);");
    }

    #[test]
    fn test_literal_union_collapses_to_enum() {
        insta::assert_snapshot!(
            body("const C = Union(Literal('a'), Literal('b'), Literal('c'));"),
            @"const C = z.enum(['a', 'b', 'c']);"
        );
        insta::assert_snapshot!(
            body("const D = Union(Literal(1), Literal('b'));"),
            @"const D = z.union([z.literal(1), z.literal('b')]);"
        );
    }

    #[test]
    fn test_optional_becomes_suffix() {
        insta::assert_snapshot!(body("const O = Optional(String);"), @"const O = z.string().optional();");
        insta::assert_snapshot!(
            body("const P = Object({ name: Optional(Array(String)) });"),
            @"const P = z.object({ name: z.array(z.string()).optional() });"
        );
    }

    #[test]
    fn test_record_disambiguation() {
        insta::assert_snapshot!(body("const R = Record({ name: String });"), @"const R = z.object({ name: z.string() });");
        insta::assert_snapshot!(body("const M = Record(String, Number);"), @"const M = z.record(z.string(), z.number());");
        insta::assert_snapshot!(body("const D = Dictionary(Number);"), @"const D = z.record(z.string(), z.number());");
        insta::assert_snapshot!(body("const E = Dictionary(String, Boolean);"), @"const E = z.record(z.string(), z.boolean());");
    }

    #[test]
    fn test_structural_constructors() {
        insta::assert_snapshot!(
            body("const P = Constraint(Number, n => n > 0 || 'must be positive');"),
            @"const P = z.number().refine(n => n > 0, 'must be positive');"
        );
        insta::assert_snapshot!(body("const B = Brand('UserId', String);"), @"const B = z.string().brand('UserId');");
        insta::assert_snapshot!(body("const G = Guard(isDate);"), @"const G = z.custom(isDate);");
        insta::assert_snapshot!(body("const L = Lazy(() => Node);"), @"const L = z.lazy(() => Node);");
        insta::assert_snapshot!(body("const D = InstanceOf(Date);"), @"const D = z.instanceof(Date);");
    }

    #[test]
    fn test_unrecognized_argument_passes_through() {
        insta::assert_snapshot!(body("const A = Array(makeSchema());"), @"const A = z.array(makeSchema());");
    }

    #[test]
    fn test_type_references() {
        insta::assert_snapshot!(body("type X = Static<typeof X>;"), @"type X = z.infer<typeof X>;");
        insta::assert_snapshot!(body("let r: Runtype<string>;"), @"let r: z.ZodType<string>;");
    }
}
