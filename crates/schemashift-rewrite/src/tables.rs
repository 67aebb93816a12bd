//! Static mapping tables between runtypes and zod.

use schemashift_syntax::Expr;

/// How a source constructor or primitive maps onto the target.
#[derive(Debug, Clone, Copy)]
pub enum TypeTemplate {
    /// Zero-argument target call, `z.<name>()`.
    Primitive(&'static str),
    /// Fixed target expression, built from the target binding.
    Expression(fn(&str) -> Expr),
    /// Renamed constructor; arguments pass through, `z.<name>(args)`.
    Constructor(&'static str),
    /// Positional arguments collected into one array, `z.<name>([a, b])`.
    Variadic(&'static str),
    Union,
    /// `Optional(T)` becomes the suffix `T.optional()`.
    Optional,
    /// Object with one argument, keyed map with two.
    Record,
    Dictionary,
    /// `Constraint(T, p)`, refinement on a wrapped type.
    Constraint,
    /// `Brand(name, T)`
    Brand,
}

pub const TYPE_TABLE: &[(&str, TypeTemplate)] = &[
    ("String", TypeTemplate::Primitive("string")),
    ("Number", TypeTemplate::Primitive("number")),
    ("Boolean", TypeTemplate::Primitive("boolean")),
    ("BigInt", TypeTemplate::Primitive("bigint")),
    ("Symbol", TypeTemplate::Primitive("symbol")),
    ("Null", TypeTemplate::Primitive("null")),
    ("Undefined", TypeTemplate::Primitive("undefined")),
    ("Unknown", TypeTemplate::Primitive("unknown")),
    ("Void", TypeTemplate::Primitive("void")),
    ("Never", TypeTemplate::Primitive("never")),
    ("Function", TypeTemplate::Primitive("function")),
    ("Nullish", TypeTemplate::Expression(nullish)),
    ("Array", TypeTemplate::Constructor("array")),
    ("Tuple", TypeTemplate::Variadic("tuple")),
    ("Object", TypeTemplate::Constructor("object")),
    ("Record", TypeTemplate::Record),
    ("Dictionary", TypeTemplate::Dictionary),
    ("Union", TypeTemplate::Union),
    ("Intersect", TypeTemplate::Variadic("intersection")),
    ("Optional", TypeTemplate::Optional),
    ("Literal", TypeTemplate::Constructor("literal")),
    ("Lazy", TypeTemplate::Constructor("lazy")),
    ("InstanceOf", TypeTemplate::Constructor("instanceof")),
    ("Template", TypeTemplate::Variadic("templateLiteral")),
    ("Guard", TypeTemplate::Constructor("custom")),
    ("Constraint", TypeTemplate::Constraint),
    ("Brand", TypeTemplate::Brand),
];

fn nullish(z: &str) -> Expr {
    let primitive = |name| Expr::call(Expr::member(Expr::ident(z), name), vec![]);
    Expr::call(
        Expr::member(Expr::ident(z), "union"),
        vec![Expr::array(vec![primitive("null"), primitive("undefined")])],
    )
}

pub fn type_template(name: &str) -> Option<TypeTemplate> {
    TYPE_TABLE
        .iter()
        .find(|(source, _)| *source == name)
        .map(|(_, template)| *template)
}

/// How a source instance method maps onto the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodRule {
    /// Same call shape under a new name.
    Rename(&'static str),
    /// `safeParse`, plus `.success` where the result is used as a boolean.
    SafeParse,
    /// Predicate-with-message split into `refine(predicate, message)`.
    Refine,
    /// Positional field names become a `{ name: true }` mask.
    Select,
    /// Receiver becomes the argument of a free target function.
    FreeFunction(&'static str),
    /// `a.or(b)` becomes `z.union([a, b])`.
    Combine(&'static str),
}

pub const METHOD_TABLE: &[(&str, MethodRule)] = &[
    ("check", MethodRule::Rename("parse")),
    ("parse", MethodRule::Rename("parse")),
    ("guard", MethodRule::SafeParse),
    ("withConstraint", MethodRule::Refine),
    ("withBrand", MethodRule::Rename("brand")),
    ("asReadonly", MethodRule::Rename("readonly")),
    ("pick", MethodRule::Select),
    ("omit", MethodRule::Select),
    ("extend", MethodRule::Rename("extend")),
    ("exact", MethodRule::FreeFunction("strictObject")),
    ("strict", MethodRule::FreeFunction("strictObject")),
    ("passthrough", MethodRule::FreeFunction("looseObject")),
    ("or", MethodRule::Combine("union")),
    ("and", MethodRule::Combine("intersection")),
];

pub fn method_rule(name: &str) -> Option<MethodRule> {
    METHOD_TABLE
        .iter()
        .find(|(source, _)| *source == name)
        .map(|(_, rule)| *rule)
}

/// Type-level references: `Static<typeof T>` and `Runtype<X>`.
pub const TYPE_REFERENCES: &[(&str, &str)] = &[("Static", "infer"), ("Runtype", "ZodType")];

pub fn type_reference(name: &str) -> Option<&'static str> {
    TYPE_REFERENCES
        .iter()
        .find(|(source, _)| *source == name)
        .map(|(_, target)| *target)
}

/// Source primitives whose names are also host conversion functions.
pub const HOST_CONVERSIONS: &[&str] = &["String", "Number", "Boolean", "Symbol", "BigInt"];

/// Host globals that are never schema receivers unless imported.
pub const HOST_GLOBALS: &[&str] = &[
    "JSON", "Math", "Object", "Array", "Promise", "Reflect", "console", "Date", "Number", "String",
    "Boolean", "Symbol", "BigInt",
];

/// Array methods whose callback result is consumed as a boolean.
pub const BOOLEAN_CALLBACKS: &[&str] = &[
    "filter",
    "some",
    "every",
    "find",
    "findIndex",
    "findLast",
    "findLastIndex",
];

/// Target naming for a source member with no table entry: `Match` -> `match`.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemashift_syntax::TypeScriptWriter;

    #[test]
    fn test_object_and_record_converge() {
        assert!(matches!(
            type_template("Object"),
            Some(TypeTemplate::Constructor("object"))
        ));
        assert!(matches!(type_template("Record"), Some(TypeTemplate::Record)));
        assert!(type_template("Match").is_none());
    }

    #[test]
    fn test_nullish_expression() {
        let Some(TypeTemplate::Expression(build)) = type_template("Nullish") else {
            panic!("Nullish should be an expression template");
        };
        assert_eq!(
            TypeScriptWriter::emit(&build("z")),
            "z.union([z.null(), z.undefined()])"
        );
    }

    #[test]
    fn test_method_rules() {
        assert_eq!(method_rule("check"), Some(MethodRule::Rename("parse")));
        assert_eq!(method_rule("guard"), Some(MethodRule::SafeParse));
        assert_eq!(
            method_rule("strict"),
            Some(MethodRule::FreeFunction("strictObject"))
        );
        assert_eq!(method_rule("map"), None);
        assert_eq!(method_rule("validate"), None);
        assert_eq!(method_rule("assert"), None);
    }

    #[test]
    fn test_lower_first() {
        assert_eq!(lower_first("Match"), "match");
        assert_eq!(lower_first("ValidationError"), "validationError");
        assert_eq!(lower_first(""), "");
    }
}
