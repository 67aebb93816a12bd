//! Namespace-qualified references (`t.String`, `t.Static<...>`) and the
//! residual cleanup for qualified fragments no structural rule handled.

use tree_sitter::Node;

use crate::engine::{Outcome, Rewriter};
use crate::tables::{TypeTemplate, lower_first, type_template};

impl Rewriter<'_, '_> {
    /// `t.X` outside any call or method shape.
    pub(crate) fn rewrite_qualified(&mut self, node: Node, name: &str) -> Outcome {
        match self.primitive(name) {
            Some(expr) => self.emit(&expr),
            None => self.residual_value(node, name),
        }
    }

    /// Backstop for a qualified value the structural rules left behind:
    /// swap the qualifier so no reference to the removed import survives.
    pub(crate) fn residual_value(&mut self, node: Node, name: &str) -> Outcome {
        let target = match type_template(name) {
            Some(
                TypeTemplate::Primitive(target)
                | TypeTemplate::Constructor(target)
                | TypeTemplate::Variadic(target),
            ) => target.to_string(),
            Some(TypeTemplate::Union) => "union".to_string(),
            Some(TypeTemplate::Optional) => "optional".to_string(),
            Some(TypeTemplate::Record | TypeTemplate::Dictionary) => "record".to_string(),
            _ => lower_first(name),
        };
        let replacement = format!("{}.{target}", self.session.target_binding);
        self.note(
            node,
            format!(
                "`{}` has no structural rewrite; replaced with `{replacement}`, verify manually",
                self.text(node)
            ),
        );
        Outcome::Replace(replacement)
    }

    /// `t.X` in type position, outside `t.Static<...>` / `t.Runtype<...>`.
    pub(crate) fn rewrite_nested_type(&mut self, node: Node, module: Node, name: Node) -> Outcome {
        if module.kind() != "identifier" || !self.session.is_alias(self.text(module)) {
            return Outcome::Descend;
        }
        let name = self.text(name);
        self.residual_type(node, name)
    }

    /// A source type with no generic rewrite: `Runtype` -> `z.ZodType`,
    /// anything else to the matching `z.Zod*` type with a note.
    pub(crate) fn residual_type(&mut self, node: Node, name: &str) -> Outcome {
        let binding = &self.session.target_binding;
        if name == "Runtype" {
            return Outcome::Replace(format!("{binding}.ZodType"));
        }
        let replacement = format!("{binding}.Zod{name}");
        self.note(
            node,
            format!(
                "type `{}` replaced with `{replacement}`, verify manually",
                self.text(node)
            ),
        );
        Outcome::Replace(replacement)
    }
}

#[cfg(test)]
mod tests {
    use crate::{RewriteOptions, Transformed, transform};
    use std::path::Path;

    fn rewrite(source: &str) -> Transformed {
        transform(source, Path::new("test.ts"), &RewriteOptions::default()).unwrap()
    }

    #[test]
    fn test_qualified_constructor_with_qualified_argument() {
        let result = rewrite("import * as t from 'runtypes';\nconst A = t.Array(t.String);\n");
        insta::assert_snapshot!(result.output, @r"
        import { z } from 'zod';
        const A = z.array(z.string());
        ");
        assert!(result.notes.is_empty());
    }

    #[test]
    fn test_qualified_method_chain() {
        let result = rewrite(
            "import * as t from 'runtypes';\nif (t.String.guard(input)) {\n  use(input);\n}\nconst n = t.Number.check(x);\n",
        );
        insta::assert_snapshot!(result.output, @r"
        import { z } from 'zod';
        if (z.string().safeParse(input).success) {
          use(input);
        }
        const n = z.number().parse(x);
        ");
    }

    #[test]
    fn test_qualified_static_type() {
        let result = rewrite(
            "import * as t from 'runtypes';\nconst User = t.Object({ id: t.Number });\ntype User = t.Static<typeof User>;\nlet r: t.Runtype<User>;\n",
        );
        insta::assert_snapshot!(result.output, @r"
        import { z } from 'zod';
        const User = z.object({ id: z.number() });
        type User = z.infer<typeof User>;
        let r: z.ZodType<User>;
        ");
    }

    #[test]
    fn test_residual_fragment_cleaned_up() {
        let result = rewrite("import * as t from 'runtypes';\nconst m = t.Match;\nlet s: t.String;\n");
        insta::assert_snapshot!(result.output, @r"
        import { z } from 'zod';
        const m = z.match;
        let s: z.ZodString;
        ");
        assert_eq!(result.notes.len(), 2);
        assert_eq!(result.notes[0].line, 2);
        assert_eq!(result.notes[1].line, 3);
    }

    #[test]
    fn test_default_import_is_namespace() {
        let result = rewrite("import rt from 'runtypes';\nconst A = rt.Union(rt.String, rt.Null);\n");
        insta::assert_snapshot!(result.output, @r"
        import { z } from 'zod';
        const A = z.union([z.string(), z.null()]);
        ");
    }

    #[test]
    fn test_shadowed_alias_untouched() {
        let result = rewrite(
            "import * as t from 'runtypes';\nconst S = t.String;\nconst ids = items.map(t => t.id);\n",
        );
        insta::assert_snapshot!(result.output, @r"
        import { z } from 'zod';
        const S = z.string();
        const ids = items.map(t => t.id);
        ");
    }
}
