//! Import removal and target-import injection.

use schemashift_syntax::{Edit, Expr, SyntaxTree, TypeScriptWriter};

use crate::imports::{ImportScan, ModuleStyle, RemovedImport};
use crate::options::RewriteOptions;
use crate::session::Session;

/// Edits that remove the source imports and, if needed, add one import of
/// the target module.
///
/// The new import goes right after the last kept import. Without one, it
/// takes the place of the first removed source import.
pub fn plan(
    tree: &SyntaxTree<'_>,
    scan: &ImportScan<'_>,
    session: &Session,
    options: &RewriteOptions,
) -> Vec<Edit> {
    let source = tree.source();
    let Some(first) = scan.removed.first() else {
        return Vec::new();
    };

    let inject = session.mutated && !session.target_import_present;
    let line = import_line(first, options);
    let mut edits = Vec::with_capacity(scan.removed.len() + 1);

    for (i, removed) in scan.removed.iter().enumerate() {
        let start = removed.node.start_byte();
        let (end, newline) = removal_end(source, removed.node.end_byte());
        if i == 0 && inject && scan.last_kept.is_none() {
            let replacement = if newline {
                format!("{line}\n")
            } else {
                line.clone()
            };
            edits.push(Edit::new(start..end, replacement));
        } else {
            edits.push(Edit::delete(start..end));
        }
    }

    if inject && let Some(kept) = scan.last_kept {
        edits.push(Edit::insert(kept.end_byte(), format!("\n{line}")));
    }

    tracing::debug!(inject, removed = scan.removed.len(), "planned import edits");
    edits
}

/// The target import statement, in the module style and quoting of `like`.
fn import_line(like: &RemovedImport<'_>, options: &RewriteOptions) -> String {
    let binding = &options.target_binding;
    let mut line = match like.style {
        ModuleStyle::Esm => {
            let module = TypeScriptWriter::emit(&Expr::string(&*options.target_module, like.quote));
            format!("import {{ {binding} }} from {module}")
        }
        ModuleStyle::CommonJs => {
            let require = Expr::call(
                Expr::ident("require"),
                vec![Expr::string(&*options.target_module, like.quote)],
            );
            format!(
                "const {{ {binding} }} = {}",
                TypeScriptWriter::emit(&require)
            )
        }
    };
    if like.semicolon {
        line.push(';');
    }
    line
}

/// End of a removed statement, extended over trailing blanks and one line
/// break. The flag reports whether a line break was consumed.
fn removal_end(source: &str, end: usize) -> (usize, bool) {
    let bytes = source.as_bytes();
    let mut end = end;
    while end < bytes.len() && matches!(bytes[end], b' ' | b'\t') {
        end += 1;
    }
    if bytes.get(end) == Some(&b'\r') && bytes.get(end + 1) == Some(&b'\n') {
        return (end + 2, true);
    }
    if bytes.get(end) == Some(&b'\n') {
        return (end + 1, true);
    }
    (end, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removal_end() {
        assert_eq!(removal_end("a;  \nb", 2), (5, true));
        assert_eq!(removal_end("a;\r\nb", 2), (4, true));
        assert_eq!(removal_end("a; b", 2), (3, false));
        assert_eq!(removal_end("a;", 2), (2, false));
    }
}
