//! Per-run rewrite options.

use schemashift_syntax::is_valid_identifier;

use crate::error::RewriteError;

/// Which modules count as the source library and what to emit for the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Module specifiers recognized as the source library.
    pub source_modules: Vec<String>,
    /// Module the injected import points at.
    pub target_module: String,
    /// Name bound by the injected import and used as the qualifier.
    pub target_binding: String,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            source_modules: vec!["runtypes".to_string()],
            target_module: "zod".to_string(),
            target_binding: "z".to_string(),
        }
    }
}

impl RewriteOptions {
    /// Whether `specifier` refers to one of the source modules.
    ///
    /// Matches the bare name, a sub-path (`runtypes/lib/index`), or a
    /// relative re-export whose last segment names the module
    /// (`./vendor/runtypes`, `../runtypes/index.ts`).
    pub fn is_source_module(&self, specifier: &str) -> bool {
        self.source_modules
            .iter()
            .any(|module| matches_module(specifier, module))
    }

    /// Whether `specifier` is the target module.
    pub fn is_target_module(&self, specifier: &str) -> bool {
        specifier == self.target_module
    }

    /// Reject options that could only produce broken output.
    pub fn validate(&self) -> Result<(), RewriteError> {
        if self.source_modules.iter().all(|m| m.trim().is_empty()) {
            return Err(RewriteError::Options("no source module configured".to_string()));
        }
        if self.target_module.trim().is_empty() {
            return Err(RewriteError::Options("target module is empty".to_string()));
        }
        if !is_valid_identifier(&self.target_binding) {
            return Err(RewriteError::Options(format!(
                "target binding `{}` is not a valid identifier",
                self.target_binding
            )));
        }
        Ok(())
    }
}

fn matches_module(specifier: &str, module: &str) -> bool {
    if specifier == module {
        return true;
    }
    if !specifier.starts_with('.') {
        return specifier
            .strip_prefix(module)
            .is_some_and(|rest| rest.starts_with('/'));
    }

    let mut path = specifier;
    for ext in [".d.ts", ".ts", ".mts", ".cts", ".tsx", ".js", ".mjs", ".cjs"] {
        if let Some(stripped) = path.strip_suffix(ext) {
            path = stripped;
            break;
        }
    }
    let path = path.strip_suffix("/index").unwrap_or(path);
    path.rsplit('/').next() == Some(module)
}
