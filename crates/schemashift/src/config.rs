//! Configuration system for schemashift.
//!
//! Loads config from:
//! 1. Global: ~/.config/schemashift/config.toml
//! 2. Per-project: .schemashift/config.toml (overrides global)
//!
//! An explicit `--config` file replaces both.
//!
//! Example config.toml:
//! ```toml
//! [source]
//! modules = ["runtypes", "@acme/runtypes"]
//!
//! [target]
//! module = "zod/v4"
//! binding = "z"
//!
//! [files]
//! extensions = ["ts", "mts"]
//! exclude = ["generated/**"]
//! ```

use schemashift_rewrite::RewriteOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Extensions processed when nothing is configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "mts", "cts", "js", "mjs", "cjs"];

/// Exclude patterns applied when nothing is configured.
pub const DEFAULT_EXCLUDE: &[&str] = &["node_modules"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Source library configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SourceConfig {
    /// Module specifiers treated as the source library.
    pub modules: Option<Vec<String>>,
}

/// Target library configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TargetConfig {
    /// Module the injected import points at.
    pub module: Option<String>,
    /// Name bound by the injected import.
    pub binding: Option<String>,
}

/// File selection.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FilesConfig {
    pub extensions: Option<Vec<String>>,
    /// Gitignore-style patterns excluded from directory walks.
    pub exclude: Option<Vec<String>>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SchemashiftConfig {
    pub source: SourceConfig,
    pub target: TargetConfig,
    pub files: FilesConfig,
}

impl SchemashiftConfig {
    /// Load configuration for a project.
    ///
    /// Loads global config from ~/.config/schemashift/config.toml,
    /// then merges with per-project config from .schemashift/config.toml.
    /// Missing files are skipped; unreadable or malformed ones are errors.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path()
            && let Some(global) = Self::load_optional(&global_path)?
        {
            config = config.merge(global);
        }

        let project_path = root.join(".schemashift").join("config.toml");
        if let Some(project) = Self::load_optional(&project_path)? {
            config = config.merge(project);
        }

        Ok(config)
    }

    /// Load a single config file that must exist.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    fn load_optional(path: &Path) -> Result<Option<Self>, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::parse(path, &content).map(Some)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("schemashift").join("config.toml"))
    }

    /// Merge another config into this one; fields set in `other` win.
    fn merge(self, other: Self) -> Self {
        Self {
            source: SourceConfig {
                modules: other.source.modules.or(self.source.modules),
            },
            target: TargetConfig {
                module: other.target.module.or(self.target.module),
                binding: other.target.binding.or(self.target.binding),
            },
            files: FilesConfig {
                extensions: other.files.extensions.or(self.files.extensions),
                exclude: other.files.exclude.or(self.files.exclude),
            },
        }
    }

    /// Rewrite options with configured values over the defaults.
    pub fn rewrite_options(&self) -> RewriteOptions {
        let defaults = RewriteOptions::default();
        RewriteOptions {
            source_modules: self
                .source
                .modules
                .clone()
                .unwrap_or(defaults.source_modules),
            target_module: self
                .target
                .module
                .clone()
                .unwrap_or(defaults.target_module),
            target_binding: self
                .target
                .binding
                .clone()
                .unwrap_or(defaults.target_binding),
        }
    }

    /// Extensions to process, without leading dots.
    pub fn extensions(&self) -> Vec<String> {
        match &self.files.extensions {
            Some(extensions) => extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
            None => DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn exclude(&self) -> Vec<String> {
        match &self.files.exclude {
            Some(exclude) => exclude.clone(),
            None => DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect(),
        }
    }
}
