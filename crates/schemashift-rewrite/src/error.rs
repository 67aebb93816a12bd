use schemashift_syntax::{EditError, ParseError};

/// Error that can occur while transforming a source unit.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to apply rewrites: {0}")]
    Edit(#[from] EditError),

    #[error("invalid rewrite options: {0}")]
    Options(String),
}
