use crate::sql::{Dialect, ImportError};
use thiserror::Error;

/// Errors surfaced by the SQL to schema graph pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Both the first import attempt and the cleanup retry failed.
    #[error("invalid SQL syntax for {dialect} dialect: {source}")]
    InvalidSchemaSyntax {
        dialect: Dialect,
        #[source]
        source: ImportError,
    },
    #[error("no tables found")]
    EmptySchema,
    #[error("unsupported dialect: {0}")]
    UnsupportedDialect(String),
    /// Caller-supplied graph JSON could not be decoded.
    #[error("invalid schema graph: {0}")]
    InvalidGraph(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
