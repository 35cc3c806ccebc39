//! Import boundary between raw SQL and the intermediate schema text.

use super::Dialect;
use super::normalize::{aggressive_cleanup, normalize};
use super::parser::{SqlParseError, parse_sql};
use crate::error::PipelineError;
use crate::serializer::serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Parse(#[from] SqlParseError),
    /// Failure reported by a third-party importer.
    #[error("{0}")]
    Rejected(String),
}

/// Converts DDL text into the line-oriented intermediate schema text.
///
/// Implementations must emit `Table`, field and `Ref:` lines in the grammar
/// understood by [`crate::graph::build`].
pub trait DdlImporter {
    fn parse_ddl(&self, sql: &str, dialect: Dialect) -> Result<String, ImportError>;
}

/// Importer backed by the crate's own DDL parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinImporter;

impl DdlImporter for BuiltinImporter {
    fn parse_ddl(&self, sql: &str, dialect: Dialect) -> Result<String, ImportError> {
        let schema = parse_sql(sql, dialect)?;
        Ok(serialize(&schema))
    }
}

/// Normalize `sql` and import it, retrying once after an aggressive cleanup.
pub fn import(
    importer: &dyn DdlImporter,
    sql: &str,
    dialect: Dialect,
) -> Result<String, PipelineError> {
    let normalized = normalize(sql, dialect);
    match importer.parse_ddl(&normalized, dialect) {
        Ok(text) => Ok(text),
        Err(first) => {
            warn!(%dialect, error = %first, "import failed, retrying after aggressive cleanup");
            let cleaned = aggressive_cleanup(&normalized);
            importer.parse_ddl(&cleaned, dialect).map_err(|source| {
                debug!(%dialect, error = %source, "retry failed");
                PipelineError::InvalidSchemaSyntax { dialect, source }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Fails a fixed number of times before succeeding, recording its inputs.
    struct Flaky {
        failures: Cell<usize>,
        calls: Cell<usize>,
    }

    impl Flaky {
        fn new(failures: usize) -> Self {
            Self {
                failures: Cell::new(failures),
                calls: Cell::new(0),
            }
        }
    }

    impl DdlImporter for Flaky {
        fn parse_ddl(&self, _sql: &str, _dialect: Dialect) -> Result<String, ImportError> {
            self.calls.set(self.calls.get() + 1);
            if self.failures.get() > 0 {
                self.failures.set(self.failures.get() - 1);
                return Err(ImportError::Rejected("boom".to_string()));
            }
            Ok("Table \"t\" {\n}\n".to_string())
        }
    }

    #[test]
    fn test_builtin_importer_emits_tables() {
        let text = import(
            &BuiltinImporter,
            "CREATE TABLE users (id SERIAL PRIMARY KEY);",
            Dialect::Postgres,
        )
        .unwrap();
        assert!(text.starts_with("Table \"users\" {\n  \"id\" integer [pk, increment]"));
    }

    #[test]
    fn test_single_retry_recovers() {
        let importer = Flaky::new(1);
        assert!(import(&importer, "CREATE TABLE t (a int);", Dialect::Postgres).is_ok());
        assert_eq!(importer.calls.get(), 2);
    }

    #[test]
    fn test_second_failure_is_reported_with_dialect() {
        let importer = Flaky::new(5);
        let err = import(&importer, "CREATE TABLE t (a int);", Dialect::MySql).unwrap_err();
        assert_eq!(importer.calls.get(), 2);
        assert_eq!(err.to_string(), "invalid SQL syntax for mysql dialect: boom");
    }

    #[test]
    fn test_aggressive_cleanup_rescues_builtin_parse() {
        // The trailing comma survives normalization for postgres but not the cleanup pass
        let sql = "CREATE TABLE t (id int, name text, );";
        let text = import(&BuiltinImporter, sql, Dialect::Postgres).unwrap();
        assert!(text.contains("\"name\" text"));
    }
}
