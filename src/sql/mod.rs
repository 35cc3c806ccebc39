//! SQL dump to intermediate schema text.

mod dialect;
mod importer;
mod lexer;
mod normalize;
mod parser;
mod types;

pub use dialect::Dialect;
pub use importer::{BuiltinImporter, DdlImporter, ImportError, import};
pub use normalize::{aggressive_cleanup, normalize};
pub use parser::{SqlParseError, parse_sql};
