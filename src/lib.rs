pub mod analyzer;
pub mod ast;
pub mod config;
pub mod error;
pub mod graph;
pub mod report;
pub mod serializer;
pub mod sql;

use wasm_bindgen::prelude::*;

use analyzer::analyze_schema;
use error::PipelineError;
use graph::SchemaGraph;
use sql::{BuiltinImporter, Dialect, DdlImporter};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Run SQL through normalization, import and graph building with the
/// built-in importer.
pub fn sql_to_schema_graph(sql: &str, dialect: Dialect) -> error::Result<SchemaGraph> {
    sql_to_schema_graph_with(&BuiltinImporter, sql, dialect)
}

/// Same as [`sql_to_schema_graph`] with a caller-supplied importer.
pub fn sql_to_schema_graph_with(
    importer: &dyn DdlImporter,
    sql: &str,
    dialect: Dialect,
) -> error::Result<SchemaGraph> {
    let intermediate = sql::import(importer, sql, dialect)?;
    let graph = graph::build(&intermediate);
    if graph.tables.is_empty() {
        return Err(PipelineError::EmptySchema);
    }
    Ok(graph)
}

/// Convert SQL DDL to a schema graph serialized as JSON
#[wasm_bindgen(js_name = "sqlToSchemaGraph")]
pub fn sql_to_schema_graph_json(sql: &str, dialect: Option<String>) -> Result<String, String> {
    let dialect = match dialect.as_deref() {
        None | Some("auto") => Dialect::detect(sql),
        Some(name) => Dialect::from_str(name)
            .ok_or_else(|| PipelineError::UnsupportedDialect(name.to_string()).to_string())?,
    };
    let graph = sql_to_schema_graph(sql, dialect).map_err(|e| e.to_string())?;
    graph.to_json().map_err(|e| e.to_string())
}

/// Analyze a JSON schema graph and return the analysis result as JSON
#[wasm_bindgen(js_name = "analyzeSchema")]
pub fn analyze_schema_json(graph_json: &str) -> Result<String, String> {
    let graph = SchemaGraph::from_json(graph_json)
        .map_err(|e| PipelineError::InvalidGraph(e).to_string())?;
    analyze_schema(&graph).to_json().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip_through_exports() {
        let graph = sql_to_schema_graph_json(
            "CREATE TABLE users (id SERIAL PRIMARY KEY, email TEXT UNIQUE NOT NULL);",
            Some("postgres".to_string()),
        )
        .unwrap();
        assert!(graph.contains(r#""name":"users""#));

        let analysis = analyze_schema_json(&graph).unwrap();
        assert!(analysis.contains(r#""overallScore""#));
        assert!(analysis.contains(r#""totalTables":1"#));
    }

    #[test]
    fn test_export_errors_are_messages() {
        assert_eq!(
            sql_to_schema_graph_json("SELECT 1;", None).unwrap_err(),
            "no tables found"
        );
        assert_eq!(
            sql_to_schema_graph_json("CREATE TABLE t (a int);", Some("oracle".to_string()))
                .unwrap_err(),
            "unsupported dialect: oracle"
        );
        assert!(
            analyze_schema_json("[1, 2]")
                .unwrap_err()
                .starts_with("invalid schema graph:")
        );
    }
}
