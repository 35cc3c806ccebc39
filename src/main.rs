//! CLI entry point for `schemalens`.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use schemalens::analyzer::analyze_schema;
use schemalens::config::{Config, OutputFormat};
use schemalens::report::build_report;
use schemalens::sql_to_schema_graph;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "schemalens",
    about = "Import SQL DDL into a relational graph and analyze it"
)]
struct Cli {
    /// Input SQL file
    input: PathBuf,

    /// SQL dialect: mysql, postgres, mssql or auto
    #[arg(short, long)]
    dialect: Option<String>,

    /// Output format: json or text
    #[arg(short, long)]
    format: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Print the schema graph instead of the analysis
    #[arg(long)]
    graph_only: bool,

    /// Exit with status 2 when the overall score is below this value
    #[arg(long)]
    fail_under: Option<u32>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| {
            eprintln!("{e}");
            process::exit(1);
        }),
        None => Config::default(),
    };
    if let Err(e) = config.apply_env_overrides() {
        eprintln!("{e}");
        process::exit(1);
    }

    if let Some(dialect) = &cli.dialect {
        config.dialect = dialect.clone();
    }
    if let Some(format) = &cli.format {
        config.format = OutputFormat::from_str(format).unwrap_or_else(|| {
            eprintln!("Invalid format: {format}");
            process::exit(1);
        });
    }
    config.pretty |= cli.pretty;
    if cli.fail_under.is_some() {
        config.fail_under = cli.fail_under;
    }
    config
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> String {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.unwrap_or_else(|e| {
        eprintln!("Failed to serialize output: {e}");
        process::exit(1);
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli);

    let sql = match std::fs::read_to_string(&cli.input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", cli.input.display());
            process::exit(1);
        }
    };

    let dialect = config.resolve_dialect(&sql).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let graph = match sql_to_schema_graph(&sql, dialect) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    if cli.graph_only {
        println!("{}", to_json(&graph, config.pretty));
        return;
    }

    let result = analyze_schema(&graph);
    match config.format {
        OutputFormat::Json => println!("{}", to_json(&result, config.pretty)),
        OutputFormat::Text => print!("{}", build_report(&result)),
    }

    if config
        .fail_under
        .is_some_and(|threshold| result.overall_score < threshold)
    {
        process::exit(2);
    }
}
