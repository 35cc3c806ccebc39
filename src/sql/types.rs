//! SQL to intermediate type mapping.
//!
//! Intermediate types are lower-case and never contain whitespace, so the graph
//! builder can split a field line on spaces. Length/precision arguments are kept
//! for the types whose size matters downstream.

use super::Dialect;

/// Map a raw SQL column type to its intermediate spelling.
pub fn map_type(sql_type: &str, dialect: Dialect) -> String {
    let lower = sql_type.trim().to_lowercase();
    let (without_array, is_array) = match lower.strip_suffix("[]") {
        Some(inner) => (inner.trim_end(), true),
        None => (lower.as_str(), false),
    };
    let (base, args) = match without_array.find('(') {
        Some(idx) => (
            without_array[..idx].trim(),
            normalize_args(&without_array[idx..]),
        ),
        None => (without_array, String::new()),
    };
    // `timestamp(3) with time zone` keeps words after the argument list
    let trailing = without_array
        .rfind(')')
        .map(|idx| without_array[idx + 1..].trim())
        .unwrap_or("");
    let base = if trailing.is_empty() {
        base.to_string()
    } else {
        format!("{base} {trailing}")
    };

    let mapped = match dialect {
        Dialect::MySql => map_mysql_type(&base, &args),
        Dialect::Postgres => map_postgres_type(&base),
        Dialect::MsSql => map_mssql_type(&base),
    }
    .map(str::to_string)
    .unwrap_or_else(|| map_generic_type(&base));

    let mut out = if keeps_args(&mapped) { mapped + &args } else { mapped };
    if is_array {
        out.push_str("[]");
    }
    out
}

fn normalize_args(args: &str) -> String {
    args.chars().filter(|c| !c.is_whitespace()).collect()
}

fn keeps_args(mapped: &str) -> bool {
    matches!(mapped, "varchar" | "char" | "decimal" | "varbinary" | "binary")
}

fn map_mysql_type(base: &str, args: &str) -> Option<&'static str> {
    Some(match base {
        // TINYINT(1) is the MySQL boolean
        "tinyint" if args == "(1)" => "boolean",
        "tinyint" => "smallint",
        "mediumint" => "integer",
        "double" => "double",
        "tinytext" | "mediumtext" | "longtext" => "text",
        "blob" | "longblob" | "mediumblob" | "tinyblob" => "blob",
        "enum" | "set" => "enum",
        "year" => "smallint",
        _ => return None,
    })
}

fn map_postgres_type(base: &str) -> Option<&'static str> {
    Some(match base {
        "serial" | "serial4" => "integer",
        "bigserial" | "serial8" => "bigint",
        "smallserial" | "serial2" => "smallint",
        "bytea" => "bytea",
        "jsonb" => "jsonb",
        "bpchar" => "char",
        "timestamptz" | "timestamp with time zone" => "timestamptz",
        "timetz" | "time with time zone" => "time",
        "inet" | "cidr" | "macaddr" => "inet",
        _ => return None,
    })
}

fn map_mssql_type(base: &str) -> Option<&'static str> {
    Some(match base {
        "bit" => "boolean",
        "nvarchar" => "varchar",
        "nchar" => "char",
        "ntext" => "text",
        "datetime2" | "smalldatetime" | "datetimeoffset" => "timestamp",
        "uniqueidentifier" => "uuid",
        "image" => "varbinary",
        "smallmoney" => "money",
        "tinyint" => "smallint",
        _ => return None,
    })
}

fn map_generic_type(base: &str) -> String {
    match base {
        "int" | "int4" | "integer" => "integer".to_string(),
        "bigint" | "int8" => "bigint".to_string(),
        "smallint" | "int2" => "smallint".to_string(),
        "real" | "float4" => "real".to_string(),
        "float" => "float".to_string(),
        "double precision" | "float8" | "double" => "double".to_string(),
        "decimal" | "numeric" | "dec" => "decimal".to_string(),
        "money" => "money".to_string(),
        "varchar" | "character varying" | "varchar2" => "varchar".to_string(),
        "char" | "character" => "char".to_string(),
        "text" | "clob" => "text".to_string(),
        "timestamp" | "datetime" | "timestamp without time zone" => "timestamp".to_string(),
        "date" => "date".to_string(),
        "time" | "time without time zone" => "time".to_string(),
        "interval" => "interval".to_string(),
        "boolean" | "bool" => "boolean".to_string(),
        "blob" => "blob".to_string(),
        "binary" | "varbinary" => "varbinary".to_string(),
        "uuid" => "uuid".to_string(),
        "json" => "json".to_string(),
        "xml" => "xml".to_string(),
        // Default: keep original, glued so it stays a single word
        other => other.split_whitespace().collect::<Vec<_>>().join("_"),
    }
}
