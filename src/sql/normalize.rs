//! Dialect normalization: rewrite dialect-specific DDL into the portable subset
//! understood by the importer.
//!
//! Every rule is a plain `(pattern, replacement)` pair applied in table order.
//! Rules never re-trigger themselves, so `normalize` is idempotent.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::Dialect;

struct Rewrite {
    pattern: Regex,
    replacement: &'static str,
}

impl Rewrite {
    fn apply(&self, sql: &str) -> String {
        self.pattern.replace_all(sql, self.replacement).into_owned()
    }
}

fn compile(rules: &[(&'static str, &'static str)]) -> Vec<Rewrite> {
    rules
        .iter()
        .map(|(pattern, replacement)| Rewrite {
            pattern: Regex::new(pattern).expect("valid rewrite pattern"),
            replacement,
        })
        .collect()
}

fn apply_all(sql: &str, rules: &[Rewrite]) -> String {
    rules
        .iter()
        .fold(sql.to_string(), |acc, rule| rule.apply(&acc))
}

/// Comments go first, whitespace collapsing would otherwise glue a `--` comment
/// onto the following statement. Quoted literals and identifiers are matched
/// as whole alternatives so comment markers inside them survive.
static COMMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"'(?:[^'\\]|\\.|'')*'",
        r#"|"[^"]*""#,
        r"|`[^`]*`",
        r"|(?s:/\*.*?\*/)",
        r"|--[^\n]*",
        r"|(?m:^[ \t]*#[^\n]*)",
    ))
    .expect("valid comment pattern")
});

fn strip_comments(sql: &str) -> String {
    COMMENTS
        .replace_all(sql, |caps: &regex::Captures<'_>| {
            let matched = &caps[0];
            if matched.starts_with(['\'', '"', '`']) {
                matched.to_string()
            } else if matched.starts_with("/*") {
                " ".to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

const NAME: &str = r#"(?:"[^"]*"|[\w$]+)"#;
const COLUMN_LIST: &str = r"\((?:[^()]|\([^()]*\))*\)";
const FK_ACTION: &str =
    r"(?:\s+ON\s+(?:DELETE|UPDATE)\s+(?:SET\s+NULL|SET\s+DEFAULT|NO\s+ACTION|CASCADE|RESTRICT))*";

static MYSQL: LazyLock<Vec<Rewrite>> = LazyLock::new(|| {
    let prefixed_table = format!(
        r"(?i)\b(CREATE\s+TABLE(?:\s+IF\s+NOT\s+EXISTS)?|REFERENCES|ALTER\s+TABLE|INSERT\s+INTO)\s+{NAME}\.({NAME})"
    );
    let index = format!(
        r"(?i),\s*(?:UNIQUE\s+|FULLTEXT\s+|SPATIAL\s+)?(?:KEY|INDEX)\s*(?:{NAME}\s*)?{COLUMN_LIST}(?:\s*USING\s+\w+)?"
    );
    let foreign_key = format!(
        r"(?i),\s*(?:CONSTRAINT\s+{NAME}\s+)?FOREIGN\s+KEY\s*(?:{NAME}\s*)?{COLUMN_LIST}\s*REFERENCES\s+{NAME}(?:\.{NAME})?\s*{COLUMN_LIST}{FK_ACTION}"
    );
    let unique_constraint = format!(
        r"(?i),\s*CONSTRAINT\s+{NAME}\s+UNIQUE(?:\s+(?:KEY|INDEX))?\s*(?:{NAME}\s*)?{COLUMN_LIST}"
    );

    let rules: Vec<(String, &'static str)> = vec![
        // table-name cleanup
        ("`".to_string(), "\""),
        (prefixed_table, "$1 $2"),
        // syntax stripping
        (r"(?i)\s*\bENGINE\s*=\s*\w+".to_string(), ""),
        (
            r"(?i)\s*\b(?:DEFAULT\s+)?(?:CHARSET|CHARACTER\s+SET)\s*=?\s*\w+".to_string(),
            "",
        ),
        (r"(?i)\s*\bCOLLATE\s*=?\s*\w+".to_string(), ""),
        (r"(?i)\s*\bAUTO_INCREMENT\s*=\s*\d+".to_string(), ""),
        (r"(?i)\s*\bAUTO_INCREMENT\b".to_string(), ""),
        (r"(?i)\s*\bROW_FORMAT\s*=\s*\w+".to_string(), ""),
        (r"(?i)\s+(?:UNSIGNED|ZEROFILL)\b".to_string(), ""),
        (r"(?i)\s*\bCOMMENT\s*=?\s*'(?:[^'\\]|\\.|'')*'".to_string(), ""),
        // type conversion
        (r"(?i)\b(?:int|integer|mediumint)\s*\(\s*\d+\s*\)".to_string(), "INTEGER"),
        (r"(?i)\b(?:tinyint|smallint)\s*\(\s*\d+\s*\)".to_string(), "SMALLINT"),
        (r"(?i)\bbigint\s*\(\s*\d+\s*\)".to_string(), "BIGINT"),
        (r"(?i)\bdatetime\b(?:\s*\(\s*\d+\s*\))?".to_string(), "TIMESTAMP"),
        (r"(?i)\b(?:tiny|medium|long)?text\s*\(\s*\d+\s*\)".to_string(), "TEXT"),
        // default-value cleanup
        (
            r"(?i)\bDEFAULT\s+'0000-00-00(?:[ T]00:00:00(?:\.0+)?)?'".to_string(),
            "DEFAULT NULL",
        ),
        (r"(?i)\bDEFAULT\s+''".to_string(), "DEFAULT NULL"),
        (
            r"(?i)\s+ON\s+UPDATE\s+CURRENT_TIMESTAMP(?:\s*\(\s*\d*\s*\))?".to_string(),
            "",
        ),
        (r"(?i)\bCURRENT_TIMESTAMP\s*\(\s*\d*\s*\)".to_string(), "CURRENT_TIMESTAMP"),
        // key removal
        (foreign_key, ""),
        (unique_constraint, ""),
        (index, ""),
        // formatting cleanup
        (r",\s*\)".to_string(), ")"),
    ];

    rules
        .into_iter()
        .map(|(pattern, replacement)| Rewrite {
            pattern: Regex::new(&pattern).expect("valid mysql rewrite pattern"),
            replacement,
        })
        .collect()
});

static POSTGRES: LazyLock<Vec<Rewrite>> = LazyLock::new(|| {
    compile(&[
        (r"(?i)\bBIGSERIAL\b|\bSERIAL8\b", "BIGINT GENERATED BY DEFAULT AS IDENTITY"),
        (r"(?i)\bSMALLSERIAL\b|\bSERIAL2\b", "SMALLINT GENERATED BY DEFAULT AS IDENTITY"),
        (r"(?i)\bSERIAL4?\b", "INTEGER GENERATED BY DEFAULT AS IDENTITY"),
    ])
});

static MSSQL: LazyLock<Vec<Rewrite>> = LazyLock::new(|| {
    compile(&[
        (r"(?im)^\s*GO\s*;?\s*$", ""),
        (r"\[([^\]]+)\]", "\"$1\""),
        (
            r"(?i)\bIDENTITY\s*\(\s*\d+\s*,\s*\d+\s*\)",
            "GENERATED BY DEFAULT AS IDENTITY",
        ),
        (r"(?i)\bnvarchar\b", "varchar"),
        (r"(?i)\bdatetime2\b(?:\s*\(\s*\d+\s*\))?", "timestamp"),
    ])
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Second-chance cleanup used by the importer after a failed first attempt.
static AGGRESSIVE: LazyLock<Vec<Rewrite>> = LazyLock::new(|| {
    let constraint = format!(
        r"(?i),\s*CONSTRAINT\s+{NAME}\s+(?:UNIQUE|CHECK|FOREIGN\s+KEY)[^,()]*{COLUMN_LIST}(?:\s*REFERENCES\s+{NAME}(?:\.{NAME})?\s*{COLUMN_LIST})?{FK_ACTION}"
    );
    let key = format!(
        r"(?i),\s*(?:UNIQUE\s+|FULLTEXT\s+|SPATIAL\s+)?(?:KEY|INDEX)\b[^,()]*{COLUMN_LIST}[^,()]*"
    );
    let rules: Vec<(String, &'static str)> = vec![
        (constraint, ""),
        (key, ""),
        (
            r"(?i)\s*\b(?:DEFAULT\s+)?(?:CHARSET|CHARACTER\s+SET)\s*=?\s*\w+".to_string(),
            "",
        ),
        (r"(?i)\s*\bCOLLATE\s*=?\s*\w+".to_string(), ""),
        (r",\s*\)".to_string(), ")"),
    ];
    rules
        .into_iter()
        .map(|(pattern, replacement)| Rewrite {
            pattern: Regex::new(&pattern).expect("valid cleanup pattern"),
            replacement,
        })
        .collect()
});

fn collapse_whitespace(sql: &str) -> String {
    WHITESPACE.replace_all(sql, " ").trim().to_string()
}

/// Rewrite `sql` for `dialect` into portable DDL.
pub fn normalize(sql: &str, dialect: Dialect) -> String {
    let without_comments = strip_comments(sql);
    let rewritten = match dialect {
        Dialect::MySql => apply_all(&without_comments, &MYSQL),
        Dialect::Postgres => apply_all(&without_comments, &POSTGRES),
        Dialect::MsSql => apply_all(&without_comments, &MSSQL),
    };
    let out = collapse_whitespace(&rewritten);
    debug!(%dialect, input_len = sql.len(), output_len = out.len(), "normalized sql");
    out
}

/// Strip leftover key/constraint fragments, charset remnants and trailing
/// commas. Applied to already-normalized SQL before the single import retry.
pub fn aggressive_cleanup(sql: &str) -> String {
    collapse_whitespace(&apply_all(sql, &AGGRESSIVE))
}
