//! Line scanner turning intermediate schema text into a [`SchemaGraph`].
//!
//! The scanner is a two-state machine. `Outside` accepts table openings and
//! `Ref:` lines; `InTable` additionally accepts field lines and the closing
//! brace. Lines that fit neither state are skipped.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{
    ConstraintTag, Field, Relationship, SchemaGraph, Table, classify, infer_relationships,
};

static TABLE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^Table\s+(?:"([^"]+)"|([\w$.]+))(?:\s+as\s+\S+)?\s*(\{)?"#)
        .expect("valid table pattern")
});

static FIELD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^"([^"]+)"\s+(\S+)(?:\s+\[([^\]]*)\])?"#).expect("valid field pattern")
});

static REF_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^Ref(?:\s+[\w"]+)?\s*:\s*"([^"]+)"\."([^"]+)"\s*([<>-])\s*"([^"]+)"\."([^"]+)""#)
        .expect("valid ref pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    /// Index of the open table in the table list.
    InTable(usize),
}

/// One classified line of intermediate text.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    TableStart(&'a str),
    TableEnd,
    Field(Field),
    Ref(RefLine<'a>),
    Other,
}

#[derive(Debug, PartialEq)]
struct RefLine<'a> {
    source: &'a str,
    source_field: &'a str,
    target: &'a str,
    target_field: &'a str,
}

fn parse_line(line: &str) -> Line<'_> {
    if line == "}" {
        return Line::TableEnd;
    }
    if let Some(caps) = TABLE_LINE.captures(line) {
        let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        return Line::TableStart(name);
    }
    if let Some(caps) = REF_LINE.captures(line) {
        return Line::Ref(RefLine {
            source: caps.get(1).map_or("", |m| m.as_str()),
            source_field: caps.get(2).map_or("", |m| m.as_str()),
            target: caps.get(4).map_or("", |m| m.as_str()),
            target_field: caps.get(5).map_or("", |m| m.as_str()),
        });
    }
    if let Some(caps) = FIELD_LINE.captures(line) {
        let mut field = Field::new(&caps[1], &caps[2]);
        if let Some(tags) = caps.get(3) {
            field.constraints = tags
                .as_str()
                .split(',')
                .filter_map(ConstraintTag::from_str)
                .collect();
        }
        return Line::Field(field);
    }
    Line::Other
}

/// Scan intermediate text into tables and explicit relationships, then add
/// relationships inferred from `<word>_id` field names.
pub fn build(text: &str) -> SchemaGraph {
    let mut tables: Vec<Table> = Vec::new();
    let mut refs: Vec<RefLine<'_>> = Vec::new();
    let mut state = State::Outside;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        state = match (state, parse_line(line)) {
            (_, Line::TableStart(name)) => {
                // Redeclaration replaces the earlier table in place
                let index = match tables.iter().position(|t| t.name == name) {
                    Some(index) => {
                        tables[index].fields.clear();
                        index
                    }
                    None => {
                        tables.push(Table::new(name, Vec::new()));
                        tables.len() - 1
                    }
                };
                State::InTable(index)
            }
            (State::InTable(index), Line::Field(field)) => {
                tables[index].fields.push(field);
                State::InTable(index)
            }
            (_, Line::TableEnd) => State::Outside,
            (state, Line::Ref(r)) => {
                refs.push(r);
                state
            }
            (state, Line::Field(_) | Line::Other) => state,
        };
    }

    let mut relationships: Vec<Relationship> = refs
        .iter()
        .map(|r| explicit_relationship(&tables, r))
        .collect();
    let explicit = relationships.len();
    relationships.extend(infer_relationships(&tables));

    debug!(
        tables = tables.len(),
        explicit,
        implicit = relationships.len() - explicit,
        "built schema graph"
    );

    SchemaGraph {
        tables,
        relationships,
    }
}

/// Looks a field up, falling back to an untagged field for dangling ends.
fn lookup(tables: &[Table], table: &str, field: &str) -> Field {
    tables
        .iter()
        .find(|t| t.name == table)
        .and_then(|t| t.field(field))
        .cloned()
        .unwrap_or_else(|| Field::new(field, ""))
}

fn explicit_relationship(tables: &[Table], r: &RefLine<'_>) -> Relationship {
    let source = lookup(tables, r.source, r.source_field);
    let target = lookup(tables, r.target, r.target_field);
    Relationship {
        id: format!(
            "ref:{}.{}->{}.{}",
            r.source, r.source_field, r.target, r.target_field
        ),
        source: r.source.to_string(),
        target: r.target.to_string(),
        source_field: r.source_field.to_string(),
        target_field: r.target_field.to_string(),
        typ: classify(&source, &target),
    }
}
