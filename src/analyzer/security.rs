//! Security checks: per-table rule tables followed by schema-wide passes.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::findings::{Impact, SecurityCategory, SecurityIssue, Severity};
use super::rules::{SECURITY_FIELD_RULES, SECURITY_TABLE_RULES};
use crate::graph::{ConstraintTag, Relationship, Table, is_fk_like};

pub fn check_security(tables: &[Table], relationships: &[Relationship]) -> Vec<SecurityIssue> {
    let mut issues = Vec::new();

    for table in tables {
        for field in &table.fields {
            issues.extend(
                SECURITY_FIELD_RULES
                    .iter()
                    .filter(|rule| (rule.applies)(table, field))
                    .map(|rule| rule.finding.render(table, Some(field))),
            );
        }
        issues.extend(
            SECURITY_TABLE_RULES
                .iter()
                .filter(|rule| (rule.applies)(table))
                .map(|rule| rule.finding.render(table, None)),
        );
    }

    issues.extend(check_dangling_references(tables, relationships));
    issues.extend(check_circular_dependencies(tables, relationships));
    issues.extend(check_unindexed_foreign_keys(tables));
    issues
}

fn check_dangling_references(
    tables: &[Table],
    relationships: &[Relationship],
) -> Vec<SecurityIssue> {
    let known: HashSet<&str> = tables.iter().map(|t| t.name.as_str()).collect();
    let mut issues = Vec::new();

    for rel in relationships {
        for (side, table, field) in [
            ("source", &rel.source, &rel.source_field),
            ("target", &rel.target, &rel.target_field),
        ] {
            if known.contains(table.as_str()) {
                continue;
            }
            issues.push(SecurityIssue {
                severity: Severity::Critical,
                category: SecurityCategory::Integrity,
                title: "Invalid Relationship Reference".to_string(),
                description: format!(
                    "Relationship '{}' has a {side} table '{table}' that does not exist.",
                    rel.id
                ),
                table: Some(table.clone()),
                field: Some(field.clone()),
                recommendation: format!("Create table '{table}' or remove the relationship."),
                impact: Impact::High,
            });
        }
    }
    issues
}

/// Every elementary cycle reachable by a depth-first walk, each reported once
/// as a table chain in discovery order. Self-references are not cycles here.
pub fn find_cycles(tables: &[Table], relationships: &[Relationship]) -> Vec<Vec<String>> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut nodes: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
    for rel in relationships {
        if rel.source == rel.target {
            continue;
        }
        let targets = adjacency.entry(rel.source.as_str()).or_default();
        if !targets.contains(&rel.target.as_str()) {
            targets.push(rel.target.as_str());
        }
        for end in [rel.source.as_str(), rel.target.as_str()] {
            if !nodes.contains(&end) {
                nodes.push(end);
            }
        }
    }

    let mut walk = CycleWalk {
        adjacency: &adjacency,
        visited: HashSet::new(),
        stack: Vec::new(),
        seen: BTreeSet::new(),
        cycles: Vec::new(),
    };
    for node in nodes {
        if !walk.visited.contains(node) {
            walk.visit(node);
        }
    }
    walk.cycles
}

struct CycleWalk<'a> {
    adjacency: &'a HashMap<&'a str, Vec<&'a str>>,
    visited: HashSet<&'a str>,
    stack: Vec<&'a str>,
    /// Rotation-normalized cycles already reported.
    seen: BTreeSet<Vec<&'a str>>,
    cycles: Vec<Vec<String>>,
}

impl<'a> CycleWalk<'a> {
    fn visit(&mut self, node: &'a str) {
        self.visited.insert(node);
        self.stack.push(node);

        let adjacency = self.adjacency;
        for &next in adjacency.get(node).map_or(&[][..], Vec::as_slice) {
            if let Some(pos) = self.stack.iter().position(|&n| n == next) {
                self.record(pos);
            } else if !self.visited.contains(next) {
                self.visit(next);
            }
        }

        self.stack.pop();
    }

    fn record(&mut self, start: usize) {
        let cycle = &self.stack[start..];
        let min = cycle
            .iter()
            .enumerate()
            .min_by_key(|&(_, name)| *name)
            .map_or(0, |(i, _)| i);
        let mut key = cycle.to_vec();
        key.rotate_left(min);
        if self.seen.insert(key) {
            self.cycles
                .push(cycle.iter().map(|name| name.to_string()).collect());
        }
    }
}

fn check_circular_dependencies(
    tables: &[Table],
    relationships: &[Relationship],
) -> Vec<SecurityIssue> {
    find_cycles(tables, relationships)
        .into_iter()
        .map(|cycle| {
            let mut chain = cycle.clone();
            chain.push(cycle[0].clone());
            SecurityIssue {
                severity: Severity::Warning,
                category: SecurityCategory::Integrity,
                title: "Circular Dependency Detected".to_string(),
                description: format!("Tables reference each other in a cycle: {}", chain.join(" → ")),
                table: Some(cycle[0].clone()),
                field: None,
                recommendation: "Break the cycle with a nullable reference or a junction table so rows can be inserted and deleted in order.".to_string(),
                impact: Impact::Medium,
            }
        })
        .collect()
}

fn check_unindexed_foreign_keys(tables: &[Table]) -> Vec<SecurityIssue> {
    tables
        .iter()
        .flat_map(|table| {
            table
                .fields
                .iter()
                .filter(|f| is_fk_like(&f.name) && !f.is_key() && !f.has(ConstraintTag::Unique))
                .map(move |field| SecurityIssue {
                    severity: Severity::Warning,
                    category: SecurityCategory::Integrity,
                    title: "Unindexed Foreign Key".to_string(),
                    description: format!(
                        "Field '{}' in table '{}' references another table but has no index.",
                        field.name, table.name
                    ),
                    table: Some(table.name.clone()),
                    field: Some(field.name.clone()),
                    recommendation: format!(
                        "Create an index on '{}.{}' to speed up joins and cascading deletes.",
                        table.name, field.name
                    ),
                    impact: Impact::Medium,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Field, RelationshipKind, RelationshipType};

    fn rel(source: &str, target: &str) -> Relationship {
        Relationship {
            id: format!("ref:{source}.x->{target}.id"),
            source: source.to_string(),
            target: target.to_string(),
            source_field: "x".to_string(),
            target_field: "id".to_string(),
            typ: RelationshipType {
                kind: RelationshipKind::OneToMany,
                source_required: false,
                target_required: false,
            },
        }
    }

    fn tables(names: &[&str]) -> Vec<Table> {
        names
            .iter()
            .map(|n| Table::new(*n, vec![Field::new("id", "integer").with(ConstraintTag::Pk)]))
            .collect()
    }

    #[test]
    fn test_three_table_cycle_reported_once() {
        let rels = vec![rel("a", "b"), rel("b", "c"), rel("c", "a"), rel("c", "a")];
        let cycles = find_cycles(&tables(&["a", "b", "c"]), &rels);
        assert_eq!(cycles, vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_self_reference_is_not_a_cycle() {
        let rels = vec![rel("employees", "employees")];
        assert!(find_cycles(&tables(&["employees"]), &rels).is_empty());
    }

    #[test]
    fn test_two_distinct_cycles() {
        let rels = vec![rel("a", "b"), rel("b", "a"), rel("c", "d"), rel("d", "c")];
        let cycles = find_cycles(&tables(&["a", "b", "c", "d"]), &rels);
        assert_eq!(cycles.len(), 2);
    }

    #[test]
    fn test_dangling_ends_reported_per_side() {
        let rels = vec![rel("ghost", "phantom"), rel("a", "phantom")];
        let issues = check_dangling_references(&tables(&["a"]), &rels);
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| i.severity == Severity::Critical));
        assert_eq!(issues[0].table.as_deref(), Some("ghost"));
    }

    #[test]
    fn test_unindexed_foreign_keys() {
        let t = Table::new(
            "posts",
            vec![
                Field::new("id", "integer").with(ConstraintTag::Pk),
                Field::new("author_id", "integer"),
                Field::new("slug_id", "integer").with(ConstraintTag::Unique),
            ],
        );
        let issues = check_unindexed_foreign_keys(&[t]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field.as_deref(), Some("author_id"));
    }
}
