//! Schema-wide robustness metrics, each scored 0..=100.

use std::collections::BTreeSet;

use super::findings::RobustnessMetric;
use super::rules::{base_type, has_created_at, has_deleted_at, has_updated_at, is_string_type};
use crate::graph::{ConstraintTag, Field, Relationship, Table, is_fk_like};

pub fn check_robustness(tables: &[Table], relationships: &[Relationship]) -> Vec<RobustnessMetric> {
    vec![
        index_coverage(tables),
        foreign_key_integrity(tables, relationships),
        naming_conventions(tables),
        data_type_consistency(tables),
        scalability_indicators(tables),
        performance_anti_patterns(tables),
    ]
}

fn clamp(score: i32) -> u32 {
    score.clamp(0, 100) as u32
}

/// Reference-looking field that is not itself part of the key.
fn is_reference(field: &Field) -> bool {
    is_fk_like(&field.name) && !field.is_key()
}

fn is_unindexed_reference(field: &Field) -> bool {
    is_reference(field) && !field.has(ConstraintTag::Unique)
}

fn index_coverage(tables: &[Table]) -> RobustnessMetric {
    let mut score = 60;
    let mut suggestions = Vec::new();

    let any_fk_like = tables
        .iter()
        .flat_map(|t| &t.fields)
        .any(|f| is_fk_like(&f.name));
    if any_fk_like {
        score += 20;
    } else {
        suggestions.push("Add indexes on the columns used in joins and filters.".to_string());
    }

    for table in tables {
        let refs: Vec<&str> = table
            .fields
            .iter()
            .filter(|f| is_reference(f))
            .map(|f| f.name.as_str())
            .collect();
        if refs.len() > 1 {
            suggestions.push(format!(
                "Consider a composite index on {} ({}) for queries filtering on several references.",
                table.name,
                refs.join(", ")
            ));
        }
    }

    RobustnessMetric::new(
        "Index Coverage",
        clamp(score),
        "How well reference columns are positioned for indexing.".to_string(),
        suggestions,
    )
}

fn foreign_key_integrity(tables: &[Table], relationships: &[Relationship]) -> RobustnessMetric {
    let declared = tables
        .iter()
        .flat_map(|t| &t.fields)
        .filter(|f| f.has(ConstraintTag::Fk))
        .count();
    let mut suggestions = Vec::new();

    let score = if relationships.is_empty() {
        50.0
    } else {
        let ratio = (declared as f64 / relationships.len() as f64).min(1.0);
        50.0 + 50.0 * ratio
    };
    if declared < relationships.len() {
        suggestions.push(format!(
            "{} of {} relationships have no declared FOREIGN KEY constraint.",
            relationships.len() - declared,
            relationships.len()
        ));
    }
    if relationships.is_empty() && tables.len() > 1 {
        suggestions.push("No relationships were found between tables.".to_string());
    }

    RobustnessMetric::new(
        "Foreign Key Integrity",
        clamp(score.round() as i32),
        format!(
            "{declared} declared foreign key columns for {} relationships.",
            relationships.len()
        ),
        suggestions,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Case {
    Snake,
    Pascal,
    Camel,
    Mixed,
}

fn case_of(name: &str) -> Case {
    let has_upper = name.chars().any(char::is_uppercase);
    if !has_upper {
        Case::Snake
    } else if name.contains('_') {
        Case::Mixed
    } else if name.starts_with(char::is_uppercase) {
        Case::Pascal
    } else {
        Case::Camel
    }
}

fn naming_conventions(tables: &[Table]) -> RobustnessMetric {
    let mut score = 70;
    let mut suggestions = Vec::new();

    let table_cases: BTreeSet<Case> = tables.iter().map(|t| case_of(&t.name)).collect();
    let uniform = table_cases.len() <= 1
        && table_cases.iter().all(|c| matches!(c, Case::Snake | Case::Pascal));
    if !uniform {
        score -= 15;
        suggestions.push("Use one style for table names, either snake_case or PascalCase.".to_string());
    }

    // Single lower-case words fit every style and are ignored
    let field_cases: BTreeSet<Case> = tables
        .iter()
        .flat_map(|t| &t.fields)
        .filter(|f| f.name.contains('_') || f.name.chars().any(char::is_uppercase))
        .map(|f| case_of(&f.name))
        .collect();
    if field_cases.len() > 1 {
        score -= 10;
        suggestions.push("Field names mix naming styles across tables.".to_string());
    }

    let odd_keys: Vec<String> = tables
        .iter()
        .filter_map(|t| {
            let pk = t
                .fields
                .iter()
                .find(|f| f.has(ConstraintTag::Pk) && !f.has(ConstraintTag::CompositePk))?;
            let lower = pk.name.to_lowercase();
            let table = t.name.to_lowercase();
            let singular = table.strip_suffix('s').unwrap_or(&table);
            let conventional = lower == "id"
                || lower == format!("{table}_id")
                || lower == format!("{singular}_id");
            (!conventional).then(|| format!("{}.{}", t.name, pk.name))
        })
        .collect();
    if !odd_keys.is_empty() {
        score -= 5;
        suggestions.push(format!(
            "Name primary keys 'id' or '<table>_id': {}.",
            odd_keys.join(", ")
        ));
    }

    RobustnessMetric::new(
        "Naming Conventions",
        clamp(score),
        "Consistency of table, field and key naming.".to_string(),
        suggestions,
    )
}

fn distinct_types<'a>(fields: impl Iterator<Item = &'a Field>) -> BTreeSet<String> {
    fields.map(|f| base_type(&f.typ)).collect()
}

fn is_timestamp_like(field: &Field) -> bool {
    let lower = field.name.to_lowercase();
    lower.ends_with("_at") || lower.contains("date") || lower.contains("time")
}

fn data_type_consistency(tables: &[Table]) -> RobustnessMetric {
    let mut score = 75;
    let mut suggestions = Vec::new();
    let fields = || tables.iter().flat_map(|t| &t.fields);

    let id_types = distinct_types(fields().filter(|f| is_fk_like(&f.name)));
    if id_types.len() > 2 {
        score -= 15;
        suggestions.push(format!(
            "Identifier columns use {} different types ({}); pick one.",
            id_types.len(),
            id_types.into_iter().collect::<Vec<_>>().join(", ")
        ));
    }

    let time_types = distinct_types(fields().filter(|f| is_timestamp_like(f)));
    if time_types.len() > 2 {
        score -= 10;
        suggestions.push(format!(
            "Date and time columns use {} different types ({}).",
            time_types.len(),
            time_types.into_iter().collect::<Vec<_>>().join(", ")
        ));
    }

    RobustnessMetric::new(
        "Data Type Consistency",
        clamp(score),
        "Whether related columns share the same underlying types.".to_string(),
        suggestions,
    )
}

/// `events_2024`, `logs_01`.
fn is_partition_name(name: &str) -> bool {
    name.rsplit_once('_').is_some_and(|(prefix, suffix)| {
        !prefix.is_empty() && !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit())
    })
}

fn scalability_indicators(tables: &[Table]) -> RobustnessMetric {
    let mut score = 65;
    let mut suggestions = Vec::new();

    if tables.iter().any(|t| is_partition_name(&t.name)) {
        score += 15;
    } else {
        suggestions.push("Consider partitioning large, time-ordered tables.".to_string());
    }

    if !tables.is_empty() && tables.iter().all(|t| has_created_at(t) && has_updated_at(t)) {
        score += 10;
    } else {
        suggestions.push("Add created_at and updated_at to every table.".to_string());
    }

    if tables.iter().any(has_deleted_at) {
        score += 5;
    } else {
        suggestions.push("Soft deletes (deleted_at) make archiving and recovery easier.".to_string());
    }

    RobustnessMetric::new(
        "Scalability Indicators",
        clamp(score),
        "Structural hints that the schema will cope with growth.".to_string(),
        suggestions,
    )
}

fn performance_anti_patterns(tables: &[Table]) -> RobustnessMetric {
    let mut score: i32 = 100;
    let mut suggestions = Vec::new();
    let mut deduct = |count: usize, per: i32, cap: i32, message: String| {
        if count > 0 {
            score -= (count as i32 * per).min(cap);
            suggestions.push(message);
        }
    };

    let wide = tables.iter().filter(|t| t.fields.len() > 20).count();
    deduct(wide, 5, 20, format!("{wide} table(s) have more than 20 columns; consider splitting them."));

    let keyless = tables.iter().filter(|t| !t.has_primary_key()).count();
    deduct(keyless, 3, 15, format!("{keyless} table(s) have no primary key."));

    let fk_heavy = tables
        .iter()
        .filter(|t| t.fields.iter().filter(|f| f.has(ConstraintTag::Fk)).count() > 5)
        .count();
    deduct(fk_heavy, 5, 10, format!("{fk_heavy} table(s) have more than 5 foreign keys."));

    let unindexed = tables
        .iter()
        .flat_map(|t| &t.fields)
        .filter(|f| is_unindexed_reference(f))
        .count();
    deduct(unindexed, 2, 15, format!("{unindexed} reference column(s) are not indexed."));

    let text_heavy = tables
        .iter()
        .filter(|t| {
            t.fields
                .iter()
                .filter(|f| !f.is_key() && is_string_type(&f.typ))
                .count()
                > 5
        })
        .count();
    deduct(
        text_heavy,
        3,
        10,
        format!("{text_heavy} table(s) have more than 5 text columns."),
    );

    RobustnessMetric::new(
        "Performance Anti-Patterns",
        clamp(score),
        "Structures known to slow down queries and writes.".to_string(),
        suggestions,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::findings::MetricStatus;

    fn metric<'a>(metrics: &'a [RobustnessMetric], category: &str) -> &'a RobustnessMetric {
        metrics.iter().find(|m| m.category == category).unwrap()
    }

    #[test]
    fn test_empty_schema_baselines() {
        let metrics = check_robustness(&[], &[]);
        let scores: Vec<u32> = metrics.iter().map(|m| m.score).collect();
        assert_eq!(scores, vec![60, 50, 70, 75, 65, 100]);
        assert_eq!(metrics[5].status, MetricStatus::Excellent);
    }

    #[test]
    fn test_wide_keyless_table() {
        let fields = (0..25)
            .map(|i| Field::new(format!("c{i}"), "integer"))
            .collect();
        let metrics = check_robustness(&[Table::new("metrics", fields)], &[]);
        assert_eq!(metric(&metrics, "Performance Anti-Patterns").score, 92);
    }

    #[test]
    fn test_foreign_key_integrity_ratio() {
        let tables = vec![Table::new(
            "posts",
            vec![Field::new("author_id", "integer").with(ConstraintTag::Fk)],
        )];
        let rel = |id: &str| Relationship {
            id: id.to_string(),
            source: "posts".to_string(),
            target: "users".to_string(),
            source_field: "author_id".to_string(),
            target_field: "id".to_string(),
            typ: crate::graph::classify(&tables[0].fields[0], &Field::new("id", "integer")),
        };
        let half = foreign_key_integrity(&tables, &[rel("a"), rel("b")]);
        assert_eq!(half.score, 75);
        assert_eq!(foreign_key_integrity(&tables, &[rel("a")]).score, 100);
    }

    #[test]
    fn test_naming_penalties() {
        let tables = vec![
            Table::new("user_accounts", vec![Field::new("accountId", "integer").with(ConstraintTag::Pk)]),
            Table::new("OrderLines", vec![Field::new("line_no", "integer")]),
        ];
        let m = naming_conventions(&tables);
        assert_eq!(m.score, 70 - 15 - 10 - 5);
        assert_eq!(m.suggestions.len(), 3);
    }

    #[test]
    fn test_camel_case_tables_are_not_uniform() {
        let tables = vec![
            Table::new("userAccounts", vec![Field::new("id", "integer").with(ConstraintTag::Pk)]),
            Table::new("orderLines", vec![Field::new("id", "integer").with(ConstraintTag::Pk)]),
        ];
        assert_eq!(naming_conventions(&tables).score, 55);

        let pascal = vec![
            Table::new("UserAccounts", vec![Field::new("id", "integer").with(ConstraintTag::Pk)]),
            Table::new("OrderLines", vec![Field::new("id", "integer").with(ConstraintTag::Pk)]),
        ];
        assert_eq!(naming_conventions(&pascal).score, 70);
    }

    #[test]
    fn test_index_coverage_counts_key_columns() {
        let users = Table::new("users", vec![Field::new("id", "integer").with(ConstraintTag::Pk)]);
        assert_eq!(index_coverage(&[users]).score, 80);

        let tags = Table::new("tags", vec![Field::new("label", "varchar(20)")]);
        assert_eq!(index_coverage(&[tags]).score, 60);
    }

    #[test]
    fn test_composite_index_suggestion_skips_keys() {
        let items = Table::new(
            "order_items",
            vec![
                Field::new("id", "integer").with(ConstraintTag::Pk),
                Field::new("order_id", "integer").with(ConstraintTag::Fk),
                Field::new("product_id", "integer").with(ConstraintTag::Fk),
            ],
        );
        let m = index_coverage(&[items]);
        assert_eq!(m.suggestions.len(), 1);
        assert!(m.suggestions[0].contains("(order_id, product_id)"));
    }

    #[test]
    fn test_conventional_keys_are_accepted() {
        let tables = vec![
            Table::new("users", vec![Field::new("user_id", "integer").with(ConstraintTag::Pk)]),
            Table::new("orders", vec![Field::new("id", "integer").with(ConstraintTag::Pk)]),
        ];
        assert_eq!(naming_conventions(&tables).score, 70);
    }

    #[test]
    fn test_scalability_bonuses() {
        let audited = |name: &str| {
            Table::new(
                name,
                vec![
                    Field::new("created_at", "timestamp"),
                    Field::new("updated_at", "timestamp"),
                    Field::new("deleted_at", "timestamp"),
                ],
            )
        };
        let m = scalability_indicators(&[audited("events_2024"), audited("events")]);
        assert_eq!(m.score, 95);
        assert!(m.suggestions.is_empty());
        assert!(!is_partition_name("_2024"));
        assert!(!is_partition_name("events_v2"));
    }

    #[test]
    fn test_mixed_identifier_types() {
        let tables = vec![Table::new(
            "t",
            vec![
                Field::new("id", "integer"),
                Field::new("a_id", "bigint"),
                Field::new("b_id", "uuid"),
                Field::new("created_at", "timestamp"),
                Field::new("start_date", "date"),
                Field::new("end_time", "varchar(20)"),
            ],
        )];
        assert_eq!(data_type_consistency(&tables).score, 50);
    }
}
