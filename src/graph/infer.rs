//! Implicit relationships from `<word>_id` naming conventions.

use super::{Relationship, Table, classify};

/// Table names `word` may refer to, best match first.
fn candidate_names(word: &str) -> Vec<String> {
    let mut names = vec![word.to_string(), format!("{word}s"), format!("{word}es")];
    if let Some(stem) = word.strip_suffix('y') {
        names.push(format!("{stem}ies"));
    }
    names
}

fn find_target<'a>(tables: &'a [Table], word: &str) -> Option<&'a Table> {
    candidate_names(word).iter().find_map(|candidate| {
        tables
            .iter()
            .find(|t| t.name.to_lowercase() == *candidate)
    })
}

/// Synthesize a relationship for every `<word>_id` field whose `<word>` names a
/// table with a primary key. Explicit relationships are not consulted, so a
/// field may end up with both an explicit and an implicit edge.
pub fn infer_relationships(tables: &[Table]) -> Vec<Relationship> {
    let mut relationships = Vec::new();

    for table in tables {
        for field in &table.fields {
            let lower = field.name.to_lowercase();
            let Some(word) = lower.strip_suffix("_id").filter(|w| !w.is_empty()) else {
                continue;
            };
            let Some(target) = find_target(tables, word) else {
                continue;
            };
            let Some(target_field) = target.primary_key() else {
                continue;
            };
            if target.name == table.name && target_field.name == field.name {
                continue;
            }

            relationships.push(Relationship {
                id: format!(
                    "implicit:{}.{}->{}.{}",
                    table.name, field.name, target.name, target_field.name
                ),
                source: table.name.clone(),
                target: target.name.clone(),
                source_field: field.name.clone(),
                target_field: target_field.name.clone(),
                typ: classify(field, target_field),
            });
        }
    }

    relationships
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ConstraintTag, Field, RelationshipKind};

    fn table(name: &str, fields: Vec<Field>) -> Table {
        Table::new(name, fields)
    }

    #[test]
    fn test_plural_target_is_found() {
        let tables = vec![
            table("orders", vec![Field::new("id", "integer").with(ConstraintTag::Pk)]),
            table("order_items", vec![Field::new("order_id", "integer")]),
        ];
        let rels = infer_relationships(&tables);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].id, "implicit:order_items.order_id->orders.id");
        assert_eq!(rels[0].typ.kind, RelationshipKind::OneToMany);
        assert!(!rels[0].typ.source_required);
    }

    #[test]
    fn test_exact_name_preferred_and_case_insensitive() {
        let tables = vec![
            table("Categories", vec![Field::new("id", "integer").with(ConstraintTag::Pk)]),
            table("Category", vec![Field::new("code", "text").with(ConstraintTag::Pk)]),
            table("posts", vec![Field::new("Category_ID", "integer")]),
        ];
        let rels = infer_relationships(&tables);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].target, "Category");
        assert_eq!(rels[0].target_field, "code");

        let ies = vec![
            table("companies", vec![Field::new("id", "integer").with(ConstraintTag::Pk)]),
            table("staff", vec![Field::new("company_id", "integer")]),
        ];
        assert_eq!(infer_relationships(&ies)[0].target, "companies");
    }

    #[test]
    fn test_no_pk_or_no_table_means_no_edge() {
        let tables = vec![
            table("users", vec![Field::new("id", "integer")]),
            table("posts", vec![Field::new("user_id", "integer"), Field::new("team_id", "integer")]),
        ];
        assert!(infer_relationships(&tables).is_empty());
    }

    #[test]
    fn test_own_primary_key_is_not_a_reference() {
        let tables = vec![table(
            "user",
            vec![Field::new("user_id", "integer").with(ConstraintTag::Pk)],
        )];
        assert!(infer_relationships(&tables).is_empty());
    }
}
