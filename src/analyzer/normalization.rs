//! Normal-form and data-type heuristics.

use super::findings::{NormalForm, NormalizationIssue, NormalizationKind};
use super::rules::{NORMALIZATION_FIELD_RULES, tokens};
use crate::graph::{ConstraintTag, Field, Table};

pub fn check_normalization(tables: &[Table]) -> Vec<NormalizationIssue> {
    let mut issues = Vec::new();
    for table in tables {
        for field in &table.fields {
            issues.extend(
                NORMALIZATION_FIELD_RULES
                    .iter()
                    .filter(|rule| (rule.applies)(field))
                    .map(|rule| rule.render(table, field)),
            );
        }
        issues.extend(check_partial_dependencies(table));
        issues.extend(check_transitive_dependencies(table));
    }
    issues
}

fn leading_token(name: &str) -> Option<String> {
    tokens(name).into_iter().next()
}

/// Composite keys only: a non-key field named after one key component but not
/// the others may depend on part of the key.
fn check_partial_dependencies(table: &Table) -> Vec<NormalizationIssue> {
    let key_fields: Vec<&Field> = table
        .fields
        .iter()
        .filter(|f| f.has(ConstraintTag::Pk))
        .collect();
    if key_fields.len() < 2 {
        return Vec::new();
    }
    let prefixes: Vec<(Option<String>, &Field)> = key_fields
        .iter()
        .map(|f| (leading_token(&f.name), *f))
        .collect();

    table
        .fields
        .iter()
        .filter(|f| !f.is_key())
        .filter_map(|field| {
            let token = leading_token(&field.name)?;
            let (_, key) = prefixes
                .iter()
                .find(|(prefix, _)| prefix.as_deref() == Some(token.as_str()))?;
            let unrelated = prefixes
                .iter()
                .any(|(prefix, _)| prefix.as_deref() != Some(token.as_str()));
            unrelated.then(|| NormalizationIssue {
                kind: NormalizationKind::Warning,
                normal_form: NormalForm::Second,
                title: "Possible Partial Dependency".to_string(),
                description: format!(
                    "Field '{}' in table '{}' seems to depend only on key component '{}'.",
                    field.name, table.name, key.name
                ),
                table: table.name.clone(),
                fields: vec![field.name.clone(), key.name.clone()],
                recommendation: format!(
                    "Move '{}' to the table identified by '{}'.",
                    field.name, key.name
                ),
            })
        })
        .collect()
}

fn significant_tokens(name: &str) -> Vec<String> {
    tokens(name)
        .into_iter()
        .filter(|t| t.len() >= 3 && t != "id" && t != "name")
        .collect()
}

/// Non-key fields sharing a name token may both describe a third entity.
fn check_transitive_dependencies(table: &Table) -> Vec<NormalizationIssue> {
    let non_key: Vec<(&Field, Vec<String>)> = table
        .fields
        .iter()
        .filter(|f| !f.is_key())
        .map(|f| (f, significant_tokens(&f.name)))
        .collect();

    let mut issues = Vec::new();
    for (i, (field, field_tokens)) in non_key.iter().enumerate() {
        for (other, other_tokens) in &non_key[i + 1..] {
            let Some(shared) = field_tokens.iter().find(|t| other_tokens.contains(t)) else {
                continue;
            };
            issues.push(NormalizationIssue {
                kind: NormalizationKind::Suggestion,
                normal_form: NormalForm::Third,
                title: "Possible Transitive Dependency".to_string(),
                description: format!(
                    "Fields '{}' and '{}' in table '{}' both describe '{shared}'.",
                    field.name, other.name, table.name
                ),
                table: table.name.clone(),
                fields: vec![field.name.clone(), other.name.clone()],
                recommendation: format!(
                    "Consider extracting the '{shared}' attributes of '{}' into their own table.",
                    table.name
                ),
            });
            break;
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn titles(issues: &[NormalizationIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_first_normal_form() {
        let table = Table::new(
            "posts",
            vec![
                Field::new("tags", "text"),
                Field::new("meta", "jsonb"),
            ],
        );
        let issues = check_normalization(&[table]);
        assert_eq!(
            titles(&issues),
            vec!["Potential Multi-Valued Attribute", "JSON Column May Hide Structure"]
        );
        assert_eq!(issues[0].kind, NormalizationKind::Violation);
        assert_eq!(issues[1].kind, NormalizationKind::Suggestion);
    }

    #[test]
    fn test_partial_dependency_on_composite_key() {
        let table = Table::new(
            "order_items",
            vec![
                Field::new("order_id", "integer")
                    .with(ConstraintTag::Pk)
                    .with(ConstraintTag::CompositePk),
                Field::new("product_id", "integer")
                    .with(ConstraintTag::Pk)
                    .with(ConstraintTag::CompositePk),
                Field::new("product_name", "varchar(100)"),
                Field::new("quantity", "integer"),
            ],
        );
        let issues = check_partial_dependencies(&table);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].fields, vec!["product_name", "product_id"]);
    }

    #[test]
    fn test_single_key_skips_partial_dependency() {
        let table = Table::new(
            "products",
            vec![
                Field::new("product_id", "integer").with(ConstraintTag::Pk),
                Field::new("product_name", "text"),
            ],
        );
        assert!(check_partial_dependencies(&table).is_empty());
    }

    #[test]
    fn test_transitive_dependency_once_per_field() {
        let table = Table::new(
            "customers",
            vec![
                Field::new("id", "integer").with(ConstraintTag::Pk),
                Field::new("billing_street", "text"),
                Field::new("billing_city", "text"),
                Field::new("billing_zip", "text"),
                Field::new("first_name", "text"),
                Field::new("last_name", "text"),
                Field::new("created_at", "timestamp"),
                Field::new("updated_at", "timestamp"),
            ],
        );
        let issues = check_transitive_dependencies(&table);
        let pairs: Vec<&Vec<String>> = issues.iter().map(|i| &i.fields).collect();
        assert_eq!(
            pairs,
            vec![
                &vec!["billing_street".to_string(), "billing_city".to_string()],
                &vec!["billing_city".to_string(), "billing_zip".to_string()],
            ]
        );
    }

    #[test]
    fn test_data_type_rules() {
        let table = Table::new(
            "invoices",
            vec![
                Field::new("total", "float"),
                Field::new("fee", "integer"),
                Field::new("price", "decimal(10,2)"),
                Field::new("is_paid", "varchar(5)"),
                Field::new("notes", "varchar(4000)"),
            ],
        );
        let issues = check_normalization(&[table]);
        let found: Vec<(&str, NormalizationKind)> =
            issues.iter().map(|i| (i.title.as_str(), i.kind)).collect();
        assert_eq!(
            found,
            vec![
                ("Floating Point Currency", NormalizationKind::Violation),
                ("Imprecise Currency Type", NormalizationKind::Warning),
                ("Boolean Stored as String", NormalizationKind::Suggestion),
                ("Oversized VARCHAR", NormalizationKind::Suggestion),
            ]
        );
    }
}
