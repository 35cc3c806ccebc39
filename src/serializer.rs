//! Serializer for converting the DDL tree into the line-oriented intermediate
//! schema text consumed by the graph builder.
//!
//! ```text
//! Table "orders" {
//!   "id" integer [pk, increment]
//!   "user_id" integer [fk, not null]
//! }
//! Ref: "orders"."user_id" > "users"."id"
//! ```

use crate::ast::{Column, ColumnModifier, Entity, ForeignKey, Schema};

/// Serialize a Schema to intermediate notation.
pub fn serialize(schema: &Schema) -> String {
    let mut output = String::new();

    for (i, entity) in schema.entities.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        serialize_entity(&mut output, entity, schema);
    }

    if !schema.foreign_keys.is_empty() {
        output.push('\n');
        for fk in &schema.foreign_keys {
            serialize_ref(&mut output, fk, schema);
        }
    }

    output
}

fn serialize_entity(output: &mut String, entity: &Entity, schema: &Schema) {
    output.push_str(&format!("Table \"{}\" {{\n", entity.name));

    let pk_columns = entity.primary_key_columns();
    let composite = pk_columns.len() > 1;

    for column in &entity.columns {
        let is_fk = schema
            .foreign_keys
            .iter()
            .any(|fk| fk.table == entity.name && fk.columns.contains(&column.name));
        let is_composite_member = composite && pk_columns.contains(&column.name.as_str());
        serialize_column(output, entity, column, is_fk, is_composite_member);
    }

    output.push_str("}\n");
}

fn serialize_column(
    output: &mut String,
    entity: &Entity,
    column: &Column,
    is_fk: bool,
    is_composite_member: bool,
) {
    output.push_str(&format!("  \"{}\" {}", column.name, column.typ));

    // Tags in order: pk, composite-pk, increment, fk, unique, not null
    let mut tags: Vec<&str> = Vec::new();
    if column.has(&ColumnModifier::Pk) {
        tags.push("pk");
    }
    if is_composite_member {
        tags.push("composite-pk");
    }
    if column.has(&ColumnModifier::Increment) {
        tags.push("increment");
    }
    if is_fk {
        tags.push("fk");
    }
    if column.has(&ColumnModifier::Unique) || entity.has_unique_constraint(&column.name) {
        tags.push("unique");
    }
    if column.has(&ColumnModifier::NotNull) {
        tags.push("not null");
    }

    if !tags.is_empty() {
        output.push_str(&format!(" [{}]", tags.join(", ")));
    }
    output.push('\n');
}

fn serialize_ref(output: &mut String, fk: &ForeignKey, schema: &Schema) {
    let target_entity = schema.entity(&fk.target);
    let target_columns: Vec<String> = if fk.target_columns.is_empty() {
        // REFERENCES without a column list points at the primary key
        let pk: Vec<String> = target_entity
            .map(|e| e.primary_key_columns().into_iter().map(String::from).collect())
            .unwrap_or_default();
        if pk.is_empty() { vec!["id".to_string()] } else { pk }
    } else {
        fk.target_columns.clone()
    };

    let source_entity = schema.entity(&fk.table);
    for (column, target_column) in fk.columns.iter().zip(target_columns.iter()) {
        let one_to_one = source_entity.is_some_and(|e| {
            e.columns.iter().any(|c| {
                &c.name == column
                    && (c.has(&ColumnModifier::Unique)
                        || (c.has(&ColumnModifier::Pk) && e.primary_key_columns().len() <= 1))
            }) || e.has_unique_constraint(column)
        });
        let op = if one_to_one { '-' } else { '>' };
        output.push_str(&format!(
            "Ref: \"{}\".\"{}\" {} \"{}\".\"{}\"\n",
            fk.table, column, op, fk.target, target_column
        ));
    }
}
