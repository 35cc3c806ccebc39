//! One-to-one vs one-to-many classification of a referencing field.

use super::{ConstraintTag, Field, RelationshipKind, RelationshipType};

/// Name heuristic standing in for a missing `fk` tag.
pub fn is_fk_like(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("_id") || lower.ends_with("id")
}

/// Classify a relationship from the referencing field's constraints.
///
/// The target field does not influence the result; it is accepted so callers
/// always pass both ends of the edge.
pub fn classify(source: &Field, _target: &Field) -> RelationshipType {
    let references = source.has(ConstraintTag::Fk) || is_fk_like(&source.name);
    let not_null = source.has(ConstraintTag::NotNull);

    if source.has(ConstraintTag::Pk) && references {
        return RelationshipType {
            kind: RelationshipKind::OneToOne,
            source_required: true,
            target_required: true,
        };
    }
    if references && source.has(ConstraintTag::Unique) {
        return RelationshipType {
            kind: RelationshipKind::OneToOne,
            source_required: not_null,
            target_required: false,
        };
    }
    RelationshipType {
        kind: RelationshipKind::OneToMany,
        source_required: not_null,
        target_required: false,
    }
}
