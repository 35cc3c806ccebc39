//! Relational schema graph: tables, fields and directed relationships.
//!
//! Relationships refer to tables and fields by name, so the structure stays
//! tree-shaped for serialization even when the schema contains cycles.

mod builder;
mod classify;
mod infer;

pub use builder::build;
pub use classify::{classify, is_fk_like};
pub use infer::infer_relationships;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConstraintTag {
    #[serde(rename = "pk")]
    Pk,
    #[serde(rename = "composite-pk")]
    CompositePk,
    #[serde(rename = "fk")]
    Fk,
    #[serde(rename = "unique")]
    Unique,
    #[serde(rename = "not null")]
    NotNull,
}

impl ConstraintTag {
    /// Parse a tag as written inside a field's bracket list.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pk" | "primary key" => Some(Self::Pk),
            "composite-pk" => Some(Self::CompositePk),
            "fk" => Some(Self::Fk),
            "unique" => Some(Self::Unique),
            "not null" => Some(Self::NotNull),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pk => "pk",
            Self::CompositePk => "composite-pk",
            Self::Fk => "fk",
            Self::Unique => "unique",
            Self::NotNull => "not null",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default)]
    pub constraints: BTreeSet<ConstraintTag>,
}

impl Field {
    pub fn new(name: impl Into<String>, typ: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            typ: typ.into(),
            constraints: BTreeSet::new(),
        }
    }

    pub fn with(mut self, tag: ConstraintTag) -> Self {
        self.constraints.insert(tag);
        self
    }

    pub fn has(&self, tag: ConstraintTag) -> bool {
        self.constraints.contains(&tag)
    }

    /// Member of a single or composite primary key.
    pub fn is_key(&self) -> bool {
        self.has(ConstraintTag::Pk) || self.has(ConstraintTag::CompositePk)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Table {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// First field tagged `pk`.
    pub fn primary_key(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.has(ConstraintTag::Pk))
    }

    pub fn has_primary_key(&self) -> bool {
        self.fields.iter().any(Field::is_key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    OneToOne,
    OneToMany,
    ManyToMany,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipType {
    pub kind: RelationshipKind,
    pub source_required: bool,
    pub target_required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_field: String,
    pub target_field: String,
    #[serde(rename = "type")]
    pub typ: RelationshipType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaGraph {
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl SchemaGraph {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_graph_json_shape() {
        let graph = SchemaGraph {
            tables: vec![Table::new(
                "users",
                vec![
                    Field::new("id", "integer").with(ConstraintTag::Pk),
                    Field::new("email", "varchar(255)")
                        .with(ConstraintTag::NotNull)
                        .with(ConstraintTag::Unique),
                ],
            )],
            relationships: vec![Relationship {
                id: "ref:posts.user_id->users.id".to_string(),
                source: "posts".to_string(),
                target: "users".to_string(),
                source_field: "user_id".to_string(),
                target_field: "id".to_string(),
                typ: RelationshipType {
                    kind: RelationshipKind::OneToMany,
                    source_required: false,
                    target_required: false,
                },
            }],
        };

        let json = graph.to_json().unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"tables":[{"id":"users","name":"users","fields":["#,
                r#"{"name":"id","type":"integer","constraints":["pk"]},"#,
                r#"{"name":"email","type":"varchar(255)","constraints":["unique","not null"]}]}],"#,
                r#""relationships":[{"id":"ref:posts.user_id->users.id","source":"posts","#,
                r#""target":"users","sourceField":"user_id","targetField":"id","#,
                r#""type":{"kind":"one-to-many","sourceRequired":false,"targetRequired":false}}]}"#
            )
        );
        assert_eq!(SchemaGraph::from_json(&json).unwrap(), graph);
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let graph = SchemaGraph::from_json(r#"{"tables":[{"id":"t","name":"t"}]}"#).unwrap();
        assert!(graph.tables[0].fields.is_empty());
        assert!(graph.relationships.is_empty());
    }

    #[test]
    fn test_malformed_graph_is_rejected() {
        assert!(SchemaGraph::from_json(r#"{"tables": 3}"#).is_err());
    }

    #[test]
    fn test_tag_parsing() {
        assert_eq!(ConstraintTag::from_str(" not null"), Some(ConstraintTag::NotNull));
        assert_eq!(ConstraintTag::from_str("PK"), Some(ConstraintTag::Pk));
        assert_eq!(ConstraintTag::from_str("increment"), None);
    }
}
