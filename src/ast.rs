//! DDL syntax tree produced by the built-in SQL importer.

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub entities: Vec<Entity>,
    /// Every foreign key found, whether declared inline, at table level or by
    /// a later `ALTER TABLE`.
    pub foreign_keys: Vec<ForeignKey>,
}

impl Schema {
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: String,
    pub columns: Vec<Column>,
    pub constraints: Vec<Constraint>,
}

impl Entity {
    /// Columns named by the table-level primary key (empty when none).
    pub fn primary_key_columns(&self) -> Vec<&str> {
        self.constraints
            .iter()
            .filter_map(|c| match c {
                Constraint::PrimaryKey(cols) => Some(cols.iter().map(String::as_str)),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Whether `column` alone is covered by a single-column UNIQUE constraint.
    pub fn has_unique_constraint(&self, column: &str) -> bool {
        self.constraints.iter().any(|c| {
            matches!(c, Constraint::Unique(cols) if cols.len() == 1 && cols[0] == column)
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub typ: String,
    pub modifiers: Vec<ColumnModifier>,
}

impl Column {
    pub fn has(&self, modifier: &ColumnModifier) -> bool {
        self.modifiers.contains(modifier)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnModifier {
    Pk,
    NotNull,
    Unique,
    Increment,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    PrimaryKey(Vec<String>),
    Unique(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub table: String,
    pub columns: Vec<String>,
    pub target: String,
    pub target_columns: Vec<String>,
}
