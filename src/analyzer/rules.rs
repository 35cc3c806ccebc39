//! Declarative rule tables for per-field and per-table checks.
//!
//! Each rule pairs a predicate with a finding template. Templates may mention
//! `{table}`, `{field}` and `{type}`, which are filled from the matched subject.

use super::findings::{
    Impact, NormalForm, NormalizationIssue, NormalizationKind, SecurityCategory, SecurityIssue,
    Severity,
};
use super::reserved::is_reserved;
use crate::graph::{ConstraintTag, Field, Table, is_fk_like};

pub fn interpolate(template: &str, table: &Table, field: Option<&Field>) -> String {
    let mut out = template.replace("{table}", &table.name);
    if let Some(field) = field {
        out = out.replace("{field}", &field.name).replace("{type}", &field.typ);
    }
    out
}

pub struct SecurityTemplate {
    pub severity: Severity,
    pub category: SecurityCategory,
    pub impact: Impact,
    pub title: &'static str,
    pub description: &'static str,
    pub recommendation: &'static str,
}

impl SecurityTemplate {
    pub fn render(&self, table: &Table, field: Option<&Field>) -> SecurityIssue {
        SecurityIssue {
            severity: self.severity,
            category: self.category,
            title: interpolate(self.title, table, field),
            description: interpolate(self.description, table, field),
            table: Some(table.name.clone()),
            field: field.map(|f| f.name.clone()),
            recommendation: interpolate(self.recommendation, table, field),
            impact: self.impact,
        }
    }
}

pub struct FieldRule {
    pub applies: fn(&Table, &Field) -> bool,
    pub finding: SecurityTemplate,
}

pub struct TableRule {
    pub applies: fn(&Table) -> bool,
    pub finding: SecurityTemplate,
}

pub struct NormalizationRule {
    pub applies: fn(&Field) -> bool,
    pub kind: NormalizationKind,
    pub normal_form: NormalForm,
    pub title: &'static str,
    pub description: &'static str,
    pub recommendation: &'static str,
}

impl NormalizationRule {
    pub fn render(&self, table: &Table, field: &Field) -> NormalizationIssue {
        NormalizationIssue {
            kind: self.kind,
            normal_form: self.normal_form,
            title: self.title.to_string(),
            description: interpolate(self.description, table, Some(field)),
            table: table.name.clone(),
            fields: vec![field.name.clone()],
            recommendation: interpolate(self.recommendation, table, Some(field)),
        }
    }
}

// Name and type helpers shared by the check families.

/// Lower-cased underscore-delimited name tokens.
pub fn tokens(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split('_')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn contains_any(name: &str, needles: &[&str]) -> bool {
    let lower = name.to_lowercase();
    needles.iter().any(|n| lower.contains(n))
}

fn has_token(name: &str, wanted: &[&str]) -> bool {
    tokens(name).iter().any(|t| wanted.contains(&t.as_str()))
}

/// Type name without arguments or array suffix: `varchar(20)` -> `varchar`.
pub fn base_type(typ: &str) -> String {
    let lower = typ.to_lowercase();
    let end = lower.find(['(', '[']).unwrap_or(lower.len());
    lower[..end].trim().to_string()
}

/// Declared VARCHAR length; `varchar(max)` counts as unbounded.
pub fn varchar_length(typ: &str) -> Option<u32> {
    let lower = typ.to_lowercase();
    if !matches!(base_type(&lower).as_str(), "varchar" | "nvarchar" | "character varying") {
        return None;
    }
    let args = lower.split_once('(')?.1.split_once(')')?.0.trim();
    if args == "max" {
        return Some(u32::MAX);
    }
    args.split(',').next()?.trim().parse().ok()
}

pub fn is_text_type(typ: &str) -> bool {
    base_type(typ).ends_with("text")
}

pub fn is_string_type(typ: &str) -> bool {
    let base = base_type(typ);
    is_text_type(&base) || matches!(base.as_str(), "varchar" | "nvarchar" | "char" | "nchar" | "string")
}

pub fn is_password(field: &Field) -> bool {
    contains_any(&field.name, &["password", "passwd", "pwd"])
}

fn looks_hashed(field: &Field) -> bool {
    contains_any(&field.name, &["hash", "encrypted"])
}

const SENSITIVE: &[&str] = &[
    "ssn",
    "social_security",
    "credit_card",
    "card_number",
    "cvv",
    "cvc",
    "bank_account",
    "account_number",
    "routing_number",
    "iban",
    "tax_id",
    "passport",
    "driver_license",
    "drivers_license",
    "national_id",
];

fn is_sensitive(field: &Field) -> bool {
    contains_any(&field.name, SENSITIVE) && !looks_hashed(field)
}

const CRITICAL_NAMES: &[&str] = &[
    "id", "email", "password", "username", "amount", "total", "price", "payment", "status",
];

const CURRENCY_NAMES: &[&str] = &[
    "price", "amount", "cost", "total", "balance", "salary", "fee", "payment", "revenue",
];

pub fn is_currency(field: &Field) -> bool {
    has_token(&field.name, CURRENCY_NAMES) && !is_fk_like(&field.name)
}

fn is_float_type(typ: &str) -> bool {
    matches!(
        base_type(typ).as_str(),
        "float" | "real" | "double" | "double precision" | "float4" | "float8"
    )
}

fn is_exact_numeric(typ: &str) -> bool {
    matches!(base_type(typ).as_str(), "decimal" | "numeric" | "money")
}

fn is_boolean_like(field: &Field) -> bool {
    let lower = field.name.to_lowercase();
    matches!(lower.as_str(), "active" | "enabled" | "status")
        || lower.starts_with("is_")
        || lower.starts_with("has_")
}

/// Small junction or lookup tables are exempt from audit and key checks.
pub fn is_system_table(table: &Table) -> bool {
    table.name.contains('_') && table.fields.len() <= 3
}

fn has_field_like(table: &Table, needle: &str) -> bool {
    table
        .fields
        .iter()
        .any(|f| f.name.to_lowercase().contains(needle))
}

fn has_field_named(table: &Table, names: &[&str]) -> bool {
    table
        .fields
        .iter()
        .any(|f| names.iter().any(|n| f.name.eq_ignore_ascii_case(n)))
}

pub fn has_created_at(table: &Table) -> bool {
    has_field_named(table, &["created_at", "created_on"])
}

pub fn has_updated_at(table: &Table) -> bool {
    has_field_named(table, &["updated_at", "updated_on", "modified_at"])
}

pub fn has_deleted_at(table: &Table) -> bool {
    has_field_named(table, &["deleted_at"])
}

fn is_important(table: &Table) -> bool {
    table.has_primary_key()
        || contains_any(&table.name, &["user", "customer"])
        || has_field_like(table, "user")
        || has_field_like(table, "customer")
}

pub static SECURITY_FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        applies: |_, f| is_password(f) && !looks_hashed(f),
        finding: SecurityTemplate {
            severity: Severity::Critical,
            category: SecurityCategory::Authentication,
            impact: Impact::High,
            title: "Potential Plain Text Password Storage",
            description: "Field '{field}' in table '{table}' appears to store passwords without hashing.",
            recommendation: "Store only salted hashes (bcrypt, scrypt or argon2) and rename the column to make that explicit, e.g. '{field}_hash'.",
        },
    },
    FieldRule {
        applies: |_, f| is_password(f) && varchar_length(&f.typ).is_some_and(|n| n < 60),
        finding: SecurityTemplate {
            severity: Severity::Warning,
            category: SecurityCategory::Authentication,
            impact: Impact::Medium,
            title: "Insufficient Password Hash Length",
            description: "Field '{field}' in table '{table}' is declared as {type}, too short to hold a modern password hash.",
            recommendation: "Use at least VARCHAR(60) for bcrypt hashes, VARCHAR(255) leaves room for other algorithms.",
        },
    },
    FieldRule {
        applies: |_, f| is_sensitive(f),
        finding: SecurityTemplate {
            severity: Severity::Critical,
            category: SecurityCategory::DataProtection,
            impact: Impact::High,
            title: "Unencrypted Sensitive Data",
            description: "Field '{field}' in table '{table}' looks like sensitive personal or financial data stored in clear.",
            recommendation: "Encrypt '{field}' at rest or tokenize it, and restrict who can read it.",
        },
    },
    FieldRule {
        applies: |_, f| {
            f.name.to_lowercase().contains("email")
                && !f.has(ConstraintTag::Unique)
                && !f.is_key()
        },
        finding: SecurityTemplate {
            severity: Severity::Warning,
            category: SecurityCategory::Integrity,
            impact: Impact::Medium,
            title: "Email Without Unique Constraint",
            description: "Field '{field}' in table '{table}' allows duplicate email addresses.",
            recommendation: "Add a UNIQUE constraint on '{table}.{field}' if emails identify accounts.",
        },
    },
    FieldRule {
        applies: |_, f| is_text_type(&f.typ) || varchar_length(&f.typ).is_some_and(|n| n > 1000),
        finding: SecurityTemplate {
            severity: Severity::Info,
            category: SecurityCategory::InputValidation,
            impact: Impact::Low,
            title: "Large Text Field Requires Input Validation",
            description: "Field '{field}' ({type}) in table '{table}' accepts large free-form input.",
            recommendation: "Validate and sanitize input for '{field}' and use parameterized queries.",
        },
    },
    FieldRule {
        applies: |_, f| {
            has_token(&f.name, CRITICAL_NAMES)
                && !f.is_key()
                && !f.has(ConstraintTag::Fk)
                && !f.has(ConstraintTag::NotNull)
        },
        finding: SecurityTemplate {
            severity: Severity::Warning,
            category: SecurityCategory::Integrity,
            impact: Impact::Medium,
            title: "Critical Field Allows NULL",
            description: "Field '{field}' in table '{table}' is critical but has no NOT NULL constraint.",
            recommendation: "Declare '{field}' as NOT NULL.",
        },
    },
    FieldRule {
        applies: |_, f| is_reserved(&f.name),
        finding: SecurityTemplate {
            severity: Severity::Info,
            category: SecurityCategory::Naming,
            impact: Impact::Low,
            title: "Reserved Word Used as Field Name",
            description: "Field '{field}' in table '{table}' is an SQL reserved word.",
            recommendation: "Rename '{field}' to avoid quoting issues and injection-prone dynamic SQL.",
        },
    },
];

pub static SECURITY_TABLE_RULES: &[TableRule] = &[
    TableRule {
        applies: |t| !is_system_table(t) && !t.has_primary_key(),
        finding: SecurityTemplate {
            severity: Severity::Critical,
            category: SecurityCategory::Integrity,
            impact: Impact::High,
            title: "Missing Primary Key",
            description: "Table '{table}' has no primary key.",
            recommendation: "Add a primary key to '{table}' so rows can be identified and referenced safely.",
        },
    },
    TableRule {
        applies: |t| !is_system_table(t) && !has_created_at(t),
        finding: SecurityTemplate {
            severity: Severity::Warning,
            category: SecurityCategory::Audit,
            impact: Impact::Low,
            title: "Missing Creation Timestamp",
            description: "Table '{table}' does not record when rows are created.",
            recommendation: "Add a 'created_at' timestamp column to '{table}'.",
        },
    },
    TableRule {
        applies: |t| !is_system_table(t) && !has_updated_at(t),
        finding: SecurityTemplate {
            severity: Severity::Info,
            category: SecurityCategory::Audit,
            impact: Impact::Low,
            title: "Missing Update Timestamp",
            description: "Table '{table}' does not record when rows change.",
            recommendation: "Add an 'updated_at' timestamp column to '{table}'.",
        },
    },
    TableRule {
        applies: |t| !is_system_table(t) && is_important(t) && !has_deleted_at(t),
        finding: SecurityTemplate {
            severity: Severity::Info,
            category: SecurityCategory::Audit,
            impact: Impact::Low,
            title: "Consider Soft Delete",
            description: "Table '{table}' holds important records but deletes are irreversible.",
            recommendation: "Consider a 'deleted_at' column on '{table}' for soft deletes and audit history.",
        },
    },
    TableRule {
        applies: |t| {
            contains_any(&t.name, &["user", "account"])
                && !t
                    .fields
                    .iter()
                    .any(|f| contains_any(&f.name, &["role", "permission", "access"]))
        },
        finding: SecurityTemplate {
            severity: Severity::Warning,
            category: SecurityCategory::AccessControl,
            impact: Impact::Medium,
            title: "Missing Access Control Fields",
            description: "Table '{table}' stores users or accounts but has no role or permission field.",
            recommendation: "Add a role or permission column to '{table}', or link it to a roles table.",
        },
    },
    TableRule {
        applies: |t| is_reserved(&t.name),
        finding: SecurityTemplate {
            severity: Severity::Warning,
            category: SecurityCategory::Naming,
            impact: Impact::Medium,
            title: "Reserved Word Used as Table Name",
            description: "Table '{table}' is named after an SQL reserved word.",
            recommendation: "Rename '{table}' to avoid quoting issues and injection-prone dynamic SQL.",
        },
    },
];

pub static NORMALIZATION_FIELD_RULES: &[NormalizationRule] = &[
    NormalizationRule {
        applies: |f| {
            contains_any(
                &f.name,
                &["list", "array", "comma", "separated", "multiple", "tags", "categories"],
            )
        },
        kind: NormalizationKind::Violation,
        normal_form: NormalForm::First,
        title: "Potential Multi-Valued Attribute",
        description: "Field '{field}' in table '{table}' appears to hold several values in one column.",
        recommendation: "Move the values of '{field}' into a separate table with one row per value.",
    },
    NormalizationRule {
        applies: |f| matches!(base_type(&f.typ).as_str(), "json" | "jsonb"),
        kind: NormalizationKind::Suggestion,
        normal_form: NormalForm::First,
        title: "JSON Column May Hide Structure",
        description: "Field '{field}' in table '{table}' is {type} and may contain repeating groups.",
        recommendation: "Promote frequently queried keys of '{field}' to proper columns or tables.",
    },
    NormalizationRule {
        applies: |f| varchar_length(&f.typ).is_some_and(|n| n > 1000),
        kind: NormalizationKind::Suggestion,
        normal_form: NormalForm::DataTypes,
        title: "Oversized VARCHAR",
        description: "Field '{field}' in table '{table}' is declared as {type}.",
        recommendation: "Use TEXT for '{field}' instead of a very long VARCHAR.",
    },
    NormalizationRule {
        applies: |f| is_currency(f) && is_float_type(&f.typ),
        kind: NormalizationKind::Violation,
        normal_form: NormalForm::DataTypes,
        title: "Floating Point Currency",
        description: "Monetary field '{field}' in table '{table}' uses {type}, which rounds amounts.",
        recommendation: "Never use floats for money: declare '{field}' as DECIMAL(19,4) or similar.",
    },
    NormalizationRule {
        applies: |f| is_currency(f) && !is_float_type(&f.typ) && !is_exact_numeric(&f.typ),
        kind: NormalizationKind::Warning,
        normal_form: NormalForm::DataTypes,
        title: "Imprecise Currency Type",
        description: "Monetary field '{field}' in table '{table}' uses {type} instead of an exact numeric type.",
        recommendation: "Declare '{field}' as DECIMAL, NUMERIC or MONEY.",
    },
    NormalizationRule {
        applies: |f| is_boolean_like(f) && is_string_type(&f.typ),
        kind: NormalizationKind::Suggestion,
        normal_form: NormalForm::DataTypes,
        title: "Boolean Stored as String",
        description: "Field '{field}' in table '{table}' looks like a flag but is stored as {type}.",
        recommendation: "Use BOOLEAN (or an enum for multi-state values) for '{field}'.",
    },
];
