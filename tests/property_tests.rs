use proptest::prelude::*;
use schemalens::analyzer::{
    Impact, SecurityCategory, SecurityIssue, Severity, analyze_schema, security_score,
};
use schemalens::graph::{
    ConstraintTag, Field, Relationship, RelationshipKind, RelationshipType, SchemaGraph, Table,
};
use schemalens::sql::{Dialect, normalize};

const MYSQL_COLUMNS: &[&str] = &[
    "`id` int(11) unsigned NOT NULL AUTO_INCREMENT",
    "`name` varchar(255) COLLATE utf8mb4_unicode_ci DEFAULT ''",
    "`flag` tinyint(1) NOT NULL DEFAULT '0'",
    "`born` datetime DEFAULT '0000-00-00 00:00:00'",
    "`bio` text(200) COMMENT 'about'",
    "`seen` timestamp NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP",
    "`big` bigint(20) ZEROFILL",
    "PRIMARY KEY (`id`)",
    "KEY `idx_name` (`name`)",
    "UNIQUE KEY `uq` (`name`(10))",
    "CONSTRAINT `fk` FOREIGN KEY (`id`) REFERENCES `db`.`other` (`id`) ON DELETE CASCADE",
];

fn mysql_table() -> impl Strategy<Value = String> {
    (
        "[a-z]{1,8}",
        prop::collection::vec(prop::sample::select(MYSQL_COLUMNS), 1..8),
        any::<bool>(),
    )
        .prop_map(|(name, columns, prefixed)| {
            let name = if prefixed { format!("`db`.`{name}`") } else { format!("`{name}`") };
            format!(
                "CREATE TABLE {name} (\n  {}\n) ENGINE=InnoDB AUTO_INCREMENT=5 DEFAULT CHARSET=utf8mb4;",
                columns.join(",\n  ")
            )
        })
}

fn field() -> impl Strategy<Value = Field> {
    (
        "[a-z]{1,6}(_id)?",
        prop::sample::select(vec!["integer", "varchar(20)", "varchar(2000)", "text", "float", "jsonb", "timestamp"]),
        prop::collection::btree_set(
            prop::sample::select(vec![
                ConstraintTag::Pk,
                ConstraintTag::CompositePk,
                ConstraintTag::Fk,
                ConstraintTag::Unique,
                ConstraintTag::NotNull,
            ]),
            0..3,
        ),
    )
        .prop_map(|(name, typ, constraints)| Field {
            name,
            typ: typ.to_string(),
            constraints,
        })
}

fn graph() -> impl Strategy<Value = SchemaGraph> {
    let tables = prop::collection::vec(
        ("[a-z_]{1,8}", prop::collection::vec(field(), 0..8)).prop_map(|(n, f)| Table::new(n, f)),
        0..6,
    );
    let relationships = prop::collection::vec(
        ("[a-z]{1,3}", "[a-z]{1,3}").prop_map(|(source, target)| Relationship {
            id: format!("ref:{source}.x->{target}.id"),
            source,
            target,
            source_field: "x".to_string(),
            target_field: "id".to_string(),
            typ: RelationshipType {
                kind: RelationshipKind::OneToMany,
                source_required: false,
                target_required: false,
            },
        }),
        0..8,
    );
    (tables, relationships).prop_map(|(tables, relationships)| SchemaGraph {
        tables,
        relationships,
    })
}

fn issue() -> impl Strategy<Value = SecurityIssue> {
    (
        prop::sample::select(vec![Severity::Critical, Severity::Warning, Severity::Info]),
        prop::sample::select(vec![Impact::High, Impact::Medium, Impact::Low]),
    )
        .prop_map(|(severity, impact)| SecurityIssue {
            severity,
            category: SecurityCategory::Integrity,
            title: "generated".to_string(),
            description: String::new(),
            table: None,
            field: None,
            recommendation: String::new(),
            impact,
        })
}

proptest! {
    #[test]
    fn mysql_normalization_is_idempotent(tables in prop::collection::vec(mysql_table(), 1..4)) {
        let sql = tables.join("\n\n");
        let once = normalize(&sql, Dialect::MySql);
        prop_assert_eq!(normalize(&once, Dialect::MySql), once);
    }

    #[test]
    fn summary_counts_match_graph(graph in graph()) {
        let result = analyze_schema(&graph);
        prop_assert_eq!(result.summary.total_tables, graph.tables.len());
        prop_assert_eq!(result.summary.total_relationships, graph.relationships.len());
        prop_assert!(result.overall_score <= 100);
    }

    #[test]
    fn analysis_is_deterministic(graph in graph()) {
        let first = analyze_schema(&graph).to_json().unwrap();
        let second = analyze_schema(&graph).to_json().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn extra_critical_issue_never_raises_security_score(
        issues in prop::collection::vec(issue(), 0..12),
        impact in prop::sample::select(vec![Impact::High, Impact::Medium, Impact::Low]),
    ) {
        let before = security_score(&issues);
        let mut more = issues.clone();
        more.push(SecurityIssue {
            severity: Severity::Critical,
            category: SecurityCategory::DataProtection,
            title: "extra".to_string(),
            description: String::new(),
            table: None,
            field: None,
            recommendation: String::new(),
            impact,
        });
        prop_assert!(security_score(&more) <= before);
    }
}
