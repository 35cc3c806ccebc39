//! SQL dialect selection and detection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// SQL dialects accepted by the importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// MySQL / MariaDB dumps
    MySql,
    /// PostgreSQL
    #[default]
    Postgres,
    /// Microsoft SQL Server
    MsSql,
}

impl Dialect {
    /// Parse dialect from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mysql" | "mariadb" => Some(Self::MySql),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            "mssql" | "sqlserver" | "tsql" => Some(Self::MsSql),
            _ => None,
        }
    }

    /// Lower-case name used in messages and JSON.
    pub fn name(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::MsSql => "mssql",
        }
    }

    /// Detect dialect from SQL content.
    pub fn detect(content: &str) -> Self {
        let lower = content.to_lowercase();

        // Check header comments
        if lower.contains("mysql dump") || lower.contains("mysqldump") || lower.contains("-- mysql")
        {
            return Self::MySql;
        }
        if lower.contains("postgresql database dump") || lower.contains("pg_dump") {
            return Self::Postgres;
        }

        // Check type keywords
        if lower.contains('`')
            || lower.contains("auto_increment")
            || lower.contains("engine=")
            || lower.contains("unsigned")
        {
            return Self::MySql;
        }
        if lower.contains("identity(")
            || lower.contains("nvarchar")
            || lower.contains("datetime2")
            || lower.contains("[dbo]")
        {
            return Self::MsSql;
        }

        Self::Postgres
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_aliases() {
        assert_eq!(Dialect::from_str("MySQL"), Some(Dialect::MySql));
        assert_eq!(Dialect::from_str("postgresql"), Some(Dialect::Postgres));
        assert_eq!(Dialect::from_str("sqlserver"), Some(Dialect::MsSql));
        assert_eq!(Dialect::from_str("oracle"), None);
    }

    #[test]
    fn test_detect_mysql() {
        let sql = "-- MySQL dump\nCREATE TABLE `users` (id INT AUTO_INCREMENT);";
        assert_eq!(Dialect::detect(sql), Dialect::MySql);
    }

    #[test]
    fn test_detect_mssql() {
        let sql = "CREATE TABLE [dbo].[users] ([id] INT IDENTITY(1,1), [name] NVARCHAR(50));";
        assert_eq!(Dialect::detect(sql), Dialect::MsSql);
    }

    #[test]
    fn test_detect_falls_back_to_postgres() {
        let sql = "CREATE TABLE users (id SERIAL PRIMARY KEY);";
        assert_eq!(Dialect::detect(sql), Dialect::Postgres);
    }
}
