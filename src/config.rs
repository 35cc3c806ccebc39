//! Command-line configuration.
//!
//! Supports TOML config files, environment variable overrides, and defaults.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::PipelineError;
use crate::sql::Dialect;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dialect name, or "auto" to detect from the input (default: "auto")
    pub dialect: String,
    /// Output format (default: json)
    pub format: OutputFormat,
    /// Pretty-print JSON output (default: false)
    pub pretty: bool,
    /// Minimum acceptable overall score; lower scores fail the run
    pub fail_under: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: "auto".to_string(),
            format: OutputFormat::Json,
            pretty: false,
            fail_under: None,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Applies `SCHEMALENS_DIALECT`, `SCHEMALENS_FORMAT` and
    /// `SCHEMALENS_FAIL_UNDER`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("SCHEMALENS_DIALECT") {
            self.dialect = val;
        }
        if let Some(val) = lookup("SCHEMALENS_FORMAT") {
            self.format = OutputFormat::from_str(&val).ok_or(ConfigError::InvalidValue {
                key: "format",
                value: val,
            })?;
        }
        if let Some(val) = lookup("SCHEMALENS_FAIL_UNDER") {
            let threshold = val.parse().map_err(|_| ConfigError::InvalidValue {
                key: "fail_under",
                value: val.clone(),
            })?;
            self.fail_under = Some(threshold);
        }
        Ok(())
    }

    /// Resolves the configured dialect, detecting it from `sql` when "auto".
    pub fn resolve_dialect(&self, sql: &str) -> Result<Dialect, PipelineError> {
        if self.dialect.eq_ignore_ascii_case("auto") {
            return Ok(Dialect::detect(sql));
        }
        Dialect::from_str(&self.dialect)
            .ok_or_else(|| PipelineError::UnsupportedDialect(self.dialect.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dialect, "auto");
        assert_eq!(config.format, OutputFormat::Json);
        assert!(!config.pretty);
        assert_eq!(config.fail_under, None);
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml("format = \"text\"\nfail_under = 70\n").unwrap();
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.fail_under, Some(70));
        assert_eq!(config.dialect, "auto");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml("format = \"yaml\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SCHEMALENS_DIALECT", "mysql"),
            ("SCHEMALENS_FORMAT", "TEXT"),
            ("SCHEMALENS_FAIL_UNDER", "55"),
        ]);
        let mut config = Config::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.dialect, "mysql");
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.fail_under, Some(55));

        let err = Config::default()
            .apply_overrides(|key| (key == "SCHEMALENS_FAIL_UNDER").then(|| "lots".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "fail_under", .. }));
    }

    #[test]
    fn test_resolve_dialect() {
        let mut config = Config::default();
        assert_eq!(
            config.resolve_dialect("CREATE TABLE `t` (id int)").unwrap(),
            Dialect::MySql
        );
        config.dialect = "sqlserver".to_string();
        assert_eq!(config.resolve_dialect("").unwrap(), Dialect::MsSql);
        config.dialect = "oracle".to_string();
        assert!(matches!(
            config.resolve_dialect(""),
            Err(PipelineError::UnsupportedDialect(d)) if d == "oracle"
        ));
    }
}
