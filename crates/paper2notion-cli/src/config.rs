//! Configuration file support for paper2notion CLI
//!
//! Loads settings from `_paper2notion.toml` configuration file.

use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "_paper2notion.toml";

/// File name the `#:schema` directive points to (written by `init --schema`)
pub const SCHEMA_FILE_NAME: &str = "paper2notion.schema.json";

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Line conversion configuration
    #[serde(skip_serializing_if = "ConvertConfig::is_empty")]
    pub convert: ConvertConfig,
    /// Directory conversion configuration
    #[serde(skip_serializing_if = "DirectoryConfig::is_empty")]
    pub directory: DirectoryConfig,
}

/// Line conversion configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct ConvertConfig {
    /// Insert a marker line before blank lines so Notion keeps them (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_break_trick: Option<bool>,
}

impl ConvertConfig {
    fn is_empty(&self) -> bool {
        self.line_break_trick.is_none()
    }
}

/// Directory conversion configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Process subdirectories recursively (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
    /// Number of parallel jobs (defaults to number of CPUs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl DirectoryConfig {
    fn is_empty(&self) -> bool {
        self.recursive.is_none() && self.jobs.is_none()
    }
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Try to load configuration from a directory (looks for `_paper2notion.toml`)
    ///
    /// Returns `Ok(None)` if the config file doesn't exist.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Generate JSON schema for the configuration
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Generate JSON schema as a string
    pub fn json_schema_string() -> Result<String> {
        let schema = Self::json_schema();
        serde_json::to_string_pretty(&schema).context("Failed to serialize JSON schema")
    }

    /// Serialize configuration to TOML string with schema directive
    pub fn to_toml_with_schema(&self) -> Result<String> {
        let toml_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        Ok(format!("#:schema ./{}\n\n{}", SCHEMA_FILE_NAME, toml_content))
    }

    /// Create a sample configuration with common defaults for init command
    pub fn sample() -> Self {
        Config {
            convert: ConvertConfig {
                line_break_trick: Some(false),
            },
            directory: DirectoryConfig {
                recursive: Some(false),
                jobs: None, // use all CPUs
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.convert.line_break_trick.is_none());
        assert!(config.directory.recursive.is_none());
    }

    #[test]
    fn test_parse_convert_section() {
        let config: Config = toml::from_str(
            r#"
            [convert]
            line_break_trick = true
            "#,
        )
        .unwrap();

        assert_eq!(config.convert.line_break_trick, Some(true));
        assert!(config.directory.jobs.is_none());
    }

    #[test]
    fn test_parse_directory_section() {
        let config: Config = toml::from_str(
            r#"
            [directory]
            recursive = true
            jobs = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.directory.recursive, Some(true));
        assert_eq!(config.directory.jobs, Some(4));
        assert!(config.convert.line_break_trick.is_none());
    }

    #[test]
    fn test_parse_invalid_type() {
        let result: std::result::Result<Config, _> = toml::from_str(
            r#"
            [convert]
            line_break_trick = "yes"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[convert]\nline_break_trick = true\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.convert.line_break_trick, Some(true));
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[convert\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_serialize_empty_config() {
        let config = Config::default();
        let toml = config.to_toml_with_schema().unwrap();
        assert!(toml.starts_with("#:schema ./paper2notion.schema.json"));
        // Empty config should have minimal content
        assert!(!toml.contains("[convert]"));
    }

    #[test]
    fn test_serialize_sample_config() {
        let config = Config::sample();
        let toml = config.to_toml_with_schema().unwrap();
        assert!(toml.starts_with("#:schema"));
        assert!(toml.contains("[convert]"));
        assert!(toml.contains("line_break_trick = false"));
        assert!(!toml.contains("jobs"));
    }

    #[test]
    fn test_json_schema_generation() {
        let schema = Config::json_schema_string().unwrap();
        assert!(schema.contains("\"title\""));
        assert!(schema.contains("ConvertConfig"));
        assert!(schema.contains("line_break_trick"));
    }

    #[test]
    fn test_roundtrip() {
        let config = Config::sample();
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.convert.line_break_trick, parsed.convert.line_break_trick);
        assert_eq!(config.directory.recursive, parsed.directory.recursive);
    }
}
