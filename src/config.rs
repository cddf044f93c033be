//! YAML configuration file support.
//!
//! One file configures the preview processor and the binary's logging, so a
//! deployment can tune object-URL handling and registry aliases without a
//! rebuild.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # filelens configuration
//! version: "1.0"
//! name: "desktop viewer"
//!
//! preview:
//!   version: 1
//!   object_urls: true
//!   blob_origin: "viewer"
//!   strict_cleanup: true
//!   max_inline_bytes: 1048576
//!   max_object_urls: 512
//!   extension_aliases:
//!     mdx: "markdown"
//!     jsonl: "json"
//!
//! logging:
//!   level: "info"
//!   json: false
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use preview::{ConfigError, DEFAULT_BLOB_ORIGIN, PreviewConfig, TypeId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("invalid preview config: {0}")]
    Preview(#[from] ConfigError),
}

/// Top-level YAML configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FilelensConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// Preview processor configuration
    #[serde(default)]
    pub preview: PreviewYamlConfig,

    /// Log output of the binary
    #[serde(default)]
    pub logging: LoggingYamlConfig,
}

impl FilelensConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: FilelensConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.preview.to_preview_config()?;
        self.logging.validate()?;

        Ok(())
    }

    /// Runtime configuration for the preview processor.
    pub fn preview_config(&self) -> Result<PreviewConfig, ConfigLoadError> {
        self.preview.to_preview_config()
    }
}

impl Default for FilelensConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            preview: PreviewYamlConfig::default(),
            logging: LoggingYamlConfig::default(),
        }
    }
}

/// Preview processor YAML configuration.
///
/// Alias targets are type names (`markdown`, `csv`, ...) matched
/// case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "true_value")]
    pub object_urls: bool,

    #[serde(default = "default_blob_origin")]
    pub blob_origin: String,

    #[serde(default = "true_value")]
    pub strict_cleanup: bool,

    #[serde(default)]
    pub max_inline_bytes: Option<usize>,

    #[serde(default)]
    pub max_object_urls: Option<usize>,

    #[serde(default)]
    pub extension_aliases: BTreeMap<String, String>,
}

impl PreviewYamlConfig {
    fn to_preview_config(&self) -> Result<PreviewConfig, ConfigLoadError> {
        let mut extension_aliases = BTreeMap::new();
        for (extension, type_name) in &self.extension_aliases {
            let type_id = TypeId::from_name(type_name).ok_or_else(|| {
                ConfigLoadError::Validation(format!(
                    "preview.extension_aliases.{extension}: unknown type {type_name:?}"
                ))
            })?;
            extension_aliases.insert(extension.to_ascii_lowercase(), type_id);
        }

        let config = PreviewConfig {
            version: self.version,
            object_urls: self.object_urls,
            blob_origin: self.blob_origin.clone(),
            strict_cleanup: self.strict_cleanup,
            max_inline_bytes: self.max_inline_bytes,
            max_object_urls: self.max_object_urls,
            extension_aliases,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for PreviewYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            object_urls: true,
            blob_origin: DEFAULT_BLOB_ORIGIN.to_string(),
            strict_cleanup: true,
            max_inline_bytes: None,
            max_object_urls: None,
            extension_aliases: BTreeMap::new(),
        }
    }
}

/// Logging YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingYamlConfig {
    /// `EnvFilter` directive, e.g. `info` or `preview=debug,warn`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl LoggingYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.level.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "logging.level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LoggingYamlConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_version() -> u32 {
    1
}
fn true_value() -> bool {
    true
}
fn default_blob_origin() -> String {
    DEFAULT_BLOB_ORIGIN.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "test config"
preview:
  blob_origin: "viewer"
  max_inline_bytes: 4096
  extension_aliases:
    mdx: "Markdown"
logging:
  level: "debug"
"#;

        let config = FilelensConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.name, Some("test config".to_string()));
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.json);

        let preview = config.preview_config().unwrap();
        assert_eq!(preview.blob_origin, "viewer");
        assert_eq!(preview.max_inline_bytes, Some(4096));
        assert!(preview.object_urls);
        assert_eq!(preview.extension_aliases.get("mdx"), Some(&TypeId::Markdown));
    }

    #[test]
    fn test_documented_example_loads() {
        let yaml = r#"
# filelens configuration
version: "1.0"
name: "desktop viewer"

preview:
  version: 1
  object_urls: true
  blob_origin: "viewer"
  strict_cleanup: true
  max_inline_bytes: 1048576
  max_object_urls: 512
  extension_aliases:
    mdx: "markdown"
    jsonl: "json"

logging:
  level: "info"
  json: false
"#;

        let config = FilelensConfig::from_yaml(yaml).unwrap();
        let preview = config.preview_config().unwrap();
        assert_eq!(preview.max_object_urls, Some(512));
        assert_eq!(preview.extension_aliases.get("jsonl"), Some(&TypeId::Json));
        assert_eq!(preview.extension_aliases.get("mdx"), Some(&TypeId::Markdown));
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1"
preview:
  object_urls: false
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = FilelensConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.version, "1");
        assert!(!config.preview_config().unwrap().object_urls);
    }

    #[test]
    fn test_missing_file() {
        let result = FilelensConfig::from_file("/nonexistent/filelens.yaml");
        assert!(matches!(result, Err(ConfigLoadError::FileRead(_))));
    }

    #[test]
    fn test_default_config() {
        let config = FilelensConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.name.is_none());
        assert_eq!(config.preview_config().unwrap(), PreviewConfig::default());
    }

    #[test]
    fn test_unsupported_version() {
        let result = FilelensConfig::from_yaml("version: \"2.0\"\n");
        assert!(matches!(result, Err(ConfigLoadError::UnsupportedVersion(v)) if v == "2.0"));
    }

    #[test]
    fn test_unknown_alias_target() {
        let yaml = r#"
version: "1.0"
preview:
  extension_aliases:
    holo: "hologram"
"#;
        let err = FilelensConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("hologram"));
    }

    #[test]
    fn test_preview_validation() {
        let yaml = r#"
version: "1.0"
preview:
  max_object_urls: 0
"#;
        let result = FilelensConfig::from_yaml(yaml);
        assert!(matches!(
            result,
            Err(ConfigLoadError::Preview(ConfigError::ZeroObjectUrlCapacity))
        ));
    }

    #[test]
    fn test_alias_cannot_shadow_builtin() {
        let yaml = r#"
version: "1.0"
preview:
  extension_aliases:
    png: "markdown"
"#;
        let result = FilelensConfig::from_yaml(yaml);
        assert!(matches!(
            result,
            Err(ConfigLoadError::Preview(ConfigError::AliasShadowsBuiltin { .. }))
        ));
    }

    #[test]
    fn test_empty_log_level() {
        let yaml = r#"
version: "1.0"
logging:
  level: "  "
"#;
        let err = FilelensConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }
}
