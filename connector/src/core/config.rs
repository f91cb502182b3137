use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{APP_DOT_FOLDER, CONFIG_FILE_NAME};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// One connector block: its component type plus the component's own arguments
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectorFileConfig {
    /// Registered component name, e.g. `otelcol.connector.spanmetrics`
    #[serde(rename = "type")]
    pub component: String,
    /// Everything else is handed to the component's argument decoder
    #[serde(flatten)]
    pub arguments: serde_json::Map<String, serde_json::Value>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Connector blocks keyed by label
    pub connectors: Option<BTreeMap<String, ConnectorFileConfig>>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence).
    ///
    /// Connector blocks are replaced whole, by label.
    fn merge(&mut self, other: FileConfig) {
        if let Some(connectors) = other.connectors {
            let current = self.connectors.get_or_insert_with(BTreeMap::new);
            for (label, connector) in connectors {
                tracing::trace!(label = %label, component = %connector.component, "Merging connector");
                current.insert(label, connector);
            }
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// A connector instance ready to be built
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    pub label: String,
    pub component: String,
    pub arguments: serde_json::Value,
}

impl ConnectorConfig {
    /// Instance id: component name followed by the label
    pub fn id(&self) -> String {
        format!("{}.{}", self.component, self.label)
    }
}

/// Final merged configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Config files that were read, in merge order
    pub sources: Vec<PathBuf>,
    pub connectors: Vec<ConnectorConfig>,
}

impl AppConfig {
    /// Load configuration with priority (lowest to highest):
    /// 1. Profile directory config (~/.spanmetrics/spanmetrics.json)
    /// 2. Local directory config OR CLI-specified config path
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut sources: Vec<PathBuf> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            sources.push(profile_path);
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            sources.push(path);
        }

        if sources.is_empty() {
            anyhow::bail!(
                "No config file found. Pass --config or create {} in the current directory",
                CONFIG_FILE_NAME
            );
        }

        tracing::debug!(configs = ?sources, "Config files loaded");

        let connectors = file_config
            .connectors
            .unwrap_or_default()
            .into_iter()
            .map(|(label, connector)| ConnectorConfig {
                label,
                component: connector.component,
                arguments: serde_json::Value::Object(connector.arguments),
            })
            .collect();

        let config = Self {
            sources,
            connectors,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.connectors.is_empty() {
            tracing::warn!("Config declares no connectors");
        }

        for connector in &self.connectors {
            if connector.label.is_empty() {
                anyhow::bail!(
                    "Configuration error: connector label must not be empty (type {})",
                    connector.component
                );
            }
        }

        Ok(())
    }
}

/// Get the profile config path (~/.spanmetrics/spanmetrics.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Expand `~` and make relative paths absolute
fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    let expanded = if path == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(path))
    } else if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path))
    } else {
        PathBuf::from(path)
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn cli_for(file: &tempfile::NamedTempFile) -> CliConfig {
        CliConfig {
            config: Some(file.path().to_path_buf()),
        }
    }

    #[test]
    fn test_file_config_parse_connector() {
        let json = r#"{
            "connectors": {
                "default": {
                    "type": "otelcol.connector.spanmetrics",
                    "histogram": { "explicit": {} }
                }
            }
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let connectors = config.connectors.unwrap();
        let connector = &connectors["default"];
        assert_eq!(connector.component, "otelcol.connector.spanmetrics");
        assert!(connector.arguments.contains_key("histogram"));
        assert!(!connector.arguments.contains_key("type"));
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config: FileConfig = serde_json::from_str("{}").unwrap();
        assert!(config.connectors.is_none());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "connectors": {}, "exporters": 1 }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.extra.get("exporters").unwrap(), 1);
    }

    #[test]
    fn test_file_config_connector_requires_type() {
        let json = r#"{ "connectors": { "default": { "namespace": "x" } } }"#;
        assert!(serde_json::from_str::<FileConfig>(json).is_err());
    }

    #[test]
    fn test_file_config_merge_replaces_by_label() {
        let mut base: FileConfig = serde_json::from_str(
            r#"{ "connectors": {
                "a": { "type": "t", "namespace": "base" },
                "b": { "type": "t" }
            } }"#,
        )
        .unwrap();
        let overlay: FileConfig = serde_json::from_str(
            r#"{ "connectors": { "a": { "type": "t", "dimensions_cache_size": 5 } } }"#,
        )
        .unwrap();

        base.merge(overlay);

        let connectors = base.connectors.unwrap();
        assert_eq!(connectors.len(), 2);
        assert!(!connectors["a"].arguments.contains_key("namespace"));
        assert_eq!(connectors["a"].arguments["dimensions_cache_size"], 5);
    }

    #[test]
    fn test_app_config_load_from_cli_path() {
        let file = write_config(
            r#"{ "connectors": { "default": { "type": "otelcol.connector.spanmetrics" } } }"#,
        );
        let config = AppConfig::load(&cli_for(&file)).unwrap();

        assert_eq!(config.connectors.len(), 1);
        assert_eq!(config.connectors[0].id(), "otelcol.connector.spanmetrics.default");
        assert!(config.sources.iter().any(|p| p == file.path()));
    }

    #[test]
    fn test_app_config_missing_file() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/spanmetrics.json")),
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_app_config_invalid_json() {
        let file = write_config("{ not json");
        let err = AppConfig::load(&cli_for(&file)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_app_config_empty_label() {
        let file = write_config(r#"{ "connectors": { "": { "type": "t" } } }"#);
        let err = AppConfig::load(&cli_for(&file)).unwrap_err();
        assert!(err.to_string().contains("label must not be empty"));
    }

    #[test]
    fn test_expand_path_absolute() {
        assert_eq!(expand_path("/etc/spanmetrics.json"), PathBuf::from("/etc/spanmetrics.json"));
        assert!(expand_path("spanmetrics.json").is_absolute());
    }
}
