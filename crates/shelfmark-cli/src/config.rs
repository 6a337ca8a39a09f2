//! Configuration management for the CLI.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// CLI configuration, stored at `~/.shelfmark/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Registry database path; defaults to `~/.shelfmark/registry.db`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_path: Option<PathBuf>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

impl Config {
    /// Default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".shelfmark").join("config.toml"))
    }

    /// Load configuration from the given path, or the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::path()?,
        };

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Resolve the registry path: explicit override, then config, then the
    /// default next to the config file.
    pub fn resolve_registry_path(&self, override_path: Option<&Path>) -> Result<PathBuf> {
        if let Some(p) = override_path {
            return Ok(p.to_path_buf());
        }
        if let Some(p) = &self.registry_path {
            return Ok(p.clone());
        }
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".shelfmark").join("registry.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses_from_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.registry_path.is_none());
        assert!(config.settings.color);
        assert!(matches!(config.settings.format, OutputFormat::Table));
    }

    #[test]
    fn test_explicit_override_wins() {
        let config = Config {
            registry_path: Some(PathBuf::from("/configured.db")),
            ..Config::default()
        };
        let resolved = config
            .resolve_registry_path(Some(Path::new("/override.db")))
            .unwrap();
        assert_eq!(resolved, PathBuf::from("/override.db"));

        let resolved = config.resolve_registry_path(None).unwrap();
        assert_eq!(resolved, PathBuf::from("/configured.db"));
    }

    #[test]
    fn test_round_trip() {
        let config = Config {
            registry_path: Some(PathBuf::from("/data/registry.db")),
            settings: Settings {
                color: false,
                format: OutputFormat::Json,
            },
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.registry_path, config.registry_path);
        assert!(!parsed.settings.color);
    }
}
