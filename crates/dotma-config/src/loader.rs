//! Configuration loading from YAML files.

use std::path::PathBuf;

use tracing::info;

use crate::schema::Config;
use dotma_common::{DotmaError, Result};

/// Configuration loader.
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads and validates configuration from file.
    pub async fn load(&self) -> Result<Config> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DotmaError::Config(format!(
                "Failed to read config file {}: {e}",
                self.path.display()
            ))
        })?;

        let config = Self::parse(&raw)?;
        info!("Loaded configuration from {}", self.path.display());
        Ok(config)
    }

    /// Parses and validates configuration from a YAML string.
    pub fn parse(raw: &str) -> Result<Config> {
        let config: Config = serde_yaml::from_str(raw)
            .map_err(|e| DotmaError::Config(format!("Invalid config file: {e}")))?;
        crate::validator::ConfigValidator::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotma_common::test_utils::{config_fixtures, create_temp_dir};

    #[test]
    fn test_parse_minimal_config() {
        let config = ConfigLoader::parse(config_fixtures::minimal_config_yaml()).unwrap();
        assert_eq!(config.commands.prefixes, vec!["!", "!f"]);
        assert_eq!(config.currency.name, "DotmaCoin");
        assert_eq!(config.flows.response_timeout_secs, 300);
    }

    #[test]
    fn test_parse_rejects_empty_prefixes() {
        let result = ConfigLoader::parse(config_fixtures::empty_prefix_config_yaml());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let loader = ConfigLoader::new("/nonexistent/config.yaml");
        let result = loader.load().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = create_temp_dir();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, config_fixtures::minimal_config_yaml())
            .await
            .unwrap();

        let config = ConfigLoader::new(&path).load().await.unwrap();
        assert_eq!(config.discord.token, "test_token");
    }
}
