//! Configuration loading utilities

use crate::Config;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use vouch_common::{ChannelId, RoleId, VouchError};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "VOUCH_CONFIG_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file {path}: {source}")]
    IoError {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[source] VouchError),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name.
        var: String,
        /// Parse failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for VouchError {
    fn from(err: ConfigError) -> Self {
        VouchError::config_with_source("Failed to load configuration", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content)?;
        info!("Loaded configuration from {}", path.display());

        Self::apply_env_overrides(&mut config)?;
        config.validate().map_err(ConfigError::ValidationError)?;

        Ok(config)
    }

    /// Parse a YAML document without applying overrides or validation.
    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration from the environment and the default file locations.
    ///
    /// `VOUCH_CONFIG_PATH` wins, then `config.yaml`, then `config.yml`. With no
    /// file at all the defaults are used and the environment must supply the
    /// token and ids.
    pub fn load() -> Result<Config, VouchError> {
        let config = if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::load_config(&config_path)?
        } else if Path::new("config.yaml").exists() {
            Self::load_config("config.yaml")?
        } else if Path::new("config.yml").exists() {
            Self::load_config("config.yml")?
        } else {
            debug!("No configuration file found, using defaults with environment overrides");
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)?;
            config.validate().map_err(ConfigError::ValidationError)?;
            config
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, VouchError> {
        Ok(Self::load_config(path)?)
    }

    /// Apply process environment overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides(config, |name| env::var(name).ok())
    }

    /// Apply overrides read through `lookup`.
    ///
    /// Variable names match the legacy `.env` layout (`BOT_TOKEN`,
    /// `CHANNEL_ID`, `VOUCH_ROLE_ID`, `OWNER_ROLE_ID`); `DISCORD_TOKEN` is
    /// accepted as well and takes precedence.
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("DISCORD_TOKEN").or_else(|| lookup("BOT_TOKEN")) {
            config.discord.token = token;
        }

        if let Some(channel) = lookup("CHANNEL_ID") {
            config.discord.vouch_channel_id = ChannelId(parse_var("CHANNEL_ID", &channel)?);
        }

        if let Some(role) = lookup("VOUCH_ROLE_ID") {
            config.discord.vouch_role_id = RoleId(parse_var("VOUCH_ROLE_ID", &role)?);
        }

        if let Some(role) = lookup("OWNER_ROLE_ID") {
            config.discord.owner_role_id = RoleId(parse_var("OWNER_ROLE_ID", &role)?);
        }

        if let Some(max_requests) = lookup("DISCORD_MAX_REQUESTS") {
            config.discord.max_concurrent_requests =
                parse_var("DISCORD_MAX_REQUESTS", &max_requests)?;
        }

        if let Some(timeout) = lookup("DISCORD_TIMEOUT") {
            config.discord.request_timeout_seconds = parse_var("DISCORD_TIMEOUT", &timeout)?;
        }

        if let Some(path) = lookup("VOUCHES_FILE") {
            config.storage.path = PathBuf::from(path);
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use vouch_common::test_utils::config_fixtures;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_parse_minimal_yaml() {
        let config = ConfigLoader::parse(config_fixtures::minimal_config_yaml()).unwrap();
        assert_eq!(config.discord.token, "test_token");
        assert_eq!(config.discord.vouch_channel_id, ChannelId(123456789012345678));
        assert_eq!(config.discord.max_concurrent_requests, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_legacy_names() {
        let mut config = Config::default();
        ConfigLoader::apply_overrides(
            &mut config,
            lookup(&[
                ("BOT_TOKEN", "abc"),
                ("CHANNEL_ID", "10"),
                ("VOUCH_ROLE_ID", "20"),
                ("OWNER_ROLE_ID", " 30 "),
                ("VOUCHES_FILE", "/tmp/v.json"),
            ]),
        )
        .unwrap();

        assert_eq!(config.discord.token, "abc");
        assert_eq!(config.discord.vouch_channel_id, ChannelId(10));
        assert_eq!(config.discord.vouch_role_id, RoleId(20));
        assert_eq!(config.discord.owner_role_id, RoleId(30));
        assert_eq!(config.storage.path, PathBuf::from("/tmp/v.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_discord_token_beats_bot_token() {
        let mut config = Config::default();
        ConfigLoader::apply_overrides(
            &mut config,
            lookup(&[("BOT_TOKEN", "old"), ("DISCORD_TOKEN", "new")]),
        )
        .unwrap();
        assert_eq!(config.discord.token, "new");
    }

    #[test]
    fn test_invalid_env_value() {
        let mut config = Config::default();
        let err = ConfigLoader::apply_overrides(&mut config, lookup(&[("CHANNEL_ID", "general")]))
            .unwrap_err();
        assert!(err.to_string().contains("CHANNEL_ID"));
    }
}
