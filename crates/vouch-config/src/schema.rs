//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use vouch_common::{ChannelId, LoadPolicy, LoggingConfig, RoleId, VouchError};

/// Main configuration structure for Vouch Bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Discord configuration.
    pub discord: DiscordConfig,
    /// Vouch storage configuration.
    pub storage: StorageConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Discord bot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Discord bot token.
    pub token: String,
    /// Channel where `/vouch` may be used and where restores are posted.
    #[serde(with = "vouch_common::snowflake")]
    pub vouch_channel_id: ChannelId,
    /// Role required to submit vouches.
    #[serde(with = "vouch_common::snowflake")]
    pub vouch_role_id: RoleId,
    /// Role required to restore vouches.
    #[serde(with = "vouch_common::snowflake")]
    pub owner_role_id: RoleId,
    /// Upper bound on in-flight Discord requests during a restore.
    pub max_concurrent_requests: usize,
    /// Per-request timeout for user lookups and message delivery.
    pub request_timeout_seconds: u64,
}

impl DiscordConfig {
    /// The per-request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Vouch storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON document holding every guild's vouches.
    pub path: PathBuf,
    /// How to treat a document that exists but cannot be parsed.
    pub load_policy: LoadPolicy,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), VouchError> {
        if self.discord.token.trim().is_empty() {
            return Err(VouchError::config("Discord token cannot be empty"));
        }

        let ids = [
            ("vouch_channel_id", self.discord.vouch_channel_id.get()),
            ("vouch_role_id", self.discord.vouch_role_id.get()),
            ("owner_role_id", self.discord.owner_role_id.get()),
        ];
        if let Some((name, _)) = ids.iter().find(|(_, id)| *id == 0) {
            return Err(VouchError::config(format!("discord.{name} must be set")));
        }

        if self.discord.max_concurrent_requests == 0 {
            return Err(VouchError::config(
                "discord.max_concurrent_requests must be at least 1",
            ));
        }

        if self.discord.request_timeout_seconds == 0 {
            return Err(VouchError::config(
                "discord.request_timeout_seconds must be at least 1",
            ));
        }

        if self.storage.path.as_os_str().is_empty() {
            return Err(VouchError::config("storage.path cannot be empty"));
        }

        Ok(())
    }
}
