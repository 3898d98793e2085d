//! Default values for every configuration section.

use crate::schema::{Config, DiscordConfig, StorageConfig};
use std::path::PathBuf;
use vouch_common::{ChannelId, LoadPolicy, LoggingConfig, RoleId};

/// Default number of concurrent Discord requests during a restore.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 10;

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Default location of the vouch document.
pub const DEFAULT_STORAGE_PATH: &str = "vouches.json";

impl Default for Config {
    fn default() -> Self {
        Self {
            discord: DiscordConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            vouch_channel_id: ChannelId(0),
            vouch_role_id: RoleId(0),
            owner_role_id: RoleId(0),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORAGE_PATH),
            load_policy: LoadPolicy::default(),
        }
    }
}
