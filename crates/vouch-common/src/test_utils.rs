//! Test utilities and shared test helpers for Vouch Bot.
//!
//! Fixtures and helpers used by unit and integration tests across the
//! workspace. Enabled with the `testing` feature.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Test fixture for creating a fixed timestamp.
pub fn mock_timestamp(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
}

/// Discord-related test utilities.
pub mod discord_fixtures {
    use crate::{ActorProfile, ChannelId, GuildId, UserId};

    /// Create a test guild ID.
    pub fn test_guild_id() -> GuildId {
        GuildId(111111111111111111)
    }

    /// Create a test channel ID.
    pub fn test_channel_id() -> ChannelId {
        ChannelId(123456789012345678)
    }

    /// Create a profile for the given user id.
    pub fn test_actor(id: u64) -> ActorProfile {
        ActorProfile::new(
            UserId(id),
            format!("user{id}"),
            Some(format!("https://cdn.discordapp.com/avatars/{id}/a.png")),
        )
    }
}

/// Vouch record fixtures.
pub mod vouch_fixtures {
    use super::mock_timestamp;
    use crate::{ActorProfile, Vouch};

    /// A valid vouch by `actor`, numbered `n` in its reason.
    pub fn sample_vouch(actor: &ActorProfile, n: usize) -> Vouch {
        Vouch::new(
            actor,
            5,
            "premium-shop",
            format!("vouch number {n}"),
            None,
            mock_timestamp(2024, 1, 1, 12, 0, 0),
        )
    }
}

/// Configuration-related test utilities.
pub mod config_fixtures {
    /// Create a minimal valid test configuration as YAML string.
    pub fn minimal_config_yaml() -> &'static str {
        r#"
discord:
  token: "test_token"
  vouch_channel_id: 123456789012345678
  vouch_role_id: 222222222222222222
  owner_role_id: 333333333333333333
"#
    }

    /// Create a full test configuration as YAML string.
    pub fn full_config_yaml() -> &'static str {
        concat!(
            "discord:\n",
            "  token: \"test_token_full\"\n",
            "  vouch_channel_id: 123456789012345678\n",
            "  vouch_role_id: 222222222222222222\n",
            "  owner_role_id: 333333333333333333\n",
            "  max_concurrent_requests: 4\n",
            "  request_timeout_seconds: 5\n",
            "\n",
            "storage:\n",
            "  path: \"data/vouches.json\"\n",
            "  load_policy: strict\n",
            "\n",
            "logging:\n",
            "  level: \"debug\"\n",
            "  format: json\n",
        )
    }
}

/// Property-based testing utilities using proptest.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use crate::{UserId, MAX_STARS, MIN_STARS};
    use proptest::prelude::*;

    /// Strategy for generating valid Discord user IDs.
    pub fn user_id_strategy() -> impl Strategy<Value = UserId> {
        (100000000000000000u64..=999999999999999999u64).prop_map(UserId)
    }

    /// Strategy for generating accepted star ratings.
    pub fn stars_strategy() -> impl Strategy<Value = u8> {
        MIN_STARS..=MAX_STARS
    }
}
