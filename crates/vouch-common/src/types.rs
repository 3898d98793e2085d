//! Common type definitions and newtype wrappers for domain modeling.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest accepted star rating.
pub const MIN_STARS: u8 = 1;

/// Highest accepted star rating, also the width of the rendered rating.
pub const MAX_STARS: u8 = 5;

/// Maximum length of the vouch reason.
pub const MAX_REASON_LEN: usize = 1000;

/// Maximum length of the product channel label.
pub const MAX_PRODUCT_CHANNEL_LEN: usize = 100;

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw snowflake value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

snowflake_id!(
    /// A Discord guild ID. Each guild owns an independent vouch ledger.
    GuildId
);
snowflake_id!(
    /// A Discord channel ID.
    ChannelId
);
snowflake_id!(
    /// A Discord user ID.
    UserId
);
snowflake_id!(
    /// A Discord role ID.
    RoleId
);

/// What the store does when the persisted document cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    /// Log the problem and carry on with an empty document.
    #[default]
    Lenient,
    /// Refuse to continue until the file is fixed.
    Strict,
}

/// Display information about a Discord user at the time it was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorProfile {
    /// The user's id.
    pub id: UserId,
    /// The user's tag, e.g. `name` or `name#1234`.
    pub tag: String,
    /// Avatar URL used as the embed thumbnail.
    pub avatar_url: Option<String>,
}

impl ActorProfile {
    /// Creates a new profile.
    pub fn new(id: UserId, tag: impl Into<String>, avatar_url: Option<String>) -> Self {
        Self {
            id,
            tag: tag.into(),
            avatar_url,
        }
    }

    /// Discord mention markup for this user.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// One submitted vouch, exactly as persisted.
///
/// Field names and encodings follow the on-disk `vouches.json` layout:
/// `userId` is a string snowflake, `proof` is `null` when absent and
/// `timestamp` is ISO-8601 with millisecond precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vouch {
    /// Submitting user.
    #[serde(with = "snowflake")]
    pub user_id: UserId,
    /// Submitter's tag at submission time. Not kept in sync with renames.
    pub username: String,
    /// Rating, `MIN_STARS..=MAX_STARS`.
    pub stars: u8,
    /// Free-text product channel label.
    pub product_channel: String,
    /// Free-text reason.
    pub reason: String,
    /// Optional proof, usually a link.
    #[serde(default)]
    pub proof: Option<String>,
    /// Creation instant.
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl Vouch {
    /// Builds a vouch for `actor` stamped with `timestamp`.
    ///
    /// The timestamp is truncated to milliseconds so the in-memory record is
    /// identical to the one read back from disk. An empty proof is stored as
    /// absent.
    pub fn new(
        actor: &ActorProfile,
        stars: u8,
        product_channel: impl Into<String>,
        reason: impl Into<String>,
        proof: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: actor.id,
            username: actor.tag.clone(),
            stars,
            product_channel: product_channel.into(),
            reason: reason.into(),
            proof: proof.filter(|p| !p.is_empty()),
            timestamp: timestamp.trunc_subsecs(3),
        }
    }
}

/// Serde adapter writing ids as decimal strings and reading either form.
pub mod snowflake {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::fmt::Display;

    /// Serializes an id as a string.
    pub fn serialize<T: Display, S: Serializer>(id: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    /// Deserializes an id from a string or an integer.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: From<u64>,
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.trim().parse::<u64>().map(T::from).map_err(de::Error::custom),
            Raw::Number(number) => Ok(T::from(number)),
        }
    }
}

/// Serde adapter for `DateTime<Utc>` as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serializes with exactly three fractional digits and a `Z` suffix.
    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Parses any RFC 3339 timestamp and normalises it to UTC.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}
