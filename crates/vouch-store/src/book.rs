//! In-memory form of the vouch document.

use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use vouch_common::{GuildId, Vouch};

/// Every guild's ledger, keyed by the guild id as a decimal string.
///
/// Serialises transparently to `{ "<guildId>": [ ...vouches ] }`. Guilds keep
/// the order in which they first appeared, so a loaded document is written
/// back with its keys where they were.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VouchBook {
    guilds: IndexMap<String, Vec<Vouch>>,
}

impl VouchBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The ledger of `guild`, empty if the guild never vouched.
    #[must_use]
    pub fn ledger(&self, guild: GuildId) -> &[Vouch] {
        self.guilds
            .get(&guild.to_string())
            .map_or(&[], Vec::as_slice)
    }

    /// Appends to the ledger of `guild`, creating it on first use, and
    /// returns the vouch's 1-based ordinal.
    pub fn append(&mut self, guild: GuildId, vouch: Vouch) -> usize {
        let ledger = self.guilds.entry(guild.to_string()).or_default();
        ledger.push(vouch);
        ledger.len()
    }

    /// Number of guilds with a ledger.
    #[must_use]
    pub fn guild_count(&self) -> usize {
        self.guilds.len()
    }

    /// Total number of vouches across all guilds.
    #[must_use]
    pub fn vouch_count(&self) -> usize {
        self.guilds.values().map(Vec::len).sum()
    }

    /// Whether the book holds no guilds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guilds.is_empty()
    }
}
