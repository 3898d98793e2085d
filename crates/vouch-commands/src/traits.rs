//! Capabilities the handlers need from the chat platform.
//!
//! The handlers only see these traits. [`crate::discord`] implements them
//! over serenity; tests implement them with mocks and fakes.

use async_trait::async_trait;
use vouch_common::{ActorProfile, ChannelId, GuildId, Result, UserId};
use vouch_embeds::VouchEmbed;

/// Fetches the current profile of a user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActorResolver: Send + Sync {
    /// Resolves `user` to its current display information.
    async fn resolve(&self, user: UserId) -> Result<ActorProfile>;
}

/// Somewhere a rendered vouch can be posted.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Posts `embed`.
    async fn deliver(&self, embed: &VouchEmbed) -> Result<()>;
}

/// Finds the configured vouch channel of a guild.
#[async_trait]
pub trait DestinationLookup: Send + Sync {
    /// The channel this lookup searches for.
    fn destination(&self) -> ChannelId;

    /// Returns a sink for the vouch channel of `guild`, or `None` if the
    /// guild has no such channel.
    async fn locate(&self, guild: GuildId) -> Option<Box<dyn NotificationSink>>;
}
