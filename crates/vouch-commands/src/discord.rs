//! Serenity implementations of the handler capabilities.

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{debug, warn};
use vouch_common::{truncate_string, ActorProfile, ChannelId, GuildId, Result, UserId, VouchError};
use vouch_embeds::VouchEmbed;

use crate::traits::{ActorResolver, DestinationLookup, NotificationSink};

/// Longest value Discord accepts for an embed field.
pub const MAX_FIELD_VALUE_LEN: usize = 1024;

/// Converts a rendered vouch into a serenity embed builder.
///
/// Field values longer than Discord allows are truncated. This only happens
/// for proofs, which have no limit of their own.
#[must_use]
pub fn to_create_embed(embed: &VouchEmbed) -> serenity::CreateEmbed {
    let mut builder = serenity::CreateEmbed::new()
        .title(embed.title.as_str())
        .colour(embed.colour)
        .footer(serenity::CreateEmbedFooter::new(embed.footer.as_str()));

    if let Some(thumbnail) = &embed.thumbnail {
        builder = builder.thumbnail(thumbnail.as_str());
    }

    for field in &embed.fields {
        builder = builder.field(
            field.name.as_str(),
            truncate_string(&field.value, MAX_FIELD_VALUE_LEN),
            field.inline,
        );
    }

    match serenity::Timestamp::from_unix_timestamp(embed.timestamp.timestamp()) {
        Ok(timestamp) => builder.timestamp(timestamp),
        Err(e) => {
            warn!(error = %e, "Vouch timestamp out of range; sending embed without one");
            builder
        }
    }
}

/// Builds a profile from a serenity user.
#[must_use]
pub fn profile_from_user(user: &serenity::User) -> ActorProfile {
    ActorProfile::new(UserId(user.id.get()), user.tag(), Some(user.face()))
}

fn user_id(id: UserId) -> Result<serenity::UserId> {
    if id.get() == 0 {
        return Err(VouchError::discord("User id 0 is not a valid snowflake"));
    }
    Ok(serenity::UserId::new(id.get()))
}

/// Looks users up over the Discord REST API.
#[derive(Clone)]
pub struct HttpActorResolver {
    http: Arc<serenity::Http>,
}

impl HttpActorResolver {
    /// Creates a resolver using `http`.
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ActorResolver for HttpActorResolver {
    async fn resolve(&self, user: UserId) -> Result<ActorProfile> {
        let fetched = self
            .http
            .get_user(user_id(user)?)
            .await
            .map_err(|e| VouchError::discord_with_source(format!("Failed to fetch user {user}"), e))?;
        Ok(profile_from_user(&fetched))
    }
}

/// Posts embeds to one channel.
#[derive(Clone)]
pub struct ChannelSink {
    http: Arc<serenity::Http>,
    channel: serenity::ChannelId,
}

impl ChannelSink {
    /// Creates a sink posting to `channel`.
    pub fn new(http: Arc<serenity::Http>, channel: serenity::ChannelId) -> Self {
        Self { http, channel }
    }
}

#[async_trait]
impl NotificationSink for ChannelSink {
    async fn deliver(&self, embed: &VouchEmbed) -> Result<()> {
        let message = serenity::CreateMessage::new().embed(to_create_embed(embed));
        self.channel
            .send_message(&*self.http, message)
            .await
            .map_err(|e| {
                VouchError::discord_with_source(
                    format!("Failed to post vouch to channel {}", self.channel),
                    e,
                )
            })?;
        Ok(())
    }
}

/// Finds the configured vouch channel among a guild's channels.
#[derive(Clone)]
pub struct GuildChannelLookup {
    http: Arc<serenity::Http>,
    channel: ChannelId,
}

impl GuildChannelLookup {
    /// Creates a lookup for `channel`.
    pub fn new(http: Arc<serenity::Http>, channel: ChannelId) -> Self {
        Self { http, channel }
    }
}

#[async_trait]
impl DestinationLookup for GuildChannelLookup {
    fn destination(&self) -> ChannelId {
        self.channel
    }

    async fn locate(&self, guild: GuildId) -> Option<Box<dyn NotificationSink>> {
        if guild.get() == 0 || self.channel.get() == 0 {
            return None;
        }

        let channels = match serenity::GuildId::new(guild.get())
            .channels(&*self.http)
            .await
        {
            Ok(channels) => channels,
            Err(e) => {
                warn!(guild_id = %guild, error = %e, "Failed to list guild channels");
                return None;
            }
        };

        let target = serenity::ChannelId::new(self.channel.get());
        if channels.contains_key(&target) {
            Some(Box::new(ChannelSink::new(Arc::clone(&self.http), target)))
        } else {
            debug!(guild_id = %guild, channel = %self.channel, "Vouch channel not in guild");
            None
        }
    }
}
