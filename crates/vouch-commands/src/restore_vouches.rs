//! `/restore-vouches`: re-post a guild's vouch history.

use std::sync::Arc;
use tracing::warn;
use vouch_common::{UserId, VouchError};

use crate::discord::{GuildChannelLookup, HttpActorResolver};
use crate::framework::{guild_id, member_roles, reply_ephemeral, Context, Error};
use crate::messages;
use crate::restore::RestoreReport;

/// Restore vouches from database (Owner only)
#[poise::command(slash_command, guild_only, rename = "restore-vouches")]
pub async fn restore_vouches(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild) = ctx.guild_id() else {
        return Ok(());
    };
    let data = ctx.data();

    let roles = member_roles(ctx).await;
    if let Err(denied) = data
        .permissions
        .check_restore(UserId(ctx.author().id.get()), &roles)
    {
        return reply_ephemeral(ctx, denied.user_message().unwrap_or_default()).await;
    }

    ctx.defer_ephemeral().await?;

    let http = Arc::clone(&ctx.serenity_context().http);
    let lookup = GuildChannelLookup::new(Arc::clone(&http), data.permissions.vouch_channel());
    let resolver = HttpActorResolver::new(http);

    let outcome = data
        .restores
        .restore(guild_id(guild), &lookup, &resolver)
        .await;

    reply_ephemeral(ctx, restore_reply(outcome)?).await
}

/// Reply text for a finished restore. A missing vouch channel becomes a reply;
/// every other error is passed on to the framework's error handler.
pub fn restore_reply(outcome: Result<RestoreReport, VouchError>) -> Result<String, VouchError> {
    match outcome {
        Ok(report) if report.is_empty() => Ok(messages::NOTHING_TO_RESTORE.to_string()),
        Ok(report) => Ok(messages::restore_summary(report.restored(), report.total)),
        Err(VouchError::DestinationMissing { channel }) => {
            warn!(%channel, "Vouch channel missing; nothing restored");
            Ok(messages::DESTINATION_MISSING.to_string())
        }
        Err(e) => Err(e),
    }
}
