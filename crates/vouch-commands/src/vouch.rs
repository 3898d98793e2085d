//! `/vouch`: record a vouch and reply with its embed.

use tracing::debug;
use vouch_common::{ChannelId, UserId};

use crate::discord::{profile_from_user, to_create_embed};
use crate::framework::{guild_id, member_roles, reply_ephemeral, Context, Error};
use crate::submission::VouchSubmission;

/// Create a vouch
#[poise::command(slash_command, guild_only)]
pub async fn vouch(
    ctx: Context<'_>,
    #[description = "Rating from 1-5 stars"]
    #[min = 1]
    #[max = 5]
    stars: u8,
    #[description = "The product channel name or ID"]
    #[rename = "product-channel"]
    product_channel: String,
    #[description = "Reason for the vouch"] reason: String,
    #[description = "Proof (optional)"] proof: Option<String>,
) -> Result<(), Error> {
    let Some(guild) = ctx.guild_id() else {
        return Ok(());
    };
    let data = ctx.data();
    let author = ctx.author();

    let roles = member_roles(ctx).await;
    if let Err(denied) = data.permissions.check_submit(
        UserId(author.id.get()),
        ChannelId(ctx.channel_id().get()),
        &roles,
    ) {
        return reply_ephemeral(ctx, denied.user_message().unwrap_or_default()).await;
    }

    let submission = VouchSubmission {
        actor: profile_from_user(author),
        stars,
        product_channel,
        reason,
        proof,
    };
    if let Err(invalid) = submission.validate() {
        debug!(user_id = %author.id, error = %invalid, "Rejected vouch input");
        return reply_ephemeral(ctx, invalid.user_message().unwrap_or_default()).await;
    }

    ctx.defer().await?;

    let submitted = data.submissions.submit(guild_id(guild), submission).await?;
    ctx.send(poise::CreateReply::default().embed(to_create_embed(&submitted.embed)))
        .await?;
    Ok(())
}
