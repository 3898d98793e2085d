//! Poise framework setup and command registration logic.

use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, warn};
use vouch_common::{RoleId, VouchError};
use vouch_config::Config;
use vouch_store::VouchStore;

use crate::messages;
use crate::permissions::VouchPermissions;
use crate::restore::{FanOut, RestoreHandler};
use crate::submission::SubmissionHandler;

/// Application data accessible in all commands.
pub struct Data {
    /// Application configuration.
    pub config: Arc<Config>,
    /// The vouch store shared by every command.
    pub store: Arc<VouchStore>,
    /// Channel and role checks.
    pub permissions: VouchPermissions,
    /// `/vouch` handler.
    pub submissions: SubmissionHandler,
    /// `/restore-vouches` handler.
    pub restores: RestoreHandler,
}

impl Data {
    /// Wires the handlers to `store` using `config`.
    pub fn new(config: Arc<Config>, store: Arc<VouchStore>) -> Self {
        Self {
            permissions: VouchPermissions::from_config(&config.discord),
            submissions: SubmissionHandler::new(Arc::clone(&store)),
            restores: RestoreHandler::new(
                Arc::clone(&store),
                FanOut::from_config(&config.discord),
            ),
            config,
            store,
        }
    }
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("config", &"<Config>")
            .field("store", &self.store.path())
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}

/// Application error type for commands.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Command context type.
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Every command the bot registers.
#[must_use]
pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        crate::vouch::vouch(),
        crate::restore_vouches::restore_vouches(),
    ]
}

/// Creates a new Poise framework.
pub fn create_framework() -> poise::FrameworkBuilder<Data, Error> {
    poise::Framework::builder().options(poise::FrameworkOptions {
        commands: commands(),
        on_error: |error| Box::pin(on_error(error)),
        ..Default::default()
    })
}

/// Sends a reply only the invoking user can see.
pub async fn reply_ephemeral(ctx: Context<'_>, content: impl Into<String>) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(content)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Role ids of the invoking member, empty outside a guild.
pub async fn member_roles(ctx: Context<'_>) -> Vec<RoleId> {
    ctx.author_member()
        .await
        .map(|member| member.roles.iter().map(|r| RoleId(r.get())).collect())
        .unwrap_or_default()
}

/// Converts a serenity guild id.
#[must_use]
pub fn guild_id(guild: serenity::GuildId) -> vouch_common::GuildId {
    vouch_common::GuildId(guild.get())
}

/// Global error handler for the framework
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            let command = ctx.command().qualified_name.clone();
            let reply = match error.downcast_ref::<VouchError>() {
                Some(vouch_error) if vouch_error.is_user_facing() => {
                    warn!(%command, error = %vouch_error, "Command rejected");
                    vouch_error
                        .user_message()
                        .unwrap_or_else(|| messages::GENERIC_FAILURE.to_string())
                }
                _ => {
                    error!(%command, error = %error, "Command failed");
                    messages::GENERIC_FAILURE.to_string()
                }
            };

            if let Err(e) = reply_ephemeral(ctx, reply).await {
                error!(%command, error = %e, "Failed to report command error");
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {:?}", e);
            }
        }
    }
}
