//! Core bot logic using the Poise framework.

use crate::error::{BotError, BotResult};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info};
use vouch_commands::{create_framework, Data};
use vouch_config::Config;
use vouch_store::VouchStore;

/// Main bot structure.
pub struct VouchBot {
    config: Arc<Config>,
    store: Arc<VouchStore>,
}

impl VouchBot {
    /// Creates a new bot instance.
    pub fn new(config: Config) -> Self {
        let store = Arc::new(VouchStore::new(
            config.storage.path.clone(),
            config.storage.load_policy,
        ));
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// The store commands will write to.
    #[must_use]
    pub fn store(&self) -> &Arc<VouchStore> {
        &self.store
    }

    /// Gateway intents the bot connects with. Slash commands need no
    /// privileged intents.
    #[must_use]
    pub fn intents() -> serenity::GatewayIntents {
        serenity::GatewayIntents::GUILDS | serenity::GatewayIntents::GUILD_MESSAGES
    }

    /// Reads the vouch document once so an unreadable file under the strict
    /// load policy stops the bot before it connects.
    pub async fn preflight(&self) -> BotResult<()> {
        let book = self.store.load().await?;
        info!(
            path = %self.store.path().display(),
            guilds = book.guild_count(),
            vouches = book.vouch_count(),
            "Vouch store ready"
        );
        Ok(())
    }

    /// Starts the bot and runs until the gateway closes or Ctrl+C.
    pub async fn start(&self) -> BotResult<()> {
        self.preflight().await?;

        let data = Data::new(Arc::clone(&self.config), Arc::clone(&self.store));
        let framework = create_framework()
            .setup(move |ctx, ready, framework| {
                Box::pin(async move {
                    info!("Bot connected as: {}", ready.user.tag());
                    info!("Connected to {} guilds", ready.guilds.len());
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                    info!("Slash commands registered globally");
                    Ok(data)
                })
            })
            .build();

        let mut client = serenity::ClientBuilder::new(&self.config.discord.token, Self::intents())
            .framework(framework)
            .await
            .map_err(|e| BotError::Framework(format!("{e:?}")))?;

        let shard_manager = Arc::clone(&client.shard_manager);
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {:?}", e);
                return;
            }

            info!("Received shutdown signal, starting graceful shutdown");
            shard_manager.shutdown_all().await;
        });

        client.start().await?;
        info!("Discord client shutdown complete");
        Ok(())
    }
}
