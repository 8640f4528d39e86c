//! Gateway client and the message event handler.

use std::sync::Arc;
use std::time::Duration;

use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::channel::Message;
use serenity::model::gateway::{GatewayIntents, Ready};
use tokio::sync::mpsc;
use tracing::info;

use crate::discord::SerenityPlatform;
use crate::error::{BotError, BotResult};
use crate::logging;
use dotma_commands::{default_commands, Announcer, CommandDeps};
use dotma_common::UserId;
use dotma_dispatch::{Dispatcher, FlowGuard, MessageState, PrefixRegistry};
use dotma_store::{MemoryTargetStore, MemoryUserStore};
use dotma_config::{Config, ConfigCache};

/// Main bot structure.
pub struct DotmaBot {
    config: Arc<ConfigCache>,
}

impl DotmaBot {
    /// Creates a new bot instance.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(ConfigCache::new(config)),
        }
    }

    /// Shared handle on the live configuration, for reload tasks.
    pub fn config(&self) -> Arc<ConfigCache> {
        self.config.clone()
    }

    /// Connects to the gateway and runs until the connection drops.
    ///
    /// `relay_rx` carries warn-level log lines for the debug channels;
    /// the relay task starts as soon as the HTTP client exists.
    pub async fn start(
        &self,
        relay_rx: mpsc::UnboundedReceiver<String>,
    ) -> BotResult<()> {
        let config = self.config.get();

        let users = Arc::new(MemoryUserStore::new());
        let deps = CommandDeps {
            users: users.clone(),
            targets: Arc::new(MemoryTargetStore::new()),
            flows: FlowGuard::new(),
            announcer: Arc::new(Announcer::new()),
            currency: config.currency.name.clone(),
            response_timeout: Duration::from_secs(config.flows.response_timeout_secs),
            min_loop_delay: Duration::from_secs(config.flows.min_loop_delay_secs),
        };
        let registry = default_commands(&deps)
            .map_err(|err| BotError::Config(dotma_common::DotmaError::Config(err.to_string())))?;
        let prefixes = PrefixRegistry::new(config.commands.prefixes.clone())?;

        let handler = Handler {
            dispatcher: Dispatcher::new(prefixes, registry, users.clone()),
            users,
        };

        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let mut client = serenity::Client::builder(&config.discord.token, intents)
            .event_handler(handler)
            .await?;

        tokio::spawn(logging::run_debug_relay(
            client.http.clone(),
            self.config.clone(),
            relay_rx,
        ));

        client.start().await?;
        Ok(())
    }
}

/// Routes gateway events into the dispatcher.
struct Handler {
    dispatcher: Dispatcher,
    users: Arc<MemoryUserStore>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        // Commands stay gated until this point; a message that races
        // the connection handshake is dropped by the readiness check.
        self.users.mark_ready();
        info!(
            user = %ready.user.name,
            commands = self.dispatcher.registry().len(),
            "Connected and accepting commands"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let author = UserId(msg.author.id.get());
        let channel = dotma_common::ChannelId(msg.channel_id.get());
        let platform = Arc::new(SerenityPlatform::new(
            ctx.http.clone(),
            ctx.shard.clone(),
            msg.guild_id,
        ));

        let state = MessageState::new(platform, author, channel, msg.content.to_string());
        let outcome = self.dispatcher.parse_line(&msg.content, author, &state).await;
        tracing::debug!(user = %author, ?outcome, "Message dispatched");
    }
}
