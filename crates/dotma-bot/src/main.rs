//! Main entry point for Dotma Bot.

use std::env;
use std::sync::Arc;

use dotma_bot::{logging, BotResult, DotmaBot};
use dotma_config::{Config, ConfigCache, ConfigLoader};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> BotResult<()> {
    let (_log_guard, relay_rx) = logging::init();

    info!("Starting Dotma Bot");

    let config = load_config().await?;
    let bot = DotmaBot::new(config);
    spawn_reload_on_hangup(bot.config());

    if let Err(e) = bot.start(relay_rx).await {
        error!(error = %e, "Bot failed to start");
        return Err(e);
    }

    Ok(())
}

/// Loads configuration from the file named by `DOTMA_CONFIG` (default
/// `config.yml`), falling back to defaults when no file exists. The
/// `DISCORD_TOKEN` environment variable overrides the file token.
async fn load_config() -> BotResult<Config> {
    let path = env::var("DOTMA_CONFIG").unwrap_or_else(|_| "config.yml".to_string());

    let mut config = if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        ConfigLoader::new(&path).load().await?
    } else {
        info!(path, "No configuration file found, using defaults");
        Config::default()
    };

    if let Ok(token) = env::var("DISCORD_TOKEN") {
        config.discord.token = token;
    }

    config.validate()?;
    Ok(config)
}

/// Re-reads the configuration on SIGHUP.
///
/// Values read per event, like the debug channel list, pick the change
/// up immediately; the gateway token and prefixes are only read at
/// startup and still need a restart.
#[cfg(unix)]
fn spawn_reload_on_hangup(cache: Arc<ConfigCache>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "SIGHUP handler unavailable, live reload disabled");
                return;
            }
        };
        while hangup.recv().await.is_some() {
            match load_config().await {
                Ok(config) => {
                    cache.update(config);
                    info!("Configuration reloaded");
                }
                Err(err) => {
                    warn!(error = %err, "Reload failed, keeping the previous configuration");
                }
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_reload_on_hangup(_cache: Arc<ConfigCache>) {}
