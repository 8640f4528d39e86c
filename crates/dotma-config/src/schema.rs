//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use dotma_common::{ChannelId, DotmaError};

/// Main configuration structure for Dotma Bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Discord configuration.
    pub discord: DiscordConfig,
    /// Command handling configuration.
    pub commands: CommandsConfig,
    /// Currency configuration.
    pub currency: CurrencyConfig,
    /// Interactive flow configuration.
    pub flows: FlowsConfig,
}

/// Discord bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Discord bot token.
    pub token: String,
    /// Channel IDs that receive relayed warn-level log events.
    #[serde(default)]
    pub debug_channels: Vec<ChannelId>,
}

/// Command handling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsConfig {
    /// Ordered list of recognized command prefixes. Must be non-empty.
    pub prefixes: Vec<String>,
}

/// Currency configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Name of the currency awarded to ping targets.
    pub name: String,
}

/// Interactive flow configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowsConfig {
    /// How long a confirmation prompt waits for a reply before the
    /// cancellation path fires.
    pub response_timeout_secs: u64,
    /// Lower bound on the delay of a repeating announcement loop.
    pub min_loop_delay_secs: u64,
}

impl Config {
    /// Validates the configuration.
    ///
    /// An empty prefix list is fatal: without at least one prefix no
    /// message can ever resolve to an executable command.
    pub fn validate(&self) -> Result<(), DotmaError> {
        if self.commands.prefixes.is_empty() {
            return Err(DotmaError::Config(
                "Command prefix list cannot be empty".to_string(),
            ));
        }

        if self.commands.prefixes.iter().any(|p| p.trim().is_empty()) {
            return Err(DotmaError::Config(
                "Command prefixes cannot be blank".to_string(),
            ));
        }

        if self.discord.token.is_empty() {
            return Err(DotmaError::Config(
                "Discord token cannot be empty".to_string(),
            ));
        }

        if self.currency.name.is_empty() {
            return Err(DotmaError::Config(
                "Currency name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
