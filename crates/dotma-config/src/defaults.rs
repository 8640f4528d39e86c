//! Default values for every configuration section.

use crate::schema::*;

impl Default for Config {
    fn default() -> Self {
        Self {
            discord: DiscordConfig::default(),
            commands: CommandsConfig::default(),
            currency: CurrencyConfig::default(),
            flows: FlowsConfig::default(),
        }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            debug_channels: Vec::new(),
        }
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            prefixes: vec!["!".to_string(), "!f".to_string()],
        }
    }
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            name: "DotmaCoin".to_string(),
        }
    }
}

impl Default for FlowsConfig {
    fn default() -> Self {
        Self {
            // Five minutes, matching the confirmation windows the bot
            // has always used.
            response_timeout_secs: 300,
            min_loop_delay_secs: 1,
        }
    }
}
