//! Integration tests for the dotma-bot crate.
//!
//! The gateway itself needs live credentials, so these cover the wiring
//! that runs before a connection exists.

use dotma_bot::DotmaBot;
use dotma_common::test_utils::{config_fixtures, init_test_logging};
use dotma_common::ChannelId;
use dotma_config::ConfigLoader;

#[test]
fn test_bot_builds_from_parsed_config() {
    init_test_logging();

    let config = ConfigLoader::parse(config_fixtures::minimal_config_yaml())
        .expect("fixture config parses");
    let _bot = DotmaBot::new(config);
}

#[test]
fn test_reload_is_visible_through_bot_handle() {
    let config = ConfigLoader::parse(config_fixtures::minimal_config_yaml())
        .expect("fixture config parses");
    let bot = DotmaBot::new(config);

    let mut updated = ConfigLoader::parse(config_fixtures::minimal_config_yaml())
        .expect("fixture config parses");
    updated.discord.debug_channels = vec![ChannelId(42)];
    bot.config().update(updated);

    assert_eq!(bot.config().get().discord.debug_channels, vec![ChannelId(42)]);
}

#[test]
fn test_empty_prefix_config_is_rejected() {
    let err = ConfigLoader::parse(config_fixtures::empty_prefix_config_yaml()).unwrap_err();
    assert!(err.to_string().contains("prefix"));
}
