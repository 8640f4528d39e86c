//! Test utilities and shared test helpers for Dotma Bot.
//!
//! This module provides common testing utilities, fixtures, and helper
//! functions used across the workspace for unit and integration testing.

use std::sync::Once;

use crate::access::AccessLevel;
use crate::types::{ChannelId, UserId, UserRecord};

#[cfg(feature = "testing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
#[cfg(feature = "testing")]
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        fmt().with_test_writer().with_env_filter(filter).init();
    });
}

/// No-op version when tracing-subscriber is not available.
#[cfg(not(feature = "testing"))]
pub fn init_test_logging() {}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "testing")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Discord-related test fixtures.
pub mod discord_fixtures {
    use super::{ChannelId, UserId};

    /// Create a test channel ID.
    pub fn test_channel_id() -> ChannelId {
        ChannelId(123456789012345678)
    }

    /// Create a test user ID.
    pub fn test_user_id() -> UserId {
        UserId(987654321098765432)
    }

    /// Create multiple test user IDs.
    pub fn test_user_ids(count: usize) -> Vec<UserId> {
        (0..count)
            .map(|i| UserId(100000000000000000 + i as u64))
            .collect()
    }
}

/// User-record fixtures for dispatcher and store tests.
pub mod user_fixtures {
    use super::{AccessLevel, UserId, UserRecord};

    /// A registered user with a coin balance.
    pub fn registered_user(id: UserId, coins: i64) -> UserRecord {
        let mut record = UserRecord::new(id);
        record.currency.insert("DotmaCoin".to_string(), coins);
        record
    }

    /// A user record at an explicit access level.
    pub fn user_at_level(id: UserId, level: AccessLevel) -> UserRecord {
        let mut record = UserRecord::new(id);
        record.access_level = level;
        record
    }
}

/// Configuration fixtures, as YAML strings.
pub mod config_fixtures {
    /// Create a minimal valid test configuration as YAML string.
    pub fn minimal_config_yaml() -> &'static str {
        r#"
discord:
  token: "test_token"
  debug_channels: []

commands:
  prefixes: ["!", "!f"]

currency:
  name: "DotmaCoin"

flows:
  response_timeout_secs: 300
  min_loop_delay_secs: 1
"#
    }

    /// A configuration with no prefixes, which must fail validation.
    pub fn empty_prefix_config_yaml() -> &'static str {
        r#"
discord:
  token: "test_token"
  debug_channels: []

commands:
  prefixes: []

currency:
  name: "DotmaCoin"

flows:
  response_timeout_secs: 300
  min_loop_delay_secs: 1
"#
    }
}
