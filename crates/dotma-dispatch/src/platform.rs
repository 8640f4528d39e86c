//! Chat platform collaborator trait.
//!
//! The dispatcher and the built-in commands never talk to a concrete
//! client library; they go through [`Platform`]. The binary crate
//! provides the gateway-backed implementation, tests provide a mock.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use dotma_common::{ChannelId, UserId};

/// A message delivered by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Author of the message.
    pub author: UserId,
    /// Channel the message arrived in.
    pub channel: ChannelId,
    /// Raw message text.
    pub content: String,
}

/// Predicate over incoming messages, used to correlate awaited replies.
pub type MessagePredicate = Arc<dyn Fn(&IncomingMessage) -> bool + Send + Sync>;

/// Errors surfaced by the platform collaborator.
#[derive(thiserror::Error, Debug)]
pub enum PlatformError {
    /// An awaited reply did not arrive within the configured window.
    #[error("no matching reply arrived within the timeout")]
    Timeout,

    /// A send or reply call failed.
    #[error("platform send failed: {0}")]
    Send(String),

    /// Any other platform API failure.
    #[error("platform API error: {0}")]
    Api(String),
}

/// Operations the dispatch core needs from the chat platform.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Platform: Send + Sync {
    /// Sends a message to a channel.
    async fn send(&self, channel: ChannelId, text: &str) -> Result<(), PlatformError>;

    /// Replies to a user in a channel, addressing them by mention.
    async fn reply(
        &self,
        channel: ChannelId,
        user: UserId,
        text: &str,
    ) -> Result<(), PlatformError>;

    /// Waits for the next message in `channel` matching `predicate`.
    ///
    /// Non-matching messages are ignored; the wait is bounded by
    /// `timeout` and resolves to [`PlatformError::Timeout`] when the
    /// window elapses without a match.
    async fn await_next_matching(
        &self,
        channel: ChannelId,
        predicate: MessagePredicate,
        timeout: Duration,
    ) -> Result<IncomingMessage, PlatformError>;

    /// Whether the user currently holds administrator privilege in the
    /// surrounding context. Momentary platform fact, not persisted state.
    async fn has_elevated_privilege(&self, user: UserId) -> bool;

    /// Whether the ID resolves to a real platform user.
    async fn user_exists(&self, user: UserId) -> bool;

    /// Display name of a user, if resolvable.
    async fn display_name(&self, user: UserId) -> Option<String>;
}
