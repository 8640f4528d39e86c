//! Per-message session state handed to actions and triggers.

use std::sync::Arc;
use std::time::Duration;

use crate::platform::{IncomingMessage, MessagePredicate, Platform, PlatformError};
use dotma_common::{ChannelId, UserId};

/// Ephemeral state wrapping one inbound message.
///
/// Cheap to clone; constructed per event and dropped when the dispatch
/// cycle completes. Carries everything an action needs to reply.
#[derive(Clone)]
pub struct MessageState {
    platform: Arc<dyn Platform>,
    author: UserId,
    channel: ChannelId,
    content: String,
}

impl MessageState {
    /// Creates the state for one inbound message.
    pub fn new(
        platform: Arc<dyn Platform>,
        author: UserId,
        channel: ChannelId,
        content: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            author,
            channel,
            content: content.into(),
        }
    }

    /// The platform handle.
    pub fn platform(&self) -> &Arc<dyn Platform> {
        &self.platform
    }

    /// Author of the inbound message.
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Channel the message arrived in.
    pub const fn channel(&self) -> ChannelId {
        self.channel
    }

    /// Raw message text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Sends to the originating channel.
    pub async fn send(&self, text: &str) -> Result<(), PlatformError> {
        self.platform.send(self.channel, text).await
    }

    /// Replies to the message author in the originating channel.
    pub async fn reply(&self, text: &str) -> Result<(), PlatformError> {
        self.platform.reply(self.channel, self.author, text).await
    }

    /// Waits for a follow-up message in this channel matching `predicate`.
    pub async fn await_reply(
        &self,
        predicate: MessagePredicate,
        timeout: Duration,
    ) -> Result<IncomingMessage, PlatformError> {
        self.platform
            .await_next_matching(self.channel, predicate, timeout)
            .await
    }
}

impl std::fmt::Debug for MessageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageState")
            .field("author", &self.author)
            .field("channel", &self.channel)
            .field("content", &self.content)
            .finish_non_exhaustive()
    }
}
