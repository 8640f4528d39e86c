//! Serenity-backed [`Platform`] implementation.
//!
//! One instance is built per inbound message event; it captures the
//! HTTP handle, the shard messenger (for reply collectors), and the
//! guild the message arrived in (for privilege lookups).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serenity::collector::MessageCollector;
use serenity::gateway::ShardMessenger;
use serenity::http::Http;
use serenity::model::id::GuildId;
use tracing::debug;

use dotma_common::{mention, ChannelId, UserId};
use dotma_dispatch::{IncomingMessage, MessagePredicate, Platform, PlatformError};

/// Gateway-backed platform handle for one message event.
pub struct SerenityPlatform {
    http: Arc<Http>,
    shard: ShardMessenger,
    guild: Option<GuildId>,
}

impl SerenityPlatform {
    /// Captures the pieces of a message event the dispatch core needs.
    pub fn new(http: Arc<Http>, shard: ShardMessenger, guild: Option<GuildId>) -> Self {
        Self { http, shard, guild }
    }
}

#[async_trait]
impl Platform for SerenityPlatform {
    async fn send(&self, channel: ChannelId, text: &str) -> Result<(), PlatformError> {
        serenity::model::id::ChannelId::new(channel.0)
            .say(&self.http, text)
            .await
            .map_err(|err| PlatformError::Send(err.to_string()))?;
        Ok(())
    }

    async fn reply(
        &self,
        channel: ChannelId,
        user: UserId,
        text: &str,
    ) -> Result<(), PlatformError> {
        self.send(channel, &format!("{}, {text}", mention(user))).await
    }

    async fn await_next_matching(
        &self,
        channel: ChannelId,
        predicate: MessagePredicate,
        timeout: Duration,
    ) -> Result<IncomingMessage, PlatformError> {
        let stream = MessageCollector::new(&self.shard)
            .channel_id(serenity::model::id::ChannelId::new(channel.0))
            .timeout(timeout)
            .stream();

        let candidates = stream.filter_map(move |msg| async move {
            (!msg.author.bot).then(|| IncomingMessage {
                author: UserId(msg.author.id.get()),
                channel,
                content: msg.content.to_string(),
            })
        });
        first_matching(std::pin::pin!(candidates), &predicate).await
    }

    async fn has_elevated_privilege(&self, user: UserId) -> bool {
        let Some(guild_id) = self.guild else {
            return false;
        };
        let member = match self
            .http
            .get_member(guild_id, serenity::model::id::UserId::new(user.0))
            .await
        {
            Ok(member) => member,
            Err(_) => return false,
        };
        match self.http.get_guild(guild_id).await {
            Ok(guild) => guild.member_permissions(&member).administrator(),
            Err(_) => false,
        }
    }

    async fn user_exists(&self, user: UserId) -> bool {
        self.http
            .get_user(serenity::model::id::UserId::new(user.0))
            .await
            .is_ok()
    }

    async fn display_name(&self, user: UserId) -> Option<String> {
        self.http
            .get_user(serenity::model::id::UserId::new(user.0))
            .await
            .ok()
            .map(|u| {
                u.global_name
                    .as_ref()
                    .map_or_else(|| u.name.to_string(), ToString::to_string)
            })
    }
}

/// Resolves to the first candidate that passes `predicate`, or to
/// [`PlatformError::Timeout`] when the stream closes without one.
///
/// Non-matching chatter from other users must never end the wait; only
/// the collector's own timeout closes the stream.
async fn first_matching<S>(
    mut candidates: S,
    predicate: &MessagePredicate,
) -> Result<IncomingMessage, PlatformError>
where
    S: futures::Stream<Item = IncomingMessage> + Unpin,
{
    while let Some(candidate) = candidates.next().await {
        if predicate(&candidate) {
            return Ok(candidate);
        }
        debug!(author = %candidate.author, "Ignoring non-matching reply candidate");
    }
    Err(PlatformError::Timeout)
}
