//! Ping commands: the plain `ping` and the default target ping.

use std::sync::Arc;

use tracing::warn;

use crate::manifest::CommandDeps;
use dotma_common::mention;
use dotma_dispatch::{
    Action, Command, CommandKey, ExecutionError, MessageState, TargetStore, UserStore,
};

/// `ping`: replies with "pong".
pub fn ping() -> Command {
    Command::executable(
        "ping",
        0,
        Action::new(|state: MessageState, _args| async move {
            state.send("pong").await?;
            Ok(())
        }),
    )
}

/// The no-keyword default: pings every target, awarding each a coin.
pub fn ping_targets(deps: &CommandDeps) -> Command {
    let users = deps.users.clone();
    let targets = deps.targets.clone();
    let currency = deps.currency.clone();

    Command::executable(
        CommandKey::Default,
        0,
        Action::new(move |state: MessageState, _args| {
            let users = users.clone();
            let targets = targets.clone();
            let currency = currency.clone();
            async move { send_target_ping(&state, &users, &targets, &currency).await }
        }),
    )
}

/// Builds and sends the target ping, incrementing each target's balance.
///
/// A store failure on one target does not stop the ping; the caller is
/// shown a single generic failure notice afterwards.
pub async fn send_target_ping(
    state: &MessageState,
    users: &Arc<dyn UserStore>,
    targets: &Arc<dyn TargetStore>,
    currency: &str,
) -> Result<(), ExecutionError> {
    let list = targets.targets().await?;

    let mut text = String::from("OwO someone said fortnite? ");
    let mut store_failed = false;

    for id in &list {
        text.push_str(&mention(*id));
        text.push(' ');
        if let Err(err) = users.increment_currency(*id, currency, 1).await {
            warn!(target = %id, error = %err, "Failed to award target");
            store_failed = true;
        }
    }
    text.push_str(" fortnite?");

    state.send(&text).await?;
    if store_failed {
        state.reply("DB Error.").await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotma_common::{ChannelId, UserId};
    use dotma_dispatch::MockPlatform;
    use dotma_store::{MemoryTargetStore, MemoryUserStore};

    fn state(platform: MockPlatform) -> MessageState {
        MessageState::new(Arc::new(platform), UserId(1), ChannelId(2), "! ping")
    }

    #[tokio::test]
    async fn test_ping_replies_pong() {
        let mut platform = MockPlatform::new();
        platform
            .expect_send()
            .withf(|_, text| text == "pong")
            .times(1)
            .returning(|_, _| Ok(()));

        let cmd = ping();
        cmd.execute_without_user(state(platform), Vec::new())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_target_ping_mentions_all_and_awards_coins() {
        let users = MemoryUserStore::new();
        users.mark_ready();
        let targets = MemoryTargetStore::new();
        let a = UserId(10);
        let b = UserId(20);
        for id in [a, b] {
            users.create_user(id).await.unwrap();
            targets.add_target(id).await.unwrap();
        }
        let users: Arc<dyn UserStore> = Arc::new(users);
        let targets: Arc<dyn TargetStore> = Arc::new(targets);

        let mut platform = MockPlatform::new();
        platform
            .expect_send()
            .withf(move |_, text| text.contains(&mention(a)) && text.contains(&mention(b)))
            .times(1)
            .returning(|_, _| Ok(()));

        send_target_ping(&state(platform), &users, &targets, "DotmaCoin")
            .await
            .unwrap();

        assert_eq!(
            users.user_by_id(a).await.unwrap().unwrap().balance("DotmaCoin"),
            1
        );
        assert_eq!(
            users.user_by_id(b).await.unwrap().unwrap().balance("DotmaCoin"),
            1
        );
    }

    #[tokio::test]
    async fn test_target_ping_reports_store_failure_once() {
        let users = MemoryUserStore::new();
        users.mark_ready();
        let targets = MemoryTargetStore::new();
        // Two targets with no user record behind them.
        targets.add_target(UserId(10)).await.unwrap();
        targets.add_target(UserId(20)).await.unwrap();
        let users: Arc<dyn UserStore> = Arc::new(users);
        let targets: Arc<dyn TargetStore> = Arc::new(targets);

        let mut platform = MockPlatform::new();
        platform.expect_send().times(1).returning(|_, _| Ok(()));
        platform
            .expect_reply()
            .withf(|_, _, text| text == "DB Error.")
            .times(1)
            .returning(|_, _, _| Ok(()));

        send_target_ping(&state(platform), &users, &targets, "DotmaCoin")
            .await
            .unwrap();
    }
}
