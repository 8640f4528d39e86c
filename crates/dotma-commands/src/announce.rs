//! Paid repeating announcement loop: `auto` and `stop`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::manifest::CommandDeps;
use crate::ping::send_target_ping;
use dotma_dispatch::{
    Action, Command, IncomingMessage, MessagePredicate, MessageState, PlatformError,
};
use dotma_common::AccessLevel;

/// Handle over the single repeating announcement loop.
///
/// Starting a new loop cancels a previous one; `stop` cancels and
/// reports whether anything was running.
#[derive(Debug, Default)]
pub struct Announcer {
    running: Arc<Mutex<Option<CancellationToken>>>,
}

impl Announcer {
    /// Creates an idle announcer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a loop invoking `tick` every `delay`, `count` times.
    pub fn start<F, Fut>(&self, count: u64, delay: Duration, tick: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let token = CancellationToken::new();
        if let Some(previous) = self.running.lock().replace(token.clone()) {
            previous.cancel();
        }

        let slot = self.running.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(delay);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first interval tick resolves immediately; consume it so
            // the first announcement lands one delay after the start.
            interval.tick().await;

            for _ in 0..count {
                tokio::select! {
                    () = token.cancelled() => {
                        debug!("Announcement loop cancelled");
                        return;
                    }
                    _ = interval.tick() => tick().await,
                }
            }
            debug!("Announcement loop completed");

            // A cancelled token means start or stop already took the
            // slot over; only a naturally finished loop vacates it.
            let mut running = slot.lock();
            if !token.is_cancelled() {
                *running = None;
            }
        });
    }

    /// Cancels the running loop, reporting whether one existed.
    pub fn stop(&self) -> bool {
        if let Some(token) = self.running.lock().take() {
            token.cancel();
            true
        } else {
            false
        }
    }

    /// Whether a loop is active (started and neither stopped nor
    /// finished).
    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }
}

/// `auto <amount> <delay>`: confirmation-gated paid repeat of the
/// target ping. The price scales superlinearly with the amount and is
/// deducted atomically only after the caller confirms.
pub fn auto(deps: &CommandDeps) -> Command {
    let users = deps.users.clone();
    let targets = deps.targets.clone();
    let flows = deps.flows.clone();
    let announcer = deps.announcer.clone();
    let currency = deps.currency.clone();
    let timeout = deps.response_timeout;
    let min_delay = deps.min_loop_delay;

    Command::executable(
        "auto",
        2,
        Action::new(move |state: MessageState, args: Vec<String>| {
            let users = users.clone();
            let targets = targets.clone();
            let flows = flows.clone();
            let announcer = announcer.clone();
            let currency = currency.clone();
            async move {
                let (Ok(amount), Ok(delay_secs)) =
                    (args[0].parse::<u64>(), args[1].parse::<u64>())
                else {
                    state.send("Usage: !f auto `amount` `delay (seconds)`").await?;
                    return Ok(());
                };
                if Duration::from_secs(delay_secs) < min_delay {
                    state.send("Delay must be over 1s").await?;
                    return Ok(());
                }

                #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
                let price = (amount as f64).powf(1.1).ceil() as i64;

                let caller = state.author();
                let Some(user) = users.user_by_id(caller).await? else {
                    state.reply("You need a user record for this operation.").await?;
                    return Ok(());
                };
                let balance = user.balance(&currency);
                if balance < price {
                    state
                        .reply(&format!(
                            "You do not have enough **{currency}** for this operation.\n\
                             Operation Cost: **{price}**.\nYou have: **{balance}**."
                        ))
                        .await?;
                    return Ok(());
                }

                let Some(_ticket) = flows.try_begin(caller) else {
                    state.reply("You already have a pending confirmation.").await?;
                    return Err(dotma_dispatch::ExecutionError::FlowPending);
                };

                state
                    .reply(&format!(
                        "You requested auto pinging, this will cost **{price} {currency}s**.\n\
                         Start? `yes` or `no`."
                    ))
                    .await?;

                let predicate: MessagePredicate = Arc::new(move |msg: &IncomingMessage| {
                    msg.author == caller
                        && matches!(msg.content.trim().to_lowercase().as_str(), "yes" | "no")
                });

                match state.await_reply(predicate, timeout).await {
                    Ok(reply) if reply.content.trim().eq_ignore_ascii_case("yes") => {
                        if let Err(err) =
                            users.increment_currency(caller, &currency, -price).await
                        {
                            warn!(user = %caller, error = %err, "Failed to charge for auto ping");
                            state.send("DB Error.").await?;
                            return Ok(());
                        }

                        send_target_ping(&state, &users, &targets, &currency).await?;

                        let tick_state = state.clone();
                        let tick_users = users.clone();
                        let tick_targets = targets.clone();
                        let tick_currency = currency.clone();
                        announcer.start(amount, Duration::from_secs(delay_secs), move || {
                            let state = tick_state.clone();
                            let users = tick_users.clone();
                            let targets = tick_targets.clone();
                            let currency = tick_currency.clone();
                            async move {
                                if let Err(err) =
                                    send_target_ping(&state, &users, &targets, &currency).await
                                {
                                    warn!(error = %err, "Announcement tick failed");
                                }
                            }
                        });
                    }
                    Ok(_) => {
                        state.send("Okey.").await?;
                    }
                    Err(PlatformError::Timeout) => {
                        state.reply("Operation cancelled.").await?;
                    }
                    Err(err) => return Err(err.into()),
                }
                Ok(())
            }
        }),
    )
    .with_usage("Usage: !f auto `amount` `delay (seconds)`")
    .with_access(AccessLevel::Registered)
}

/// `stop`: cancels the running announcement loop.
pub fn stop(deps: &CommandDeps) -> Command {
    let announcer = deps.announcer.clone();

    Command::executable(
        "stop",
        0,
        Action::new(move |state: MessageState, _args| {
            let announcer = announcer.clone();
            async move {
                if announcer.stop() {
                    state.send("Okey, stopping.").await?;
                } else {
                    state.send("No auto ping is running.").await?;
                }
                Ok(())
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotma_common::{ChannelId, UserId, UserRecord};
    use dotma_dispatch::{ExecutionError, FlowGuard, MockPlatform, UserStore};
    use dotma_store::{MemoryTargetStore, MemoryUserStore};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CALLER: UserId = UserId(1);

    fn funded_deps(coins: i64) -> CommandDeps {
        let users = MemoryUserStore::new();
        users.mark_ready();
        let mut record = UserRecord::new(CALLER);
        record.currency.insert("DotmaCoin".to_string(), coins);
        users.insert(record);

        CommandDeps {
            users: Arc::new(users),
            targets: Arc::new(MemoryTargetStore::new()),
            flows: FlowGuard::new(),
            announcer: Arc::new(Announcer::new()),
            currency: "DotmaCoin".to_string(),
            response_timeout: Duration::from_secs(300),
            min_loop_delay: Duration::from_secs(1),
        }
    }

    fn state(platform: MockPlatform) -> MessageState {
        MessageState::new(Arc::new(platform), CALLER, ChannelId(2), "! auto 3 10")
    }

    fn caller_record() -> UserRecord {
        let mut record = UserRecord::new(CALLER);
        record.currency.insert("DotmaCoin".to_string(), i64::MAX);
        record
    }

    fn confirmation(content: &str) -> IncomingMessage {
        IncomingMessage {
            author: CALLER,
            channel: ChannelId(2),
            content: content.to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_announcer_ticks_then_completes() {
        let announcer = Announcer::new();
        let ticks = Arc::new(AtomicUsize::new(0));
        let ticks_clone = ticks.clone();

        announcer.start(3, Duration::from_secs(5), move || {
            let ticks = ticks_clone.clone();
            async move {
                ticks.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_secs(16)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_loop_vacates_running_state() {
        let announcer = Announcer::new();
        announcer.start(2, Duration::from_secs(5), || async {});

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(!announcer.is_running());
        assert!(!announcer.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_over_finished_loop_stays_running() {
        let announcer = Announcer::new();
        announcer.start(1, Duration::from_secs(5), || async {});
        tokio::time::sleep(Duration::from_secs(6)).await;

        announcer.start(100, Duration::from_secs(5), || async {});
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(announcer.is_running());
        assert!(announcer.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn test_announcer_stop_cancels() {
        let announcer = Announcer::new();
        let ticks = Arc::new(AtomicUsize::new(0));
        let ticks_clone = ticks.clone();

        announcer.start(100, Duration::from_secs(5), move || {
            let ticks = ticks_clone.clone();
            async move {
                ticks.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(announcer.stop());
        let after_stop = ticks.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), after_stop);
        assert!(!announcer.stop());
    }

    #[tokio::test]
    async fn test_auto_insufficient_balance() {
        let deps = funded_deps(1);

        let mut platform = MockPlatform::new();
        platform
            .expect_reply()
            .withf(|_, _, text| text.contains("do not have enough"))
            .times(1)
            .returning(|_, _, _| Ok(()));
        platform.expect_await_next_matching().never();

        let cmd = auto(&deps);
        cmd.execute_with_user(
            state(platform),
            vec!["10".to_string(), "10".to_string()],
            &caller_record(),
        )
        .await
        .unwrap();
        assert!(!deps.announcer.is_running());
    }

    #[tokio::test]
    async fn test_auto_confirmation_timeout_deducts_nothing() {
        let deps = funded_deps(1000);

        let mut platform = MockPlatform::new();
        platform.expect_reply().returning(|_, _, _| Ok(()));
        platform
            .expect_await_next_matching()
            .times(1)
            .returning(|_, _, _| Err(PlatformError::Timeout));

        let cmd = auto(&deps);
        cmd.execute_with_user(
            state(platform),
            vec!["10".to_string(), "10".to_string()],
            &caller_record(),
        )
        .await
        .unwrap();

        let record = deps.users.user_by_id(CALLER).await.unwrap().unwrap();
        assert_eq!(record.balance("DotmaCoin"), 1000);
        assert!(!deps.announcer.is_running());
        assert!(!deps.flows.is_pending(CALLER));
    }

    #[tokio::test]
    async fn test_auto_confirmed_charges_and_starts_loop() {
        let deps = funded_deps(1000);

        let mut platform = MockPlatform::new();
        platform.expect_reply().returning(|_, _, _| Ok(()));
        platform.expect_send().returning(|_, _| Ok(()));
        platform
            .expect_await_next_matching()
            .times(1)
            .returning(|_, _, _| Ok(confirmation("yes")));

        let cmd = auto(&deps);
        cmd.execute_with_user(
            state(platform),
            vec!["10".to_string(), "10".to_string()],
            &caller_record(),
        )
        .await
        .unwrap();

        // price = ceil(10^1.1) = 13
        let record = deps.users.user_by_id(CALLER).await.unwrap().unwrap();
        assert_eq!(record.balance("DotmaCoin"), 1000 - 13);
        assert!(deps.announcer.is_running());
        deps.announcer.stop();
    }

    #[tokio::test]
    async fn test_auto_non_numeric_args_show_usage() {
        let deps = funded_deps(1000);

        let mut platform = MockPlatform::new();
        platform
            .expect_send()
            .withf(|_, text| text.starts_with("Usage:"))
            .times(1)
            .returning(|_, _| Ok(()));

        let cmd = auto(&deps);
        cmd.execute_with_user(
            state(platform),
            vec!["lots".to_string(), "10".to_string()],
            &caller_record(),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_auto_rejects_second_pending_flow() {
        let deps = funded_deps(1000);
        let _held = deps.flows.try_begin(CALLER).unwrap();

        let mut platform = MockPlatform::new();
        platform
            .expect_reply()
            .withf(|_, _, text| text.contains("pending"))
            .times(1)
            .returning(|_, _, _| Ok(()));
        platform.expect_await_next_matching().never();

        let cmd = auto(&deps);
        let err = cmd
            .execute_with_user(
                state(platform),
                vec!["10".to_string(), "10".to_string()],
                &caller_record(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::FlowPending));
    }

    #[tokio::test]
    async fn test_stop_without_running_loop() {
        let deps = funded_deps(0);

        let mut platform = MockPlatform::new();
        platform
            .expect_send()
            .withf(|_, text| text.contains("No auto ping"))
            .times(1)
            .returning(|_, _| Ok(()));

        let cmd = stop(&deps);
        cmd.execute_without_user(state(platform), Vec::new())
            .await
            .unwrap();
    }
}
