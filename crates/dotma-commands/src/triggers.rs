//! Passive triggers evaluated against every un-prefixed message.

use crate::manifest::CommandDeps;
use crate::ping::send_target_ping;
use dotma_common::utils::normalize_for_match;
use dotma_dispatch::{Action, Command, MessageState, Trigger};

/// Keyword trigger: pings the target list whenever a message mentions
/// the keyword, with whitespace stripped and case ignored. Messages
/// starting with `!` are left to the prefix path.
pub fn fortnite_response(deps: &CommandDeps) -> Command {
    let users = deps.users.clone();
    let targets = deps.targets.clone();
    let currency = deps.currency.clone();

    Command::triggerable(
        "fortnite-response",
        Trigger::new(|state: &MessageState| {
            normalize_for_match(state.content()).contains("fortnite")
                && !state.content().starts_with('!')
        }),
        Action::new(move |state: MessageState, _args| {
            let users = users.clone();
            let targets = targets.clone();
            let currency = currency.clone();
            async move { send_target_ping(&state, &users, &targets, &currency).await }
        }),
    )
}

/// Second keyword trigger, reply only.
pub fn pubg_response() -> Command {
    Command::triggerable(
        "pubg-response",
        Trigger::new(|state: &MessageState| {
            normalize_for_match(state.content()).contains("pubg")
        }),
        Action::new(|state: MessageState, _args| async move {
            state.send("OwO someone said pubg? (this is a sample)").await?;
            Ok(())
        }),
    )
}

/// Random trigger: fires on 5% of un-prefixed messages.
pub fn random_response() -> Command {
    Command::triggerable(
        "random-response",
        Trigger::new(|_state: &MessageState| fastrand::u8(0..100) < 5),
        Action::new(|state: MessageState, _args| async move {
            state
                .send("This message only has a 1/25 chance of appearing")
                .await?;
            Ok(())
        }),
    )
}
