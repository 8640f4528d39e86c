//! Target list management: listing, self-removal, and the consent flow
//! for adding a new target.

use std::sync::Arc;

use tracing::warn;

use crate::manifest::CommandDeps;
use dotma_common::{mention, parse_mention};
use dotma_dispatch::{
    Action, Command, ExecutionError, IncomingMessage, MessagePredicate, MessageState,
    PlatformError,
};

/// `targetlist`: lists current targets with display names.
pub fn target_list(deps: &CommandDeps) -> Command {
    let targets = deps.targets.clone();

    Command::executable(
        "targetlist",
        0,
        Action::new(move |state: MessageState, _args| {
            let targets = targets.clone();
            async move {
                let list = targets.targets().await?;

                let mut text = format!("```Current Targets: ({})\n", list.len());
                for id in &list {
                    if let Some(name) = state.platform().display_name(*id).await {
                        text.push_str(&format!("- {name}\n"));
                    }
                }
                text.push_str("```");

                state.send(&text).await?;
                Ok(())
            }
        }),
    )
}

/// `removeself`: removes the caller from the target list.
pub fn remove_self(deps: &CommandDeps) -> Command {
    let targets = deps.targets.clone();

    Command::executable(
        "removeself",
        0,
        Action::new(move |state: MessageState, _args| {
            let targets = targets.clone();
            async move {
                match targets.remove_target(state.author()).await {
                    Ok(true) => state.send("Removed successfully.").await?,
                    Ok(false) => state.send("You are not a target.").await?,
                    Err(err) => {
                        warn!(error = %err, "Failed to remove target");
                        state.send("Failed to remove.").await?;
                    }
                }
                Ok(())
            }
        }),
    )
}

/// `target @user`: asks the mentioned user for consent before adding
/// them to the target list. The awaited reply is bounded by the
/// configured window; on timeout nothing is mutated.
pub fn add_target(deps: &CommandDeps) -> Command {
    let users = deps.users.clone();
    let targets = deps.targets.clone();
    let flows = deps.flows.clone();
    let timeout = deps.response_timeout;

    Command::executable(
        "target",
        0,
        Action::new(move |state: MessageState, args: Vec<String>| {
            let users = users.clone();
            let targets = targets.clone();
            let flows = flows.clone();
            async move {
                if args.len() != 1 {
                    state.send("Usage: `!f target @user`.").await?;
                    return Ok(());
                }

                let Some(id) = parse_mention(&args[0]) else {
                    state.send("Target must be a user.").await?;
                    return Ok(());
                };
                if !state.platform().user_exists(id).await {
                    state.send("Target must be a user.").await?;
                    return Ok(());
                }
                if targets.targets().await?.contains(&id) {
                    state.send("User is already a Target").await?;
                    return Ok(());
                }

                // One pending consent dialog per user.
                let Some(_ticket) = flows.try_begin(id) else {
                    state
                        .send("A confirmation for that user is already pending.")
                        .await?;
                    return Err(ExecutionError::FlowPending);
                };

                state
                    .send(&format!(
                        "{}, would you like to be added as a target? \n`yes` or `no`.",
                        mention(id)
                    ))
                    .await?;

                let predicate: MessagePredicate = Arc::new(move |msg: &IncomingMessage| {
                    msg.author == id
                        && matches!(msg.content.trim().to_lowercase().as_str(), "yes" | "no")
                });

                match state.await_reply(predicate, timeout).await {
                    Ok(reply) if reply.content.trim().eq_ignore_ascii_case("yes") => {
                        state.send("Okey, adding you as a target.").await?;
                        users.create_user(id).await?;
                        match targets.add_target(id).await {
                            Ok(()) => state.send("Added successfully.").await?,
                            Err(err) => {
                                warn!(target = %id, error = %err, "Failed to add target");
                                state.send("Failed to add as target.").await?;
                            }
                        }
                    }
                    Ok(_) => {
                        state.send("Okey.").await?;
                    }
                    Err(PlatformError::Timeout) => {
                        state.send("User did not respond in time.").await?;
                    }
                    Err(err) => return Err(err.into()),
                }
                Ok(())
            }
        }),
    )
}
