//! The dispatcher: turns an inbound line into zero-or-one command
//! executions, or zero-or-many passive trigger executions.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::command::{Command, CommandKey};
use crate::error::DispatchError;
use crate::prefix::PrefixRegistry;
use crate::registry::CommandRegistry;
use crate::state::MessageState;
use crate::store::UserStore;
use dotma_common::{AccessLevel, UserId, UserRecord};

/// Terminal state of one dispatch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// An executable command's action ran to completion.
    Executed,
    /// A command was resolved but execution was refused or failed;
    /// the failure was logged and swallowed here.
    Rejected,
    /// No prefix matched, or no command was registered under the
    /// resolved keyword. Silent.
    NoMatch,
    /// The passive scan fired this many triggers.
    TriggersFired(usize),
}

/// How a command execution was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExecMode {
    /// Explicit prefix + keyword invocation; arguments are checked.
    Explicit,
    /// Passive trigger firing; triggers never take explicit arguments,
    /// so the argument-count check is skipped.
    Auto,
}

/// Orchestrates prefix resolution, command lookup, argument extraction,
/// readiness and privilege gating, and action invocation.
///
/// Collaborators arrive at construction; the registries are frozen
/// before dispatch begins, so the dispatcher is freely shareable.
pub struct Dispatcher {
    prefixes: PrefixRegistry,
    registry: CommandRegistry,
    store: Arc<dyn UserStore>,
}

impl Dispatcher {
    /// Creates a dispatcher over a frozen registry.
    pub fn new(
        prefixes: PrefixRegistry,
        registry: CommandRegistry,
        store: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            prefixes,
            registry,
            store,
        }
    }

    /// The command registry, for introspection (help text, counts).
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Dispatches one inbound message.
    ///
    /// A line whose first token equals a configured prefix takes the
    /// executable path; everything else is scanned against the passive
    /// triggers. Nothing raised inside a cycle propagates to the caller.
    pub async fn parse_line(
        &self,
        line: &str,
        user_id: UserId,
        state: &MessageState,
    ) -> DispatchOutcome {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        for prefix in self.prefixes.iter() {
            if tokens.first() == Some(&prefix) {
                return self.dispatch_prefixed(&tokens, user_id, state).await;
            }
        }

        self.scan_triggers(user_id, state).await
    }

    /// Executable path: keyword resolution, argument extraction,
    /// execution. Unresolvable keywords abort silently.
    async fn dispatch_prefixed(
        &self,
        tokens: &[&str],
        user_id: UserId,
        state: &MessageState,
    ) -> DispatchOutcome {
        let key = tokens
            .get(1)
            .map_or(CommandKey::Default, |keyword| CommandKey::named(*keyword));

        let Some(command) = self.registry.get(&key) else {
            debug!(key = %key, "No command registered under keyword");
            return DispatchOutcome::NoMatch;
        };

        let args = extract_arguments(tokens, command.required_args());

        match self
            .attempt_execution(command, args, user_id, state, ExecMode::Explicit)
            .await
        {
            Ok(()) => DispatchOutcome::Executed,
            Err(err) => {
                warn!(
                    command = command.name(),
                    kind = err.kind(),
                    error = %err,
                    "Execution failed"
                );
                DispatchOutcome::Rejected
            }
        }
    }

    /// Passive scan: every triggerable whose predicate matches fires
    /// independently, in registration order. One failing trigger never
    /// blocks evaluation of the rest.
    async fn scan_triggers(&self, user_id: UserId, state: &MessageState) -> DispatchOutcome {
        let mut fired = 0;

        for command in self.registry.iter() {
            if !command.matches(state) {
                continue;
            }
            fired += 1;
            if let Err(err) = self
                .attempt_execution(command, Vec::new(), user_id, state, ExecMode::Auto)
                .await
            {
                warn!(
                    command = command.name(),
                    kind = err.kind(),
                    error = %err,
                    "Auto execution failed"
                );
            }
        }

        if fired == 0 {
            DispatchOutcome::NoMatch
        } else {
            DispatchOutcome::TriggersFired(fired)
        }
    }

    /// The authoritative execution gate: readiness, argument count,
    /// user resolution, privilege ratchet, action invocation.
    async fn attempt_execution(
        &self,
        command: &Command,
        args: Vec<String>,
        user_id: UserId,
        state: &MessageState,
        mode: ExecMode,
    ) -> Result<(), DispatchError> {
        if !self.store.is_ready() {
            warn!("Dispatch aborted: waiting for the persistence connection to resolve");
            return Err(DispatchError::NotReady);
        }

        if mode == ExecMode::Explicit
            && command.required_args() != 0
            && args.len() != command.required_args()
        {
            command.display_usage(state).await;
            return Err(DispatchError::InvalidArguments);
        }

        let user = self.store.user_by_id(user_id).await?;
        let user = match user {
            Some(user) => Some(self.maybe_escalate(user, state).await?),
            None => None,
        };

        match user {
            Some(user) => {
                info!(command = command.name(), user = %user_id, "Executing command");
                command.execute_with_user(state.clone(), args, &user).await?;
            }
            None => {
                info!(
                    command = command.name(),
                    user = %user_id,
                    "Executing command for unregistered caller"
                );
                command.execute_without_user(state.clone(), args).await?;
            }
        }

        Ok(())
    }

    /// One-way privilege ratchet: a persisted user who currently holds
    /// administrator privilege on the platform is raised to
    /// ADMINISTRATOR and informed. Never downgrades, never touches
    /// DEVELOPER. There is deliberately no de-escalation path.
    async fn maybe_escalate(
        &self,
        mut user: UserRecord,
        state: &MessageState,
    ) -> Result<UserRecord, DispatchError> {
        if state.platform().has_elevated_privilege(user.id).await
            && user.access_level < AccessLevel::Administrator
            && user.access_level != AccessLevel::Developer
        {
            self.store
                .set_access_level(user.id, AccessLevel::Administrator)
                .await?;
            user.access_level = AccessLevel::Administrator;
            info!(user = %user.id, "Access level raised to ADMINISTRATOR");
            state
                .reply(
                    "You are a server administrator. \
                     Your access level has been set to **ADMINISTRATOR**.",
                )
                .await?;
        }
        Ok(user)
    }
}

/// Extracts command arguments from the token stream.
///
/// Tokens 0 and 1 are the prefix and keyword. A requirement of 0 means
/// "consume all remaining tokens"; otherwise at most `required` tokens
/// are taken and the execution step performs the authoritative count
/// check.
fn extract_arguments(tokens: &[&str], required: usize) -> Vec<String> {
    let rest = tokens.iter().skip(2).map(|t| (*t).to_string());
    if required == 0 {
        rest.collect()
    } else {
        rest.take(required).collect()
    }
}
