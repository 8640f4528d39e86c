//! Command, action, and trigger contracts.
//!
//! A command is a tagged variant over the two capabilities: executable
//! (fires on explicit prefix + keyword) and triggerable (fires passively
//! when its predicate matches an un-prefixed message). Each carries its
//! effect as an [`Action`]; triggerables additionally carry a pure
//! [`Trigger`] predicate, kept separate so matching logic can be tested
//! without running side effects.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::ExecutionError;
use crate::state::MessageState;
use dotma_common::{AccessLevel, UserRecord};

/// Invocation key of an executable command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandKey {
    /// A prefixed invocation with no keyword token.
    Default,
    /// An explicit keyword.
    Named(String),
}

impl CommandKey {
    /// Builds a named key.
    pub fn named(key: impl Into<String>) -> Self {
        Self::Named(key.into())
    }
}

impl fmt::Display for CommandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "<default>"),
            Self::Named(key) => write!(f, "{key}"),
        }
    }
}

impl From<&str> for CommandKey {
    fn from(key: &str) -> Self {
        Self::Named(key.to_string())
    }
}

type ActionFn =
    dyn Fn(MessageState, Vec<String>) -> BoxFuture<'static, Result<(), ExecutionError>>
        + Send
        + Sync;

/// A single effectful function executed when a command fires.
///
/// Arguments travel in the call, never on the command, so concurrent
/// invocations of the same command cannot share mutable state.
#[derive(Clone)]
pub struct Action(Arc<ActionFn>);

impl Action {
    /// Wraps an async closure as an action.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(MessageState, Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ExecutionError>> + Send + 'static,
    {
        Self(Arc::new(move |state, args| Box::pin(f(state, args))))
    }

    /// Runs the action.
    pub async fn run(
        &self,
        state: MessageState,
        args: Vec<String>,
    ) -> Result<(), ExecutionError> {
        (self.0)(state, args).await
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action")
    }
}

type TriggerFn = dyn Fn(&MessageState) -> bool + Send + Sync;

/// A pure predicate over message state.
///
/// Evaluated against every inbound message that did not match a prefix,
/// so implementations must stay cheap and side-effect free.
#[derive(Clone)]
pub struct Trigger(Arc<TriggerFn>);

impl Trigger {
    /// Wraps a predicate closure as a trigger.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&MessageState) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Evaluates the predicate.
    pub fn matches(&self, state: &MessageState) -> bool {
        (self.0)(state)
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Trigger")
    }
}

/// The two command capabilities.
#[derive(Debug, Clone)]
pub enum CommandKind {
    /// Invoked only via explicit prefix + keyword match.
    Executable {
        /// Invocation key resolved by the dispatcher.
        key: CommandKey,
        /// Required argument count; 0 consumes all remaining tokens.
        required_args: usize,
        /// Usage text shown on an argument-count mismatch.
        usage: Option<String>,
    },
    /// Invoked passively whenever the trigger matches a message.
    Triggerable {
        /// Matching predicate.
        trigger: Trigger,
    },
}

/// A registered command: identity, gating level, capability, effect.
///
/// Constructed once at load time and immutable thereafter.
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    access: AccessLevel,
    kind: CommandKind,
    action: Action,
}

impl Command {
    /// Builds an executable command keyed by `key`.
    pub fn executable(key: impl Into<CommandKey>, required_args: usize, action: Action) -> Self {
        let key = key.into();
        Self {
            name: key.to_string(),
            access: AccessLevel::Unregistered,
            kind: CommandKind::Executable {
                key,
                required_args,
                usage: None,
            },
            action,
        }
    }

    /// Builds a passively triggered command.
    pub fn triggerable(name: impl Into<String>, trigger: Trigger, action: Action) -> Self {
        Self {
            name: name.into(),
            access: AccessLevel::Unregistered,
            kind: CommandKind::Triggerable { trigger },
            action,
        }
    }

    /// Sets the minimum access level required to execute.
    #[must_use]
    pub const fn with_access(mut self, access: AccessLevel) -> Self {
        self.access = access;
        self
    }

    /// Attaches usage text shown on an argument-count mismatch.
    #[must_use]
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        if let CommandKind::Executable { usage: slot, .. } = &mut self.kind {
            *slot = Some(usage.into());
        }
        self
    }

    /// Human-readable name, for log lines.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Minimum access level required to execute.
    pub const fn access(&self) -> AccessLevel {
        self.access
    }

    /// Invocation key, when the command is executable.
    pub const fn invocation_key(&self) -> Option<&CommandKey> {
        match &self.kind {
            CommandKind::Executable { key, .. } => Some(key),
            CommandKind::Triggerable { .. } => None,
        }
    }

    /// Required argument count; 0 means "consume all remaining tokens".
    /// Triggerables never take explicit arguments.
    pub const fn required_args(&self) -> usize {
        match &self.kind {
            CommandKind::Executable { required_args, .. } => *required_args,
            CommandKind::Triggerable { .. } => 0,
        }
    }

    /// Whether this command participates in the passive trigger scan.
    pub const fn is_triggerable(&self) -> bool {
        matches!(self.kind, CommandKind::Triggerable { .. })
    }

    /// Evaluates the trigger predicate. Always false for executables.
    pub fn matches(&self, state: &MessageState) -> bool {
        match &self.kind {
            CommandKind::Triggerable { trigger } => trigger.matches(state),
            CommandKind::Executable { .. } => false,
        }
    }

    /// Sends the usage text, when present. Triggerable and auto-fired
    /// commands never display usage.
    pub async fn display_usage(&self, state: &MessageState) {
        if let CommandKind::Executable {
            usage: Some(usage), ..
        } = &self.kind
        {
            if let Err(err) = state.send(usage).await {
                tracing::warn!(command = %self.name, error = %err, "Failed to send usage text");
            }
        }
    }

    /// Executes for a known, persisted user.
    pub async fn execute_with_user(
        &self,
        state: MessageState,
        args: Vec<String>,
        user: &UserRecord,
    ) -> Result<(), ExecutionError> {
        if user.access_level < self.access {
            return Err(ExecutionError::AccessDenied {
                required: self.access,
                actual: user.access_level,
            });
        }
        self.action.run(state, args).await
    }

    /// Executes for an unregistered caller. Must not assume any
    /// persisted data exists; only commands open to unregistered users
    /// run on this path.
    pub async fn execute_without_user(
        &self,
        state: MessageState,
        args: Vec<String>,
    ) -> Result<(), ExecutionError> {
        if self.access > AccessLevel::Unregistered {
            return Err(ExecutionError::AccessDenied {
                required: self.access,
                actual: AccessLevel::Unregistered,
            });
        }
        self.action.run(state, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MockPlatform;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noop_action() -> Action {
        Action::new(|_state, _args| async { Ok(()) })
    }

    fn state_with_content(content: &str) -> MessageState {
        let platform = MockPlatform::new();
        MessageState::new(
            Arc::new(platform),
            dotma_common::UserId(1),
            dotma_common::ChannelId(2),
            content,
        )
    }

    #[test]
    fn test_key_display() {
        assert_eq!(CommandKey::Default.to_string(), "<default>");
        assert_eq!(CommandKey::named("ping").to_string(), "ping");
    }

    #[test]
    fn test_executable_shape() {
        let cmd = Command::executable("ping", 0, noop_action());
        assert_eq!(cmd.invocation_key(), Some(&CommandKey::named("ping")));
        assert_eq!(cmd.required_args(), 0);
        assert!(!cmd.is_triggerable());
        assert!(!cmd.matches(&state_with_content("anything")));
    }

    #[test]
    fn test_triggerable_matches() {
        let cmd = Command::triggerable(
            "greeting",
            Trigger::new(|state| state.content().contains("hello")),
            noop_action(),
        );
        assert!(cmd.is_triggerable());
        assert!(cmd.invocation_key().is_none());
        assert!(cmd.matches(&state_with_content("well hello there")));
        assert!(!cmd.matches(&state_with_content("goodbye")));
    }

    #[tokio::test]
    async fn test_access_gating_with_user() {
        let cmd = Command::executable("admin", 0, noop_action())
            .with_access(dotma_common::AccessLevel::Administrator);
        let user = dotma_common::UserRecord::new(dotma_common::UserId(1));

        let err = cmd
            .execute_with_user(state_with_content("x"), Vec::new(), &user)
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::AccessDenied { .. }));
    }

    #[tokio::test]
    async fn test_unregistered_path_rejects_gated_commands() {
        let cmd = Command::executable("admin", 0, noop_action())
            .with_access(dotma_common::AccessLevel::Registered);
        let err = cmd
            .execute_without_user(state_with_content("x"), Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::AccessDenied { .. }));
    }

    #[tokio::test]
    async fn test_action_receives_args_in_order() {
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();
        let action = Action::new(move |_state, args| {
            let seen = seen_clone.clone();
            async move {
                assert_eq!(args, vec!["a", "b", "c"]);
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });
        let cmd = Command::executable("echo", 3, action);
        let user = dotma_common::UserRecord::new(dotma_common::UserId(1));

        cmd.execute_with_user(
            state_with_content("x"),
            vec!["a".into(), "b".into(), "c".into()],
            &user,
        )
        .await
        .unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
