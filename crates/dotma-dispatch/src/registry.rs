//! Keyed store of all registered commands.

use std::collections::HashMap;

use tracing::{error, info};

use crate::command::{Command, CommandKey};

/// Insertion-ordered command registry.
///
/// Lookup by invocation key is O(1); enumeration preserves registration
/// order, which fixes the evaluation order of the passive trigger scan.
/// Mutation only happens during the load phase, before dispatch begins.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    entries: Vec<Command>,
    index: HashMap<CommandKey, usize>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command.
    ///
    /// Two executable commands cannot share an invocation key: the
    /// duplicate is reported and rejected, the original is retained.
    pub fn add(&mut self, command: Command) -> Result<(), DuplicateCommand> {
        if let Some(key) = command.invocation_key() {
            if self.index.contains_key(key) {
                error!(key = %key, "Rejected duplicate command registration");
                return Err(DuplicateCommand(key.clone()));
            }
            self.index.insert(key.clone(), self.entries.len());
        }
        info!(command = command.name(), "Registered command");
        self.entries.push(command);
        Ok(())
    }

    /// Looks up an executable command by invocation key.
    pub fn get(&self, key: &CommandKey) -> Option<&Command> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Enumerates all commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.entries.iter()
    }

    /// Count of successfully registered commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no commands.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registration rejected because the invocation key is already taken.
#[derive(thiserror::Error, Debug)]
#[error("a command is already registered under \"{0}\"")]
pub struct DuplicateCommand(pub CommandKey);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Action, Trigger};

    fn noop() -> Action {
        Action::new(|_state, _args| async { Ok(()) })
    }

    #[test]
    fn test_lookup_returns_registered_command() {
        let mut registry = CommandRegistry::new();
        registry.add(Command::executable("ping", 0, noop())).unwrap();
        registry.add(Command::executable("help", 0, noop())).unwrap();

        let cmd = registry.get(&CommandKey::named("ping")).unwrap();
        assert_eq!(cmd.name(), "ping");
        assert!(registry.get(&CommandKey::named("missing")).is_none());
    }

    #[test]
    fn test_duplicate_key_rejected_and_original_retained() {
        let mut registry = CommandRegistry::new();
        registry.add(Command::executable("ping", 0, noop())).unwrap();

        let duplicate = Command::executable("ping", 2, noop());
        assert!(registry.add(duplicate).is_err());

        assert_eq!(registry.len(), 1);
        let kept = registry.get(&CommandKey::named("ping")).unwrap();
        assert_eq!(kept.required_args(), 0);
    }

    #[test]
    fn test_default_key_registration() {
        let mut registry = CommandRegistry::new();
        registry
            .add(Command::executable(CommandKey::Default, 0, noop()))
            .unwrap();
        assert!(registry.get(&CommandKey::Default).is_some());
    }

    #[test]
    fn test_triggerables_do_not_collide() {
        let mut registry = CommandRegistry::new();
        let trigger = || Trigger::new(|_| false);
        registry
            .add(Command::triggerable("first", trigger(), noop()))
            .unwrap();
        registry
            .add(Command::triggerable("second", trigger(), noop()))
            .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_enumeration_preserves_insertion_order() {
        let mut registry = CommandRegistry::new();
        for name in ["alpha", "beta", "gamma"] {
            registry.add(Command::executable(name, 0, noop())).unwrap();
        }
        let names: Vec<&str> = registry.iter().map(Command::name).collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    }
}
