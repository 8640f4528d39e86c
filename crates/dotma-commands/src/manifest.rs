//! Start-up command manifest.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::announce::Announcer;
use crate::{announce, help, ping, shop, targets, triggers};
use dotma_dispatch::{
    CommandRegistry, DuplicateCommand, FlowGuard, TargetStore, UserStore,
};

/// Collaborators shared by the built-in commands.
#[derive(Clone)]
pub struct CommandDeps {
    /// Per-user persisted state.
    pub users: Arc<dyn UserStore>,
    /// The global target list.
    pub targets: Arc<dyn TargetStore>,
    /// Per-user interactive flow guard.
    pub flows: FlowGuard,
    /// The repeating announcement loop handle.
    pub announcer: Arc<Announcer>,
    /// Name of the currency awarded to ping targets.
    pub currency: String,
    /// Confirmation window for interactive flows.
    pub response_timeout: Duration,
    /// Lower bound on announcement loop delays.
    pub min_loop_delay: Duration,
}

/// Builds the registry of built-in commands, triggers first.
///
/// Registration order is load-bearing: it fixes the passive-trigger
/// evaluation order.
pub fn default_commands(deps: &CommandDeps) -> Result<CommandRegistry, DuplicateCommand> {
    let mut registry = CommandRegistry::new();

    registry.add(triggers::random_response())?;
    registry.add(triggers::fortnite_response(deps))?;
    registry.add(triggers::pubg_response())?;

    registry.add(ping::ping())?;
    registry.add(ping::ping_targets(deps))?;
    registry.add(help::help())?;
    registry.add(announce::auto(deps))?;
    registry.add(announce::stop(deps))?;
    registry.add(targets::target_list(deps))?;
    registry.add(targets::remove_self(deps))?;
    registry.add(targets::add_target(deps))?;
    registry.add(shop::shop())?;

    info!(count = registry.len(), "Loaded built-in commands");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotma_dispatch::{MockTargetStore, MockUserStore};

    fn test_deps() -> CommandDeps {
        CommandDeps {
            users: Arc::new(MockUserStore::new()),
            targets: Arc::new(MockTargetStore::new()),
            flows: FlowGuard::new(),
            announcer: Arc::new(Announcer::new()),
            currency: "DotmaCoin".to_string(),
            response_timeout: Duration::from_secs(300),
            min_loop_delay: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_manifest_registers_without_duplicates() {
        let registry = default_commands(&test_deps()).unwrap();
        assert_eq!(registry.len(), 12);
    }

    #[test]
    fn test_triggers_come_first() {
        let registry = default_commands(&test_deps()).unwrap();
        let heads: Vec<bool> = registry.iter().take(3).map(|c| c.is_triggerable()).collect();
        assert_eq!(heads, vec![true, true, true]);
    }
}
