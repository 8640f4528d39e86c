//! The set of strings recognized as command prefixes.

use dotma_common::DotmaError;

/// Read-only ordered sequence of command prefixes.
///
/// Constructed once from configuration; the dispatcher tests inbound
/// messages against it in order, first match wins.
#[derive(Debug, Clone)]
pub struct PrefixRegistry {
    prefixes: Vec<String>,
}

impl PrefixRegistry {
    /// Builds the registry from configured prefixes.
    ///
    /// An empty list is a fatal configuration error: no message could
    /// ever resolve to a command.
    pub fn new(prefixes: Vec<String>) -> Result<Self, DotmaError> {
        if prefixes.is_empty() {
            return Err(DotmaError::Config(
                "No command prefixes configured".to_string(),
            ));
        }
        Ok(Self { prefixes })
    }

    /// The prefixes, in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }

    /// Whether the token is a recognized prefix.
    pub fn contains(&self, token: &str) -> bool {
        self.prefixes.iter().any(|p| p == token)
    }

    /// Number of configured prefixes.
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Always false; construction rejects the empty list.
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
