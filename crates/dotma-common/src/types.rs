//! Common type definitions and newtype wrappers for domain modeling.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::access::AccessLevel;

/// A Discord channel ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Discord user ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted user record.
///
/// Created lazily on first qualifying interaction and read before every
/// command execution. Currency balances are keyed by currency name;
/// non-negative by convention, not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Platform user ID this record belongs to.
    pub id: UserId,
    /// Stored access level for command gating.
    pub access_level: AccessLevel,
    /// Currency balances, keyed by currency name.
    pub currency: HashMap<String, i64>,
}

impl UserRecord {
    /// Creates a fresh record at the lowest registered rank.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            access_level: AccessLevel::Registered,
            currency: HashMap::new(),
        }
    }

    /// Returns the balance for a currency, zero if the user never held it.
    pub fn balance(&self, currency: &str) -> i64 {
        self.currency.get(currency).copied().unwrap_or(0)
    }
}

/// Common result type for the application.
pub type Result<T> = std::result::Result<T, DotmaError>;

/// Application-wide error type.
#[derive(thiserror::Error, Debug)]
pub enum DotmaError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Discord API error.
    #[error("Discord API error: {0}")]
    Discord(String),

    /// Persistence error.
    #[error("Persistence error: {0}")]
    Store(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
