//! Persistence collaborator traits.
//!
//! The dispatcher only depends on these contracts; the concrete backend
//! lives in its own crate. All mutations are expressed as atomic,
//! conditional operations (increment-by-delta, set-level) so two
//! concurrent dispatch cycles touching the same user cannot lose
//! updates in application code.

use async_trait::async_trait;

use dotma_common::{AccessLevel, UserId, UserRecord};

/// Errors surfaced by the persistence collaborator.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The backend is connected but the operation failed.
    #[error("store backend error: {0}")]
    Backend(String),

    /// The record the operation targets does not exist.
    #[error("no record for user {0}")]
    UnknownUser(UserId),
}

/// Per-user persisted state: access levels and currency balances.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Whether the backend connection has resolved. Dispatch aborts
    /// while this is false; there is no retry queue.
    fn is_ready(&self) -> bool;

    /// Looks up a user record by platform ID.
    async fn user_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;

    /// Creates a record for a first-time user at the default rank.
    async fn create_user(&self, id: UserId) -> Result<UserRecord, StoreError>;

    /// Persists a new access level for an existing user.
    async fn set_access_level(&self, id: UserId, level: AccessLevel) -> Result<(), StoreError>;

    /// Atomically adjusts a currency balance, returning the new amount.
    async fn increment_currency(
        &self,
        id: UserId,
        currency: &str,
        delta: i64,
    ) -> Result<i64, StoreError>;
}

/// The global target list: users pinged by the default command.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TargetStore: Send + Sync {
    /// Current targets, in insertion order.
    async fn targets(&self) -> Result<Vec<UserId>, StoreError>;

    /// Appends a target. Adding an existing target is a no-op.
    async fn add_target(&self, id: UserId) -> Result<(), StoreError>;

    /// Removes a target, reporting whether it was present.
    async fn remove_target(&self, id: UserId) -> Result<bool, StoreError>;
}
