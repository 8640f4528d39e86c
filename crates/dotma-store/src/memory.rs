//! Dashmap-backed user and target stores.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info};

use dotma_common::{AccessLevel, UserId, UserRecord};
use dotma_dispatch::{StoreError, TargetStore, UserStore};

/// In-memory user store.
///
/// Starts not-ready; the owner flips readiness once start-up completes,
/// mirroring a backend whose connection resolves asynchronously.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<UserId, UserRecord>,
    ready: AtomicBool,
}

impl MemoryUserStore {
    /// Creates an empty, not-yet-ready store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the store as connected.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::SeqCst);
        info!("User store ready");
    }

    /// Seeds a record, for start-up fixtures and tests.
    pub fn insert(&self, record: UserRecord) {
        self.users.insert(record.id, record);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.get(&id).map(|entry| entry.clone()))
    }

    async fn create_user(&self, id: UserId) -> Result<UserRecord, StoreError> {
        let record = self
            .users
            .entry(id)
            .or_insert_with(|| UserRecord::new(id))
            .clone();
        debug!(user = %id, "Created user record");
        Ok(record)
    }

    async fn set_access_level(&self, id: UserId, level: AccessLevel) -> Result<(), StoreError> {
        let mut entry = self.users.get_mut(&id).ok_or(StoreError::UnknownUser(id))?;
        entry.access_level = level;
        info!(user = %id, level = %level, "Access level persisted");
        Ok(())
    }

    async fn increment_currency(
        &self,
        id: UserId,
        currency: &str,
        delta: i64,
    ) -> Result<i64, StoreError> {
        let mut entry = self.users.get_mut(&id).ok_or(StoreError::UnknownUser(id))?;
        let balance = entry.currency.entry(currency.to_string()).or_insert(0);
        *balance += delta;
        Ok(*balance)
    }
}

/// In-memory target list, insertion-ordered.
#[derive(Debug, Default)]
pub struct MemoryTargetStore {
    targets: Mutex<Vec<UserId>>,
}

impl MemoryTargetStore {
    /// Creates an empty target list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a target directly, bypassing the async interface.
    pub fn insert(&self, id: UserId) {
        let mut targets = self.targets.lock();
        if !targets.contains(&id) {
            targets.push(id);
        }
    }
}

#[async_trait]
impl TargetStore for MemoryTargetStore {
    async fn targets(&self) -> Result<Vec<UserId>, StoreError> {
        Ok(self.targets.lock().clone())
    }

    async fn add_target(&self, id: UserId) -> Result<(), StoreError> {
        let mut targets = self.targets.lock();
        if !targets.contains(&id) {
            targets.push(id);
            info!(user = %id, "Target added");
        }
        Ok(())
    }

    async fn remove_target(&self, id: UserId) -> Result<bool, StoreError> {
        let mut targets = self.targets.lock();
        let before = targets.len();
        targets.retain(|t| *t != id);
        let removed = targets.len() != before;
        if removed {
            info!(user = %id, "Target removed");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_readiness_flag() {
        let store = MemoryUserStore::new();
        assert!(!store.is_ready());
        store.mark_ready();
        assert!(store.is_ready());
    }

    #[tokio::test]
    async fn test_create_then_lookup() {
        let store = MemoryUserStore::new();
        let id = UserId(5);
        assert!(store.user_by_id(id).await.unwrap().is_none());

        let created = store.create_user(id).await.unwrap();
        assert_eq!(created.access_level, AccessLevel::Registered);
        assert_eq!(store.user_by_id(id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let store = MemoryUserStore::new();
        let id = UserId(5);
        store.create_user(id).await.unwrap();
        store.set_access_level(id, AccessLevel::Moderator).await.unwrap();

        // A second create must not reset the existing record.
        let record = store.create_user(id).await.unwrap();
        assert_eq!(record.access_level, AccessLevel::Moderator);
    }

    #[tokio::test]
    async fn test_increment_currency_accumulates() {
        let store = MemoryUserStore::new();
        let id = UserId(9);
        store.create_user(id).await.unwrap();

        assert_eq!(store.increment_currency(id, "DotmaCoin", 3).await.unwrap(), 3);
        assert_eq!(store.increment_currency(id, "DotmaCoin", -1).await.unwrap(), 2);
        assert_eq!(
            store.user_by_id(id).await.unwrap().unwrap().balance("DotmaCoin"),
            2
        );
    }

    #[tokio::test]
    async fn test_mutations_on_unknown_user_fail() {
        let store = MemoryUserStore::new();
        let missing = UserId(404);
        assert!(store
            .set_access_level(missing, AccessLevel::Registered)
            .await
            .is_err());
        assert!(store.increment_currency(missing, "DotmaCoin", 1).await.is_err());
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        use std::sync::Arc;

        let store = Arc::new(MemoryUserStore::new());
        let id = UserId(1);
        store.create_user(id).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.increment_currency(id, "DotmaCoin", 1).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let record = store.user_by_id(id).await.unwrap().unwrap();
        assert_eq!(record.balance("DotmaCoin"), 16);
    }

    #[tokio::test]
    async fn test_target_list_order_and_dedup() {
        let store = MemoryTargetStore::new();
        store.add_target(UserId(1)).await.unwrap();
        store.add_target(UserId(2)).await.unwrap();
        store.add_target(UserId(1)).await.unwrap();

        assert_eq!(store.targets().await.unwrap(), vec![UserId(1), UserId(2)]);

        assert!(store.remove_target(UserId(1)).await.unwrap());
        assert!(!store.remove_target(UserId(1)).await.unwrap());
        assert_eq!(store.targets().await.unwrap(), vec![UserId(2)]);
    }
}
