//! In-process draft store

use super::traits::DraftStore;
use crate::error::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keeps drafts in memory for the lifetime of the process.
/// Suits embedding without a durable medium, and tests.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    drafts: RwLock<HashMap<String, String>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.drafts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.drafts.read().await.is_empty()
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn save(&self, key: &str, draft: &str) -> Result<(), StorageError> {
        self.drafts
            .write()
            .await
            .insert(key.to_string(), draft.to_string());
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.drafts.read().await.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.drafts.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_and_remove() {
        let store = MemoryDraftStore::new();
        assert!(store.is_empty().await);

        store.save("a", "1").await.unwrap();
        store.save("b", "2").await.unwrap();
        assert_eq!(store.len().await, 2);
        assert_eq!(store.load("a").await.unwrap().as_deref(), Some("1"));

        store.remove("a").await.unwrap();
        store.remove("a").await.unwrap();
        assert!(store.load("a").await.unwrap().is_none());
        assert_eq!(store.len().await, 1);
    }

    #[test]
    fn test_usable_from_blocking_code() {
        let store = MemoryDraftStore::new();
        tokio_test::block_on(store.save("k", "v")).unwrap();
        let loaded = tokio_test::block_on(store.load("k")).unwrap();
        assert_eq!(loaded.as_deref(), Some("v"));
    }
}
