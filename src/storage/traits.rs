//! Trait abstraction for draft persistence to enable mocking in tests

use crate::error::StorageError;
use async_trait::async_trait;

/// Opaque key/value boundary the wizard persists drafts through
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Store a serialized draft under `key`, replacing any previous one
    async fn save(&self, key: &str, draft: &str) -> Result<(), StorageError>;

    /// Read the serialized draft for `key`, if one exists
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Delete the draft for `key`. Missing drafts are not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
