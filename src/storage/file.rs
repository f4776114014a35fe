//! Drafts stored as JSON files in a directory

use super::traits::DraftStore;
use crate::error::StorageError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// One `<key>.json` file per draft
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a key is stored at. `[A-Za-z0-9-]` is kept as is; every other
    /// byte, `_` included, becomes `_XX` hex, so distinct keys never share a
    /// file.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut file_stem = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                file_stem.push(char::from(byte));
            } else {
                file_stem.push_str(&format!("_{byte:02X}"));
            }
        }
        self.dir.join(format!("{file_stem}.json"))
    }
}

#[async_trait]
impl DraftStore for FileDraftStore {
    async fn save(&self, key: &str, draft: &str) -> Result<(), StorageError> {
        let write_err = |source| StorageError::Write {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).await.map_err(write_err)?;

        // Write then rename so a crash never leaves a half-written draft
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, draft).await.map_err(write_err)?;
        fs::rename(&tmp, &path).await.map_err(write_err)?;

        tracing::debug!("Wrote draft {key} to {}", path.display());
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Remove {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_for_sanitizes_key() {
        let store = FileDraftStore::new("/drafts");
        assert_eq!(
            store.path_for("admissionFormDraft"),
            PathBuf::from("/drafts/admissionFormDraft.json")
        );
        assert_eq!(
            store.path_for("../etc/passwd"),
            PathBuf::from("/drafts/_2E_2E_2Fetc_2Fpasswd.json")
        );
    }

    #[test]
    fn test_path_for_keeps_distinct_keys_apart() {
        let store = FileDraftStore::new("/drafts");
        assert_ne!(store.path_for("a.b"), store.path_for("a_b"));
        assert_ne!(store.path_for("a b"), store.path_for("a_20b"));
        assert_eq!(
            store.path_for("kiosk_3"),
            PathBuf::from("/drafts/kiosk_5F3.json")
        );
    }

    #[tokio::test]
    async fn test_similar_keys_do_not_overwrite_each_other() {
        let dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(dir.path());

        store.save("a.b", "dot").await.unwrap();
        store.save("a_b", "underscore").await.unwrap();

        assert_eq!(store.load("a.b").await.unwrap().as_deref(), Some("dot"));
        assert_eq!(
            store.load("a_b").await.unwrap().as_deref(),
            Some("underscore")
        );
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(dir.path());
        assert!(store.load("nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(dir.path().join("nested"));

        store.save("draft", r#"{"currentStep":2}"#).await.unwrap();

        let loaded = store.load("draft").await.unwrap();
        assert_eq!(loaded.as_deref(), Some(r#"{"currentStep":2}"#));
        assert!(!store.path_for("draft").with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_replaces_previous() {
        let dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(dir.path());

        store.save("draft", "one").await.unwrap();
        store.save("draft", "two").await.unwrap();

        assert_eq!(store.load("draft").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(dir.path());

        store.save("draft", "x").await.unwrap();
        store.remove("draft").await.unwrap();
        store.remove("draft").await.unwrap();

        assert!(store.load("draft").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_into_unwritable_location_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let store = FileDraftStore::new(blocker.join("drafts"));
        let err = store.save("draft", "x").await.unwrap_err();
        assert!(matches!(err, StorageError::Write { ref key, .. } if key == "draft"));
    }
}
