//! File-based State Store Adapter
//!
//! Stores one JSON blob per conversation on disk. File names are the SHA-256
//! of the conversation key, so arbitrary channel and conversation ids map to
//! safe, fixed-length names. Writes go to a temporary file that is renamed
//! into place, so a crash mid-write leaves the previous state intact.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::ConversationKey;
use crate::ports::{StateStore, StateStoreError};

/// File-based storage for conversation state blobs
#[derive(Debug, Clone)]
pub struct FileStateStore {
    base_path: PathBuf,
}

impl FileStateStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileStateStore::new("./data/conversations");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the blob for a conversation
    fn blob_path(&self, key: &ConversationKey) -> PathBuf {
        let digest = Sha256::digest(key.storage_key().as_bytes());
        let name: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        self.base_path.join(format!("{}.json", name))
    }

    /// Ensure the base directory exists
    async fn ensure_dir(&self) -> Result<(), StateStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StateStoreError::Io(e.to_string()))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn get(&self, key: &ConversationKey) -> Result<Option<Vec<u8>>, StateStoreError> {
        match fs::read(self.blob_path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StateStoreError::Io(e.to_string())),
        }
    }

    async fn set(&self, key: &ConversationKey, blob: Vec<u8>) -> Result<(), StateStoreError> {
        self.ensure_dir().await?;

        let path = self.blob_path(key);
        let tmp_path = path.with_extension("json.tmp");

        fs::write(&tmp_path, blob)
            .await
            .map_err(|e| StateStoreError::Io(e.to_string()))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| StateStoreError::Io(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, key: &ConversationKey) -> Result<(), StateStoreError> {
        match fs::remove_file(self.blob_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StateStoreError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key(conversation: &str) -> ConversationKey {
        ConversationKey::new("test", conversation).unwrap()
    }

    fn setup() -> (TempDir, FileStateStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStateStore::new(temp_dir.path().join("conversations"));
        (temp_dir, store)
    }

    #[tokio::test]
    async fn test_file_store_missing_key_is_none() {
        let (_temp, store) = setup();
        assert_eq!(store.get(&key("a")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_creates_directory_and_round_trips() {
        let (_temp, store) = setup();
        store.set(&key("a"), b"{\"stack\":[]}".to_vec()).await.unwrap();

        assert!(store.base_path().exists());
        assert_eq!(
            store.get(&key("a")).await.unwrap(),
            Some(b"{\"stack\":[]}".to_vec())
        );
    }

    #[tokio::test]
    async fn test_file_store_overwrites() {
        let (_temp, store) = setup();
        store.set(&key("a"), b"one".to_vec()).await.unwrap();
        store.set(&key("a"), b"two".to_vec()).await.unwrap();
        assert_eq!(store.get(&key("a")).await.unwrap(), Some(b"two".to_vec()));
    }

    #[tokio::test]
    async fn test_file_store_leaves_no_temp_files() {
        let (_temp, store) = setup();
        store.set(&key("a"), b"one".to_vec()).await.unwrap();

        let mut entries = fs::read_dir(store.base_path()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with(".json"));
    }

    #[tokio::test]
    async fn test_file_store_delete() {
        let (_temp, store) = setup();
        store.set(&key("a"), b"one".to_vec()).await.unwrap();
        store.delete(&key("a")).await.unwrap();
        assert_eq!(store.get(&key("a")).await.unwrap(), None);
        assert!(store.delete(&key("a")).await.is_ok());
    }

    #[test]
    fn test_file_names_are_hashed_and_distinct() {
        let store = FileStateStore::new("/tmp/unused");
        let a = store.blob_path(&key("../../etc/passwd"));
        let b = store.blob_path(&key("other"));

        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(Path::new("/tmp/unused")));
        assert_eq!(a.file_name().unwrap().len(), 64 + ".json".len());
    }
}
