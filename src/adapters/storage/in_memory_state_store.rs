//! In-Memory State Store Adapter
//!
//! Keeps conversation blobs in a map. Useful for tests and local development;
//! everything is lost when the process exits.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::ConversationKey;
use crate::ports::{StateStore, StateStoreError};

/// In-memory storage for conversation state blobs
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    blobs: Arc<RwLock<HashMap<ConversationKey, Vec<u8>>>>,
}

impl InMemoryStateStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.blobs.write().await.clear();
    }

    /// Number of conversations with persisted state
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get(&self, key: &ConversationKey) -> Result<Option<Vec<u8>>, StateStoreError> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn set(&self, key: &ConversationKey, blob: Vec<u8>) -> Result<(), StateStoreError> {
        self.blobs.write().await.insert(key.clone(), blob);
        Ok(())
    }

    async fn delete(&self, key: &ConversationKey) -> Result<(), StateStoreError> {
        self.blobs.write().await.remove(key);
        Ok(())
    }
}
