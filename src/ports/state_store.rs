//! State Store Port - Interface for persisting conversation state.
//!
//! The store maps a conversation identity to an opaque blob. It carries no
//! business logic: the dialog runtime owns the snapshot format and the store
//! only reads, writes and deletes bytes. Last write wins.

use async_trait::async_trait;

use crate::domain::foundation::ConversationKey;

/// Errors that can occur during state store operations
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StateStoreError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Port for persisting and loading conversation state blobs
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the blob stored for a conversation
    ///
    /// # Returns
    /// `None` when nothing has been persisted for `key`
    ///
    /// # Errors
    /// Returns `StateStoreError` if the backend cannot be read
    async fn get(&self, key: &ConversationKey) -> Result<Option<Vec<u8>>, StateStoreError>;

    /// Replace the blob stored for a conversation
    ///
    /// # Errors
    /// Returns `StateStoreError` if the write fails. A failed write must never
    /// be reported as success.
    async fn set(&self, key: &ConversationKey, blob: Vec<u8>) -> Result<(), StateStoreError>;

    /// Remove the blob stored for a conversation. Deleting a missing key is not an error.
    ///
    /// # Errors
    /// Returns `StateStoreError` if the backend cannot be written
    async fn delete(&self, key: &ConversationKey) -> Result<(), StateStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_store_error_io() {
        let err = StateStoreError::Io("disk full".to_string());
        assert!(err.to_string().contains("IO error"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_state_store_error_backend() {
        let err = StateStoreError::Backend("connection refused".to_string());
        assert_eq!(err.to_string(), "Store backend error: connection refused");
    }
}
