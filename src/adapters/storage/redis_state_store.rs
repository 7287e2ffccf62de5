//! Redis State Store Adapter
//!
//! Stores each conversation blob under `{prefix}:{channel}/{conversation}`.
//! An optional TTL is refreshed on every write, so idle conversations expire
//! on their own.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::ConversationKey;
use crate::ports::{StateStore, StateStoreError};

pub const DEFAULT_KEY_PREFIX: &str = "back-me-up:conversation";

#[derive(Clone)]
pub struct RedisStateStore {
    conn: MultiplexedConnection,
    prefix: String,
    ttl_secs: Option<u64>,
}

impl RedisStateStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            prefix: DEFAULT_KEY_PREFIX.to_string(),
            ttl_secs: None,
        }
    }

    /// Connects to `url` and returns a store over a multiplexed connection.
    pub async fn connect(url: &str) -> Result<Self, StateStoreError> {
        let client = redis::Client::open(url).map_err(|e| StateStoreError::Backend(e.to_string()))?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| StateStoreError::Backend(e.to_string()))?;
        Ok(Self::new(conn))
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Expire conversations this many seconds after their last write.
    pub fn with_ttl_secs(mut self, ttl_secs: Option<u64>) -> Self {
        self.ttl_secs = ttl_secs.filter(|secs| *secs > 0);
        self
    }

    fn redis_key(&self, key: &ConversationKey) -> String {
        redis_key(&self.prefix, key)
    }
}

fn redis_key(prefix: &str, key: &ConversationKey) -> String {
    format!("{}:{}", prefix, key.storage_key())
}

#[async_trait]
impl StateStore for RedisStateStore {
    async fn get(&self, key: &ConversationKey) -> Result<Option<Vec<u8>>, StateStoreError> {
        let mut conn = self.conn.clone();
        conn.get(self.redis_key(key))
            .await
            .map_err(|e: redis::RedisError| StateStoreError::Backend(e.to_string()))
    }

    async fn set(&self, key: &ConversationKey, blob: Vec<u8>) -> Result<(), StateStoreError> {
        let redis_key = self.redis_key(key);
        let mut conn = self.conn.clone();

        let result: redis::RedisResult<()> = match self.ttl_secs {
            Some(ttl) => conn.set_ex(&redis_key, blob, ttl).await,
            None => conn.set(&redis_key, blob).await,
        };
        result.map_err(|e| StateStoreError::Backend(e.to_string()))
    }

    async fn delete(&self, key: &ConversationKey) -> Result<(), StateStoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.redis_key(key))
            .await
            .map_err(|e: redis::RedisError| StateStoreError::Backend(e.to_string()))
    }
}

impl std::fmt::Debug for RedisStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStateStore")
            .field("prefix", &self.prefix)
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Round-trip tests need a running Redis instance and live in the
    // ignored integration suite; only key layout is checked here.

    #[test]
    fn test_redis_key_layout() {
        let key = ConversationKey::new("msteams", "19:abc").unwrap();
        assert_eq!(
            redis_key(DEFAULT_KEY_PREFIX, &key),
            "back-me-up:conversation:msteams/19:abc"
        );
    }

    #[tokio::test]
    #[ignore] // Run with: cargo test -- --ignored (requires Redis on localhost)
    async fn test_redis_store_round_trip() {
        let store = RedisStateStore::connect("redis://127.0.0.1/")
            .await
            .unwrap()
            .with_prefix("back-me-up:test")
            .with_ttl_secs(Some(60));
        let key = ConversationKey::new("test", "redis-round-trip").unwrap();

        store.set(&key, b"blob".to_vec()).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), Some(b"blob".to_vec()));
        store.delete(&key).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), None);
    }
}
