//! Storage Adapters
//!
//! Implementations of the StateStore port for persisting conversation state.
//!
//! ## Available Adapters
//!
//! - **InMemoryStateStore** - Keeps blobs in memory (testing/development)
//! - **FileStateStore** - One JSON file per conversation on disk
//! - **RedisStateStore** - Redis keys with optional expiry
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileStateStore, InMemoryStateStore};
//!
//! // Single-node deployment: file-based storage
//! let store = FileStateStore::new("./data/conversations");
//!
//! // Testing: in-memory storage
//! let store = InMemoryStateStore::new();
//! ```

mod file_state_store;
mod in_memory_state_store;
mod redis_state_store;

pub use file_state_store::FileStateStore;
pub use in_memory_state_store::InMemoryStateStore;
pub use redis_state_store::{RedisStateStore, DEFAULT_KEY_PREFIX};
