//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `storage` - Conversation state stores (in-memory, file, Redis)
//! - `scoring` - Treatment scorers (Azure ML, mock)
//! - `http` - Axum transport for the bot

pub mod http;
pub mod scoring;
pub mod storage;

pub use http::{messages_router, MessagesAppState};
pub use scoring::{AzureMlConfig, AzureMlScorer, MockTreatmentScorer};
pub use storage::{FileStateStore, InMemoryStateStore, RedisStateStore};
