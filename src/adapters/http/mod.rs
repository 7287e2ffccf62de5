//! HTTP adapters - REST API implementations.

pub mod messages;

pub use messages::{messages_router, MessagesAppState};
