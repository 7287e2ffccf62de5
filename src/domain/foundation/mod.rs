//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers and error types that form the vocabulary
//! of the conversation domain.

mod errors;
mod ids;

pub use errors::ValidationError;
pub use ids::{ConversationKey, ReplyId};
