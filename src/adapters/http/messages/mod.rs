//! Messaging HTTP adapter - the bot's channel endpoint.
//!
//! Provides endpoints for:
//! - Delivering an activity and receiving the turn's replies
//! - Health checks

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ActivityRequest, ActivityResponse, ErrorResponse, ReplyResponse};
pub use handlers::{MessagesApiError, MessagesAppState};
pub use routes::{messages_router, messages_routes};
