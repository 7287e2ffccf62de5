//! Axum router configuration for the messaging endpoint.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{health, post_activity, MessagesAppState};

/// Create the messaging router.
///
/// # Routes
/// - `POST /api/messages` - Deliver one activity, receive the bot's replies
/// - `GET /health` - Liveness probe
pub fn messages_routes() -> Router<MessagesAppState> {
    Router::new()
        .route("/api/messages", post(post_activity))
        .route("/health", get(health))
}

/// Create the complete application router with tracing and a request timeout.
///
/// # Example
///
/// ```ignore
/// let app = messages_router(MessagesAppState::new(turn_handler), Duration::from_secs(30));
/// axum::serve(listener, app).await?;
/// ```
pub fn messages_router(state: MessagesAppState, request_timeout: Duration) -> Router {
    messages_routes()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}
