//! HTTP handlers for the messaging endpoint.
//!
//! These handlers connect Axum routes to the turn handler.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::{ProcessTurnCommand, ProcessTurnHandler, TurnError};
use crate::domain::dialog::DialogError;
use crate::domain::foundation::ValidationError;

use super::dto::{ActivityRequest, ActivityResponse, ErrorResponse, HealthResponse, ReplyResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the messaging routes.
#[derive(Clone)]
pub struct MessagesAppState {
    pub turn_handler: Arc<ProcessTurnHandler>,
}

impl MessagesAppState {
    pub fn new(turn_handler: ProcessTurnHandler) -> Self {
        Self {
            turn_handler: Arc::new(turn_handler),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/messages - Run one turn and return the bot's replies
pub async fn post_activity(
    State(state): State<MessagesAppState>,
    Json(request): Json<ActivityRequest>,
) -> Result<impl IntoResponse, MessagesApiError> {
    let key = request.conversation_key()?;
    let conversation_id = key.conversation_id().to_string();

    let result = state
        .turn_handler
        .handle(ProcessTurnCommand {
            key,
            activity: request.into_activity(),
        })
        .await?;

    Ok(Json(ActivityResponse {
        conversation_id,
        status: result.status,
        replies: result.replies.into_iter().map(ReplyResponse::from).collect(),
    }))
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts turn failures to HTTP responses.
#[derive(Debug)]
pub enum MessagesApiError {
    InvalidActivity(ValidationError),
    Turn(TurnError),
}

impl From<ValidationError> for MessagesApiError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidActivity(err)
    }
}

impl From<TurnError> for MessagesApiError {
    fn from(err: TurnError) -> Self {
        Self::Turn(err)
    }
}

impl MessagesApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            MessagesApiError::InvalidActivity(_) => (StatusCode::BAD_REQUEST, "INVALID_ACTIVITY"),
            MessagesApiError::Turn(TurnError::UnrecognizedAction(_)) => {
                (StatusCode::BAD_REQUEST, "UNRECOGNIZED_ACTION")
            }
            MessagesApiError::Turn(TurnError::InvalidPayload(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD")
            }
            MessagesApiError::Turn(TurnError::Dialog(err)) => match err {
                DialogError::Storage(_) => (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_UNAVAILABLE"),
                DialogError::CorruptSnapshot(_) | DialogError::Record { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "CORRUPT_STATE")
                }
                err if err.is_configuration_error() => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "DIALOG_CONFIGURATION")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
        }
    }

    fn message(&self) -> String {
        match self {
            MessagesApiError::InvalidActivity(err) => err.to_string(),
            MessagesApiError::Turn(err) => err.to_string(),
        }
    }
}

impl IntoResponse for MessagesApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = self.status_and_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(code, error = %message, "Turn failed");
        } else {
            tracing::warn!(code, error = %message, "Rejected activity");
        }

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}
