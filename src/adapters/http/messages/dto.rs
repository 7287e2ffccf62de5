//! Request/response types for the messaging endpoint.
//!
//! Inbound activities follow the Bot Framework activity shape, trimmed to
//! the fields a turn needs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::TurnActivity;
use crate::domain::dialog::{DialogTurnStatus, Reply};
use crate::domain::foundation::{ConversationKey, ReplyId, ValidationError};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Activity type that carries user text or a postback.
pub const MESSAGE_ACTIVITY: &str = "message";

/// One inbound activity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequest {
    #[serde(rename = "type", default = "default_activity_type")]
    pub activity_type: String,
    pub channel_id: String,
    pub conversation: ConversationAccount,
    #[serde(default)]
    pub text: Option<String>,
    /// Card postback data
    #[serde(default)]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationAccount {
    pub id: String,
}

fn default_activity_type() -> String {
    MESSAGE_ACTIVITY.to_string()
}

impl ActivityRequest {
    pub fn conversation_key(&self) -> Result<ConversationKey, ValidationError> {
        ConversationKey::new(&self.channel_id, &self.conversation.id)
    }

    pub fn into_activity(self) -> TurnActivity {
        if self.activity_type.eq_ignore_ascii_case(MESSAGE_ACTIVITY) {
            TurnActivity::Message {
                text: self.text,
                value: self.value,
            }
        } else {
            TurnActivity::Event {
                activity_type: self.activity_type,
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Everything the bot said this turn.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub conversation_id: String,
    pub status: DialogTurnStatus,
    pub replies: Vec<ReplyResponse>,
}

/// One outbound message, `{"id", "type", "text", "choices"?}`.
#[derive(Debug, Clone, Serialize)]
pub struct ReplyResponse {
    pub id: ReplyId,
    #[serde(flatten)]
    pub reply: Reply,
}

impl From<Reply> for ReplyResponse {
    fn from(reply: Reply) -> Self {
        Self {
            id: ReplyId::new(),
            reply,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Error body for every failed request.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
