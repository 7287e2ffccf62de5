//! Per-turn input, output and the context that carries them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ConversationKey;

use super::state::{DialogStackState, DomainRecords};
use super::value::DialogValue;

/// Raw content of one inbound turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnContent {
    Text(String),
    Payload(serde_json::Value),
    Empty,
}

/// One inbound turn. At most one of text or payload is meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnInput {
    pub key: ConversationKey,
    pub content: TurnContent,
}

impl TurnInput {
    pub fn with_text(key: ConversationKey, text: impl Into<String>) -> Self {
        Self {
            key,
            content: TurnContent::Text(text.into()),
        }
    }

    pub fn with_payload(key: ConversationKey, payload: serde_json::Value) -> Self {
        Self {
            key,
            content: TurnContent::Payload(payload),
        }
    }

    pub fn empty(key: ConversationKey) -> Self {
        Self {
            key,
            content: TurnContent::Empty,
        }
    }

    /// Text of the turn. A payload that is a bare JSON string counts as text.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            TurnContent::Text(text) => Some(text),
            TurnContent::Payload(serde_json::Value::String(text)) => Some(text),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&serde_json::Value> {
        match &self.content {
            TurnContent::Payload(payload) => Some(payload),
            _ => None,
        }
    }
}

/// One outbound message rendered for the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Reply {
    Text { text: String },
    Choices { text: String, choices: Vec<String> },
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text { text: text.into() }
    }

    pub fn choices(text: impl Into<String>, choices: Vec<String>) -> Self {
        Reply::Choices {
            text: text.into(),
            choices,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Reply::Text { text } | Reply::Choices { text, .. } => text,
        }
    }

    /// Offered options; empty for plain text.
    pub fn options(&self) -> &[String] {
        match self {
            Reply::Text { .. } => &[],
            Reply::Choices { choices, .. } => choices,
        }
    }
}

/// Outcome status of driving the stack for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogTurnStatus {
    /// The stack was empty; nothing consumed the input
    NoActiveDialog,
    /// A prompt is waiting for the next turn
    Waiting,
    /// The bottom dialog finished and the stack is empty again
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnResult {
    pub status: DialogTurnStatus,
    pub result: Option<DialogValue>,
}

impl TurnResult {
    pub fn no_active_dialog() -> Self {
        Self {
            status: DialogTurnStatus::NoActiveDialog,
            result: None,
        }
    }

    pub fn waiting() -> Self {
        Self {
            status: DialogTurnStatus::Waiting,
            result: None,
        }
    }

    pub fn completed(value: DialogValue) -> Self {
        Self {
            status: DialogTurnStatus::Completed,
            result: Some(value),
        }
    }
}

/// The single handle through which one turn mutates a conversation.
///
/// Created by `DialogRuntime::create_context` and consumed by
/// `DialogRuntime::save_state`, so state is written at most once per turn and
/// a context dropped halfway through a turn persists nothing.
#[derive(Debug)]
pub struct DialogContext {
    pub(super) key: ConversationKey,
    pub(super) stack: DialogStackState,
    pub(super) records: DomainRecords,
    pub(super) replies: Vec<Reply>,
}

impl DialogContext {
    pub(super) fn new(key: ConversationKey, stack: DialogStackState, records: DomainRecords) -> Self {
        Self {
            key,
            stack,
            records,
            replies: Vec::new(),
        }
    }

    pub fn key(&self) -> &ConversationKey {
        &self.key
    }

    pub fn stack(&self) -> &DialogStackState {
        &self.stack
    }

    pub fn records(&self) -> &DomainRecords {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut DomainRecords {
        &mut self.records
    }

    /// Replies queued so far this turn.
    pub fn replies(&self) -> &[Reply] {
        &self.replies
    }

    pub fn send(&mut self, reply: Reply) {
        self.replies.push(reply);
    }

    pub fn send_text(&mut self, text: impl Into<String>) {
        self.replies.push(Reply::text(text));
    }
}
