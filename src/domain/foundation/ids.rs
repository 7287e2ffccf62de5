//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Identity of one conversation on one channel.
///
/// Locates the persisted dialog stack and domain records. Stable for the
/// lifetime of the conversation and never reused across conversations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationKey {
    channel_id: String,
    conversation_id: String,
}

impl ConversationKey {
    /// Creates a key from a channel id and a conversation id.
    ///
    /// Both parts are trimmed and must be non-empty. The channel id may not
    /// contain `/`, which separates the two parts in the storage key.
    pub fn new(
        channel_id: impl Into<String>,
        conversation_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let channel_id = channel_id.into().trim().to_string();
        let conversation_id = conversation_id.into().trim().to_string();

        if channel_id.is_empty() {
            return Err(ValidationError::empty_field("channel_id"));
        }
        if conversation_id.is_empty() {
            return Err(ValidationError::empty_field("conversation_id"));
        }
        if channel_id.contains('/') {
            return Err(ValidationError::invalid_format(
                "channel_id",
                "must not contain '/'",
            ));
        }

        Ok(Self {
            channel_id,
            conversation_id,
        })
    }

    /// Returns the channel id.
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Returns the conversation id.
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Returns the flat key used by the state store adapters.
    pub fn storage_key(&self) -> String {
        format!("{}/{}", self.channel_id, self.conversation_id)
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.channel_id, self.conversation_id)
    }
}

impl FromStr for ConversationKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (channel, conversation) = s.split_once('/').ok_or_else(|| {
            ValidationError::invalid_format("conversation_key", "expected '<channel>/<conversation>'")
        })?;
        Self::new(channel, conversation)
    }
}

/// Unique identifier for an outbound reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplyId(Uuid);

impl ReplyId {
    /// Creates a new random ReplyId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ReplyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReplyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
