//! Error types for the dialog runtime

use crate::ports::StateStoreError;

/// Dialog runtime errors.
///
/// Everything here is either a configuration error (caught at startup or on
/// first use) or an infrastructure failure. Unparsable or rejected prompt
/// input is never an error: prompts recover from it by re-prompting.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum DialogError {
    #[error("Dialog id already registered: {0}")]
    DuplicateDialogId(String),

    #[error("Unknown dialog id: {0}")]
    UnknownDialogId(String),

    #[error("Choice prompt {dialog_id} matches '{synonym}' for more than one choice")]
    AmbiguousChoice { dialog_id: String, synonym: String },

    #[error("Choice prompt {0} has no choices")]
    EmptyChoiceSet(String),

    #[error("Waterfall {0} has no steps")]
    EmptyWaterfall(String),

    #[error("No active dialog on the stack")]
    NoActiveDialog,

    #[error("Invalid instance state for {dialog_id}: {reason}")]
    InvalidInstanceState { dialog_id: String, reason: String },

    #[error("Domain record {name} could not be read or written: {reason}")]
    Record { name: String, reason: String },

    #[error("Persisted conversation state is corrupt: {0}")]
    CorruptSnapshot(String),

    #[error("State store error: {0}")]
    Storage(#[from] StateStoreError),
}

impl DialogError {
    /// Creates an invalid instance state error.
    pub fn invalid_state(dialog_id: impl Into<String>, reason: impl Into<String>) -> Self {
        DialogError::InvalidInstanceState {
            dialog_id: dialog_id.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for errors caused by dialog configuration rather than
    /// infrastructure.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            DialogError::DuplicateDialogId(_)
                | DialogError::UnknownDialogId(_)
                | DialogError::AmbiguousChoice { .. }
                | DialogError::EmptyChoiceSet(_)
                | DialogError::EmptyWaterfall(_)
        )
    }
}
