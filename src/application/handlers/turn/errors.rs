//! Errors raised while processing a turn.

use crate::domain::dialog::DialogError;

/// Why a turn could not be completed.
///
/// Bad answers to a prompt are not errors; those are retried inside the
/// dialog runtime. These are the failures the transport has to report.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum TurnError {
    #[error(transparent)]
    Dialog(#[from] DialogError),

    #[error("The postback action type {0} was not recognized")]
    UnrecognizedAction(String),

    #[error("Invalid postback payload: {0}")]
    InvalidPayload(String),
}

impl TurnError {
    pub fn invalid_payload(reason: impl Into<String>) -> Self {
        TurnError::InvalidPayload(reason.into())
    }
}
