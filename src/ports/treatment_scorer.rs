//! Treatment Scorer Port - Interface for the external outcome prediction service.
//!
//! One call scores one candidate treatment for one patient. The ranking
//! handler fans calls out in parallel and converts individual failures into
//! sentinel results, so implementations simply report what went wrong.

use async_trait::async_trait;

use crate::domain::care::OutcomeStrength;
use crate::domain::survey::BackPainDemographics;

/// Errors that can occur while scoring a single treatment
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ScoringError {
    #[error("Scoring request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Scoring service returned status {status}")]
    Status { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid scoring response: {0}")]
    InvalidResponse(String),

    #[error("Unrecognized outcome label: {0}")]
    UnknownLabel(String),
}

/// Port for predicting the outcome of one treatment
#[async_trait]
pub trait TreatmentScorer: Send + Sync {
    /// Score `treatment_code` for the given patient snapshot
    ///
    /// # Errors
    /// Returns `ScoringError` if the service is unreachable, answers with a
    /// non-success status, or answers with an unrecognized label
    async fn score(
        &self,
        demographics: &BackPainDemographics,
        treatment_code: &str,
    ) -> Result<OutcomeStrength, ScoringError>;
}
