//! RankTreatmentsHandler - Scores every candidate treatment in parallel.
//!
//! Each candidate is one independent call to the scorer, bounded by its own
//! timeout. A call that fails or times out does not fail the turn: the
//! candidate is kept with `FAILED_RANK` so it sorts behind everything that
//! answered. The result is ordered best first, ties in catalog order.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use crate::domain::care::{sort_rankings, TreatmentRanking};
use crate::domain::survey::{treatment_codes, BackPainDemographics};
use crate::ports::{ScoringError, TreatmentScorer};

/// Default bound on a single scoring call.
pub const DEFAULT_SCORING_TIMEOUT: Duration = Duration::from_secs(10);

/// Command to rank candidate treatments for one patient.
#[derive(Debug, Clone)]
pub struct RankTreatmentsCommand {
    pub demographics: BackPainDemographics,
    /// Candidates in catalog order.
    pub treatment_codes: Vec<String>,
}

impl RankTreatmentsCommand {
    /// Ranks the full treatment catalog.
    pub fn for_catalog(demographics: BackPainDemographics) -> Self {
        Self {
            demographics,
            treatment_codes: treatment_codes(),
        }
    }
}

pub struct RankTreatmentsHandler {
    scorer: Arc<dyn TreatmentScorer>,
    timeout: Duration,
}

impl RankTreatmentsHandler {
    pub fn new(scorer: Arc<dyn TreatmentScorer>) -> Self {
        Self {
            scorer,
            timeout: DEFAULT_SCORING_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Never fails; unusable candidates come back with the failure rank.
    pub async fn handle(&self, cmd: RankTreatmentsCommand) -> Vec<TreatmentRanking> {
        let demographics = &cmd.demographics;
        let calls = cmd
            .treatment_codes
            .iter()
            .map(|code| self.score_one(demographics, code));

        let mut rankings = join_all(calls).await;
        sort_rankings(&mut rankings);

        tracing::info!(
            candidates = rankings.len(),
            responded = rankings.iter().filter(|r| r.responded()).count(),
            "Ranked treatments"
        );
        rankings
    }

    async fn score_one(&self, demographics: &BackPainDemographics, code: &str) -> TreatmentRanking {
        let outcome = match tokio::time::timeout(self.timeout, self.scorer.score(demographics, code)).await {
            Ok(result) => result,
            Err(_) => Err(ScoringError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        };

        match outcome {
            Ok(outcome) => {
                tracing::debug!(treatment = code, outcome = outcome.label(), "Scored treatment");
                TreatmentRanking::scored(code, outcome)
            }
            Err(err) => {
                tracing::warn!(treatment = code, error = %err, "Treatment scoring failed");
                TreatmentRanking::failed(code)
            }
        }
    }
}
