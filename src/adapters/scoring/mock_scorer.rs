//! Mock treatment scorer for tests and local development.
//!
//! # Features
//!
//! - Per-treatment outcomes with a fallback default
//! - Simulated latency for timeout testing
//! - Error injection for partial-failure testing
//! - Call tracking for verification

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::care::OutcomeStrength;
use crate::domain::survey::BackPainDemographics;
use crate::ports::{ScoringError, TreatmentScorer};

/// What the mock does for one treatment.
#[derive(Debug, Clone, PartialEq)]
pub enum MockScore {
    Outcome(OutcomeStrength),
    Error(ScoringError),
    /// Sleep, then answer. Used to trigger caller-side timeouts.
    Delayed(Duration, OutcomeStrength),
}

#[derive(Debug, Clone)]
pub struct MockTreatmentScorer {
    scores: HashMap<String, MockScore>,
    default: MockScore,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for MockTreatmentScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTreatmentScorer {
    /// Every treatment scores `Month3_Unsuccessful` unless configured.
    pub fn new() -> Self {
        Self {
            scores: HashMap::new(),
            default: MockScore::Outcome(OutcomeStrength::Month3Unsuccessful),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Plausible fixed outcomes for the demo catalog.
    pub fn demo() -> Self {
        Self::new()
            .with_outcome("97111", OutcomeStrength::Week1Success)
            .with_outcome("97110", OutcomeStrength::Month3Success)
            .with_outcome("76911", OutcomeStrength::Month3Unsuccessful)
            .with_outcome("76910", OutcomeStrength::Week1Unsuccessful)
            .with_outcome("22524", OutcomeStrength::Day1RepeatSurgery)
            .with_outcome("22554", OutcomeStrength::Month3RepeatSurgery)
            .with_outcome("63030", OutcomeStrength::LongTermPainManagement)
    }

    pub fn with_outcome(mut self, treatment_code: impl Into<String>, outcome: OutcomeStrength) -> Self {
        self.scores.insert(treatment_code.into(), MockScore::Outcome(outcome));
        self
    }

    pub fn with_error(mut self, treatment_code: impl Into<String>, error: ScoringError) -> Self {
        self.scores.insert(treatment_code.into(), MockScore::Error(error));
        self
    }

    pub fn with_delay(
        mut self,
        treatment_code: impl Into<String>,
        delay: Duration,
        outcome: OutcomeStrength,
    ) -> Self {
        self.scores
            .insert(treatment_code.into(), MockScore::Delayed(delay, outcome));
        self
    }

    pub fn with_default(mut self, default: MockScore) -> Self {
        self.default = default;
        self
    }

    /// Treatment codes scored so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or_default()
    }
}

#[async_trait]
impl TreatmentScorer for MockTreatmentScorer {
    async fn score(
        &self,
        _demographics: &BackPainDemographics,
        treatment_code: &str,
    ) -> Result<OutcomeStrength, ScoringError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(treatment_code.to_string());
        }

        let score = self
            .scores
            .get(treatment_code)
            .cloned()
            .unwrap_or_else(|| self.default.clone());

        match score {
            MockScore::Outcome(outcome) => Ok(outcome),
            MockScore::Error(error) => Err(error),
            MockScore::Delayed(delay, outcome) => {
                sleep(delay).await;
                Ok(outcome)
            }
        }
    }
}
