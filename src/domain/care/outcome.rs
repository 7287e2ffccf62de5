//! Scored outcome labels and ranked treatments.

use serde::{Deserialize, Serialize};

/// Rank given to a candidate whose scoring call failed or timed out.
pub const FAILED_RANK: u32 = u32::MAX;

/// Ranks below this count as a likely successful outcome.
pub const SUCCESS_THRESHOLD: u32 = 3;

/// Predicted outcome of a treatment, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OutcomeStrength {
    #[serde(rename = "Day1_Success")]
    Day1Success,
    #[serde(rename = "Week1_Success")]
    Week1Success,
    #[serde(rename = "Month3_Success")]
    Month3Success,
    #[serde(rename = "Day1_Unsuccessful")]
    Day1Unsuccessful,
    #[serde(rename = "Week1_Unsuccessful")]
    Week1Unsuccessful,
    #[serde(rename = "Month3_Unsuccessful")]
    Month3Unsuccessful,
    #[serde(rename = "Day1_Repeat_Surgery")]
    Day1RepeatSurgery,
    #[serde(rename = "Week1_Repeat_Surgery")]
    Week1RepeatSurgery,
    #[serde(rename = "Month3_Repeat_Surgery")]
    Month3RepeatSurgery,
    #[serde(rename = "Long_Term_Pain_Mngmnt")]
    LongTermPainManagement,
}

impl OutcomeStrength {
    pub const ALL: [OutcomeStrength; 10] = [
        OutcomeStrength::Day1Success,
        OutcomeStrength::Week1Success,
        OutcomeStrength::Month3Success,
        OutcomeStrength::Day1Unsuccessful,
        OutcomeStrength::Week1Unsuccessful,
        OutcomeStrength::Month3Unsuccessful,
        OutcomeStrength::Day1RepeatSurgery,
        OutcomeStrength::Week1RepeatSurgery,
        OutcomeStrength::Month3RepeatSurgery,
        OutcomeStrength::LongTermPainManagement,
    ];

    /// Position on the ladder, 0 being best.
    pub fn rank(&self) -> u32 {
        *self as u32
    }

    /// The model's label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeStrength::Day1Success => "Day1_Success",
            OutcomeStrength::Week1Success => "Week1_Success",
            OutcomeStrength::Month3Success => "Month3_Success",
            OutcomeStrength::Day1Unsuccessful => "Day1_Unsuccessful",
            OutcomeStrength::Week1Unsuccessful => "Week1_Unsuccessful",
            OutcomeStrength::Month3Unsuccessful => "Month3_Unsuccessful",
            OutcomeStrength::Day1RepeatSurgery => "Day1_Repeat_Surgery",
            OutcomeStrength::Week1RepeatSurgery => "Week1_Repeat_Surgery",
            OutcomeStrength::Month3RepeatSurgery => "Month3_Repeat_Surgery",
            OutcomeStrength::LongTermPainManagement => "Long_Term_Pain_Mngmnt",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.label() == label.trim())
    }

    pub fn is_success(&self) -> bool {
        self.rank() < SUCCESS_THRESHOLD
    }
}

/// One candidate treatment and where it landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentRanking {
    pub treatment_code: String,
    pub rank: u32,
}

impl TreatmentRanking {
    pub fn scored(treatment_code: impl Into<String>, outcome: OutcomeStrength) -> Self {
        Self {
            treatment_code: treatment_code.into(),
            rank: outcome.rank(),
        }
    }

    pub fn failed(treatment_code: impl Into<String>) -> Self {
        Self {
            treatment_code: treatment_code.into(),
            rank: FAILED_RANK,
        }
    }

    /// False when scoring failed for this candidate.
    pub fn responded(&self) -> bool {
        self.rank != FAILED_RANK
    }

    pub fn is_success(&self) -> bool {
        self.rank < SUCCESS_THRESHOLD
    }
}

/// Orders rankings best first. Stable, so ties keep catalog order.
pub fn sort_rankings(rankings: &mut [TreatmentRanking]) {
    rankings.sort_by_key(|r| r.rank);
}
