//! Turns ranked treatments into advice for the user.

use crate::domain::survey::treatment_name;

use super::outcome::TreatmentRanking;

const UNLIKELY: &str =
    "Unfortunately, it seems it is unlikely that any of the treatment options will be successful.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    /// Best option predicted to succeed
    Success { treatment_code: String },
    /// Nothing likely to succeed; only one candidate responded
    BestOption { treatment_code: String },
    /// Nothing likely to succeed; the two best responders
    BestOptions { first: String, second: String },
    /// No candidate responded at all
    NoResults,
}

impl Recommendation {
    /// Picks advice from rankings already sorted best first.
    pub fn from_rankings(rankings: &[TreatmentRanking]) -> Self {
        let responsive: Vec<&TreatmentRanking> = rankings.iter().filter(|r| r.responded()).collect();

        if let Some(best) = responsive.iter().find(|r| r.is_success()) {
            return Recommendation::Success {
                treatment_code: best.treatment_code.clone(),
            };
        }

        match responsive.as_slice() {
            [] => Recommendation::NoResults,
            [only] => Recommendation::BestOption {
                treatment_code: only.treatment_code.clone(),
            },
            [first, second, ..] => Recommendation::BestOptions {
                first: first.treatment_code.clone(),
                second: second.treatment_code.clone(),
            },
        }
    }

    pub fn message(&self) -> String {
        match self {
            Recommendation::Success { treatment_code } => format!(
                "Your best treatment option with a likely successful result is **{}**. \
                 I suggest you discuss it with your doctor.",
                display_name(treatment_code)
            ),
            Recommendation::BestOption { treatment_code } => format!(
                "{UNLIKELY} But your best option seems to be **{}**. \
                 I suggest you discuss this with your doctor.",
                display_name(treatment_code)
            ),
            Recommendation::BestOptions { first, second } => format!(
                "{UNLIKELY} But your best options seem to be **{}** or **{}**. \
                 I suggest you discuss these with your doctor.",
                display_name(first),
                display_name(second)
            ),
            Recommendation::NoResults => {
                "I'm sorry. I could not get any results suggesting care options.".to_string()
            }
        }
    }
}

fn display_name(code: &str) -> &str {
    treatment_name(code).unwrap_or(code)
}
