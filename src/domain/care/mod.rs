//! Care recommendations from scored treatment outcomes.

mod outcome;
mod recommendation;

pub use outcome::{
    sort_rankings, OutcomeStrength, TreatmentRanking, FAILED_RANK, SUCCESS_THRESHOLD,
};
pub use recommendation::Recommendation;
