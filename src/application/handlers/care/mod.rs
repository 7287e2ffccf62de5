//! Care handlers - treatment scoring and the advice built from it.

mod rank_treatments;
mod recommend_treatment;

pub use rank_treatments::{
    RankTreatmentsCommand, RankTreatmentsHandler, DEFAULT_SCORING_TIMEOUT,
};
pub use recommend_treatment::{
    RecommendTreatmentCommand, RecommendTreatmentHandler, RecommendTreatmentResult, WORKING_ON_IT,
};
