//! Application handlers.
//!
//! - `turn` - Processing one inbound activity
//! - `care` - Scoring treatments and phrasing the recommendation

pub mod care;
pub mod turn;

pub use care::{
    RankTreatmentsCommand, RankTreatmentsHandler, RecommendTreatmentCommand,
    RecommendTreatmentHandler, RecommendTreatmentResult,
};
pub use turn::{
    ConversationLocks, PostbackAction, ProcessTurnCommand, ProcessTurnHandler, ProcessTurnResult,
    TurnActivity, TurnError,
};
