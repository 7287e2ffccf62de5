//! Application layer - Commands and their handlers.
//!
//! Orchestrates the dialog runtime and the scoring port for one turn.

pub mod handlers;

pub use handlers::{
    ConversationLocks, PostbackAction, ProcessTurnCommand, ProcessTurnHandler, ProcessTurnResult,
    RankTreatmentsCommand, RankTreatmentsHandler, RecommendTreatmentCommand,
    RecommendTreatmentHandler, RecommendTreatmentResult, TurnActivity, TurnError,
};
