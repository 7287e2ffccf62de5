//! RecommendTreatmentHandler - Ranks the catalog and phrases the advice.

use crate::domain::care::{Recommendation, TreatmentRanking};
use crate::domain::dialog::Reply;
use crate::domain::survey::BackPainDemographics;

use super::rank_treatments::{RankTreatmentsCommand, RankTreatmentsHandler};

pub const WORKING_ON_IT: &str =
    "Thank you. I'm working on an answer for you. It may take a few seconds.";

#[derive(Debug, Clone)]
pub struct RecommendTreatmentCommand {
    pub demographics: BackPainDemographics,
}

#[derive(Debug, Clone)]
pub struct RecommendTreatmentResult {
    pub rankings: Vec<TreatmentRanking>,
    pub recommendation: Recommendation,
    /// Acknowledgement followed by the advice.
    pub replies: Vec<Reply>,
}

pub struct RecommendTreatmentHandler {
    ranker: RankTreatmentsHandler,
}

impl RecommendTreatmentHandler {
    pub fn new(ranker: RankTreatmentsHandler) -> Self {
        Self { ranker }
    }

    pub async fn handle(&self, cmd: RecommendTreatmentCommand) -> RecommendTreatmentResult {
        let rankings = self
            .ranker
            .handle(RankTreatmentsCommand::for_catalog(cmd.demographics))
            .await;
        let recommendation = Recommendation::from_rankings(&rankings);

        tracing::info!(recommendation = ?recommendation, "Recommendation ready");

        let replies = vec![Reply::text(WORKING_ON_IT), Reply::text(recommendation.message())];
        RecommendTreatmentResult {
            rankings,
            recommendation,
            replies,
        }
    }
}
