//! Scoring Adapters
//!
//! Implementations of the TreatmentScorer port.
//!
//! - **AzureMlScorer** - Azure Machine Learning web service over HTTPS
//! - **MockTreatmentScorer** - Configurable outcomes for tests and development

mod azure_ml_scorer;
mod mock_scorer;

pub use azure_ml_scorer::{AzureMlConfig, AzureMlScorer};
pub use mock_scorer::{MockScore, MockTreatmentScorer};
