//! Azure Machine Learning treatment scorer.
//!
//! Posts one scoring row per call to a classic Azure ML web service and maps
//! the returned `Scored Labels` value onto the outcome ladder.
//!
//! # Example
//!
//! ```ignore
//! let scorer = AzureMlScorer::new(
//!     AzureMlConfig::new("https://ussouthcentral.services.azureml.net/...", api_key)
//!         .with_timeout(Duration::from_secs(10)),
//! )?;
//! let outcome = scorer.score(&demographics, "97111").await?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::domain::care::OutcomeStrength;
use crate::domain::survey::BackPainDemographics;
use crate::ports::{ScoringError, TreatmentScorer};

/// Columns the model expects but the survey does not collect.
const BLANK_COLUMNS: &[&str] = &[
    "Diagnosis",
    "Spinal_Canal_Stenosis",
    "Neural_Foraminal_Narrowing",
    "Disc",
    "Annular_Tear",
    "Ligamentum_Flavum",
    "Facet_Arthropathy",
    "Sponylolysis",
    "Spondyolithesis",
    "Anterolithesis",
    "Retrolisthesis",
    "Compression",
    "Radiculopathy",
    "Spinal_Infect_Hist",
    "Cauda_Equina",
    "Neurologic_Deficits",
    "Osteoporosis",
    "Osteopenia",
    "Prev_Exercise_Thera",
    "Prev_Pharma_Thera",
    "Prev_Surgical_Thera",
    "Unexplained_Wt_Loss",
    "IVDU",
    "Recent_Infection",
    "Urinary_Retention",
    "Saddle_Anesthesia",
    "Use_Corticosterioids",
    "Management_Plan",
    "PCP",
    "Self_Referral",
    "National_Origin",
    "Marital_Status",
    "Education",
    "Encounter_Date",
    "Acute_Chronic",
    "Overall_Health",
    "Sport",
    "Employment_Activity",
    "Outcome",
];

/// Numeric columns the model expects but the survey does not collect.
const PLACEHOLDER_COLUMNS: &[&str] = &[
    "ID",
    "Synovial_Cyst_mm",
    "Perineurial_Cyst_mm",
    "Tarlov_Cyst_mm",
    "Pain_Chronicity",
    "Height_in",
    "Weight_lbs",
    "BMI",
    "Income_Level",
    "Zip_Code",
    "Activity_Level",
    "TV_Hours_Per_Day",
];

/// Azure ML scorer configuration.
#[derive(Clone)]
pub struct AzureMlConfig {
    endpoint: String,
    api_key: Secret<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl AzureMlConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: Secret::new(api_key.into()),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl std::fmt::Debug for AzureMlConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureMlConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub struct AzureMlScorer {
    config: AzureMlConfig,
    client: Client,
}

impl AzureMlScorer {
    pub fn new(config: AzureMlConfig) -> Result<Self, ScoringError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ScoringError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn timeout_error(&self) -> ScoringError {
        ScoringError::Timeout {
            timeout_ms: self.config.timeout.as_millis() as u64,
        }
    }
}

#[derive(Debug, Serialize)]
struct ScoreRequest {
    #[serde(rename = "Inputs")]
    inputs: HashMap<&'static str, Vec<BTreeMap<&'static str, String>>>,
    #[serde(rename = "GlobalParameters")]
    global_parameters: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    #[serde(rename = "Results")]
    results: ScoreResults,
}

#[derive(Debug, Deserialize)]
struct ScoreResults {
    output1: Vec<ScoredRow>,
}

#[derive(Debug, Deserialize)]
struct ScoredRow {
    #[serde(rename = "Scored Labels")]
    scored_labels: String,
}

/// Builds the single input row for one treatment.
fn input_row(demographics: &BackPainDemographics, treatment_code: &str) -> BTreeMap<&'static str, String> {
    let mut row = BTreeMap::new();
    for column in BLANK_COLUMNS {
        row.insert(*column, String::new());
    }
    for column in PLACEHOLDER_COLUMNS {
        row.insert(*column, "1".to_string());
    }

    let answer = |value: &Option<String>| value.clone().unwrap_or_default();
    row.insert("Pain_Severity", answer(&demographics.level_of_pain));
    row.insert("Cancer_History", answer(&demographics.cancer_history));
    row.insert("Prev_PT", answer(&demographics.had_physical_therapy));
    row.insert("Prev_CBT", answer(&demographics.cognitive_behavioral_therapy));
    row.insert("Fever", answer(&demographics.fever));
    row.insert("Fecal_Incontinence", answer(&demographics.fecal_incontinence));
    row.insert("Opioid_Use", answer(&demographics.opioid_use));
    row.insert("Psychiatric_History", answer(&demographics.psychiatric_care));
    row.insert("Gender", answer(&demographics.biological_sex));
    row.insert("Age", answer(&demographics.age));
    row.insert("Race", answer(&demographics.race));
    row.insert("Prior_Surgery", answer(&demographics.previous_back_surgery));
    row.insert("Treatment", treatment_code.to_string());
    row
}

fn score_request(demographics: &BackPainDemographics, treatment_code: &str) -> ScoreRequest {
    let mut inputs = HashMap::new();
    inputs.insert("input1", vec![input_row(demographics, treatment_code)]);
    ScoreRequest {
        inputs,
        global_parameters: HashMap::new(),
    }
}

fn parse_outcome(body: &str) -> Result<OutcomeStrength, ScoringError> {
    let response: ScoreResponse = serde_json::from_str(body)
        .map_err(|e| ScoringError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    let row = response
        .results
        .output1
        .into_iter()
        .next()
        .ok_or_else(|| ScoringError::InvalidResponse("No rows in output1".to_string()))?;

    OutcomeStrength::from_label(&row.scored_labels)
        .ok_or(ScoringError::UnknownLabel(row.scored_labels))
}

#[async_trait]
impl TreatmentScorer for AzureMlScorer {
    async fn score(
        &self,
        demographics: &BackPainDemographics,
        treatment_code: &str,
    ) -> Result<OutcomeStrength, ScoringError> {
        let request = score_request(demographics, treatment_code);

        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(self.config.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.timeout_error()
                } else if e.is_connect() {
                    ScoringError::Network(format!("Connection failed: {}", e))
                } else {
                    ScoringError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                treatment = treatment_code,
                status = status.as_u16(),
                request_id = ?response.headers().get("x-ms-request-id"),
                "Scoring request failed"
            );
            return Err(ScoringError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                self.timeout_error()
            } else {
                ScoringError::Network(e.to_string())
            }
        })?;

        parse_outcome(&body)
    }
}

impl std::fmt::Debug for AzureMlScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureMlScorer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
