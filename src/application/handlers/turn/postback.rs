//! Postback actions carried in a message's value payload.
//!
//! Cards post back `{"actionType": "...", "data": {...}}`. Older clients
//! send the same thing with PascalCase keys, so both spellings are read.

use serde_json::Value;

use crate::domain::survey::BackPainDemographics;

use super::errors::TurnError;

pub const START_BACK_PAIN_SURVEY: &str = "StartBackPainSurvey";
pub const SUBMIT_BACK_PAIN_DATA: &str = "SubmitBackPainData";
pub const DEFAULT_ACTION: &str = "Default";

#[derive(Debug, Clone, PartialEq)]
pub enum PostbackAction {
    StartBackPainSurvey,
    /// Demographics collected outside the survey, ready to score.
    SubmitBackPainData(BackPainDemographics),
    /// Explicit no-op.
    Default,
}

impl PostbackAction {
    /// Reads the action from a payload.
    ///
    /// `Ok(None)` when the payload carries no action type at all, which is
    /// ignored just like a `Default` action.
    ///
    /// # Errors
    /// `UnrecognizedAction` for an unknown action type, `InvalidPayload`
    /// when the action type or its data has the wrong shape.
    pub fn parse(payload: &Value) -> Result<Option<Self>, TurnError> {
        let Some(action_type) = field(payload, "actionType", "ActionType") else {
            return Ok(None);
        };
        let action_type = action_type
            .as_str()
            .ok_or_else(|| TurnError::invalid_payload("actionType must be a string"))?;

        let action = match action_type {
            START_BACK_PAIN_SURVEY => PostbackAction::StartBackPainSurvey,
            SUBMIT_BACK_PAIN_DATA => {
                let data = field(payload, "data", "Data").ok_or_else(|| {
                    TurnError::invalid_payload(format!("{SUBMIT_BACK_PAIN_DATA} requires data"))
                })?;
                let demographics: BackPainDemographics = serde_json::from_value(data.clone())
                    .map_err(|e| TurnError::invalid_payload(format!("back pain data: {e}")))?;
                PostbackAction::SubmitBackPainData(demographics)
            }
            DEFAULT_ACTION => PostbackAction::Default,
            other => return Err(TurnError::UnrecognizedAction(other.to_string())),
        };
        Ok(Some(action))
    }
}

fn field<'a>(payload: &'a Value, camel: &str, pascal: &str) -> Option<&'a Value> {
    let object = payload.as_object()?;
    object
        .get(camel)
        .or_else(|| object.get(pascal))
        .filter(|value| !value.is_null())
}
