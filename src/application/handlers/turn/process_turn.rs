//! ProcessTurnHandler - Runs one inbound activity end to end.
//!
//! Load the conversation, let the active dialog consume the input, fall back
//! to top-level commands and postbacks when nothing is active, run the
//! recommendation when the survey completes, then save once. Nothing is
//! written if the turn fails or is dropped before the save.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::dialog::{
    DialogContext, DialogRuntime, DialogTurnStatus, DialogValue, Reply, TurnContent, TurnInput,
    TurnResult,
};
use crate::domain::foundation::ConversationKey;
use crate::domain::survey::{BackPainDemographics, BACK_PAIN_DIALOG_ID};

use super::super::care::{RecommendTreatmentCommand, RecommendTreatmentHandler};
use super::conversation_locks::ConversationLocks;
use super::errors::TurnError;
use super::postback::PostbackAction;

/// Text commands that start the survey when no dialog is active.
pub const START_COMMANDS: [&str; 2] = ["start", "back pain"];

pub const SAY_SOMETHING: &str = "This doesn't work unless you say something first.";

/// What arrived from the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnActivity {
    Message {
        text: Option<String>,
        value: Option<Value>,
    },
    /// Any non-message activity (conversation updates, typing, ...).
    Event { activity_type: String },
}

impl TurnActivity {
    pub fn text(text: impl Into<String>) -> Self {
        TurnActivity::Message {
            text: Some(text.into()),
            value: None,
        }
    }

    pub fn postback(value: Value) -> Self {
        TurnActivity::Message {
            text: None,
            value: Some(value),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessTurnCommand {
    pub key: ConversationKey,
    pub activity: TurnActivity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessTurnResult {
    pub status: DialogTurnStatus,
    /// Replies in the order they were produced.
    pub replies: Vec<Reply>,
}

pub struct ProcessTurnHandler {
    runtime: DialogRuntime,
    recommender: RecommendTreatmentHandler,
    locks: Arc<ConversationLocks>,
}

impl ProcessTurnHandler {
    pub fn new(runtime: DialogRuntime, recommender: RecommendTreatmentHandler) -> Self {
        Self {
            runtime,
            recommender,
            locks: Arc::new(ConversationLocks::new()),
        }
    }

    #[tracing::instrument(skip(self, cmd), fields(conversation = %cmd.key))]
    pub async fn handle(&self, cmd: ProcessTurnCommand) -> Result<ProcessTurnResult, TurnError> {
        let (text, value) = match cmd.activity {
            TurnActivity::Message { text, value } => (text, value),
            TurnActivity::Event { activity_type } => {
                tracing::debug!(activity_type = %activity_type, "Non-message activity");
                return Ok(ProcessTurnResult {
                    status: DialogTurnStatus::NoActiveDialog,
                    replies: vec![Reply::text(format!("{activity_type} event detected"))],
                });
            }
        };

        let _turn = self.locks.acquire(&cmd.key).await;

        let input = turn_input(cmd.key.clone(), text, value);
        let mut context = self.runtime.create_context(&cmd.key).await?;

        let mut result = self.runtime.continue_stack(&mut context, &input)?;
        if result.status == DialogTurnStatus::NoActiveDialog {
            result = self.handle_top_level(&mut context, &input).await?;
        }

        if survey_completed(&result) {
            let demographics = context.records().get::<BackPainDemographics>()?;
            self.recommend(&mut context, demographics).await;
        }

        let replies = self.runtime.save_state(context).await?;
        tracing::info!(status = ?result.status, replies = replies.len(), "Turn complete");

        Ok(ProcessTurnResult {
            status: result.status,
            replies,
        })
    }

    async fn handle_top_level(
        &self,
        context: &mut DialogContext,
        input: &TurnInput,
    ) -> Result<TurnResult, TurnError> {
        match &input.content {
            TurnContent::Text(text) => {
                let command = text.trim().to_lowercase();
                if command.is_empty() {
                    context.send_text(SAY_SOMETHING);
                } else if START_COMMANDS.contains(&command.as_str()) {
                    return self.begin_survey(context);
                } else {
                    context.send_text(format!("You said \"{text}\""));
                }
            }
            TurnContent::Payload(payload) => match PostbackAction::parse(payload)? {
                Some(PostbackAction::StartBackPainSurvey) => return self.begin_survey(context),
                Some(PostbackAction::SubmitBackPainData(demographics)) => {
                    context.records_mut().set(&demographics)?;
                    self.recommend(context, demographics).await;
                }
                Some(PostbackAction::Default) | None => {}
            },
            TurnContent::Empty => {}
        }
        Ok(TurnResult::no_active_dialog())
    }

    fn begin_survey(&self, context: &mut DialogContext) -> Result<TurnResult, TurnError> {
        Ok(self
            .runtime
            .begin_dialog(context, BACK_PAIN_DIALOG_ID, DialogValue::None)?)
    }

    async fn recommend(&self, context: &mut DialogContext, demographics: BackPainDemographics) {
        let outcome = self
            .recommender
            .handle(RecommendTreatmentCommand { demographics })
            .await;
        for reply in outcome.replies {
            context.send(reply);
        }
    }
}

/// Text wins unless it is blank and a payload came with it.
fn turn_input(key: ConversationKey, text: Option<String>, value: Option<Value>) -> TurnInput {
    match (text, value) {
        (Some(text), _) if !text.trim().is_empty() => TurnInput::with_text(key, text),
        (_, Some(value)) => TurnInput::with_payload(key, value),
        (Some(text), None) => TurnInput::with_text(key, text),
        (None, None) => TurnInput::empty(key),
    }
}

/// The survey ends with `true` only after the last question was answered.
fn survey_completed(result: &TurnResult) -> bool {
    result.status == DialogTurnStatus::Completed && result.result == Some(DialogValue::Bool(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::adapters::scoring::MockTreatmentScorer;
    use crate::adapters::storage::InMemoryStateStore;
    use crate::application::handlers::care::{RankTreatmentsHandler, WORKING_ON_IT};
    use crate::domain::dialog::DialogRegistry;
    use crate::domain::survey::register_back_pain_dialogs;
    use crate::ports::StateStore;

    struct Harness {
        store: Arc<InMemoryStateStore>,
        handler: ProcessTurnHandler,
        key: ConversationKey,
    }

    impl Harness {
        fn new() -> Self {
            let mut registry = DialogRegistry::new();
            register_back_pain_dialogs(&mut registry).unwrap();
            let store = Arc::new(InMemoryStateStore::new());
            let runtime = DialogRuntime::new(Arc::new(registry), store.clone());
            let recommender = RecommendTreatmentHandler::new(RankTreatmentsHandler::new(Arc::new(
                MockTreatmentScorer::demo(),
            )));
            Self {
                store,
                handler: ProcessTurnHandler::new(runtime, recommender),
                key: ConversationKey::new("test", "turn-1").unwrap(),
            }
        }

        async fn send(&self, activity: TurnActivity) -> Result<ProcessTurnResult, TurnError> {
            self.handler
                .handle(ProcessTurnCommand {
                    key: self.key.clone(),
                    activity,
                })
                .await
        }

        async fn say(&self, text: &str) -> ProcessTurnResult {
            self.send(TurnActivity::text(text)).await.unwrap()
        }
    }

    fn bodies(result: &ProcessTurnResult) -> Vec<&str> {
        result.replies.iter().map(|r| r.body()).collect()
    }

    #[tokio::test]
    async fn test_event_activity_leaves_state_alone() {
        let harness = Harness::new();
        let result = harness
            .send(TurnActivity::Event {
                activity_type: "conversationUpdate".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(bodies(&result), ["conversationUpdate event detected"]);
        assert!(harness.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_echo_when_idle() {
        let harness = Harness::new();
        let result = harness.say("hello there").await;
        assert_eq!(bodies(&result), ["You said \"hello there\""]);
        assert_eq!(result.status, DialogTurnStatus::NoActiveDialog);
    }

    #[tokio::test]
    async fn test_blank_text_asks_for_input() {
        let harness = Harness::new();
        let result = harness.say("   ").await;
        assert_eq!(bodies(&result), [SAY_SOMETHING]);
    }

    #[tokio::test]
    async fn test_start_command_is_case_insensitive() {
        let harness = Harness::new();
        let result = harness.say("  Back Pain ").await;

        assert_eq!(result.status, DialogTurnStatus::Waiting);
        assert_eq!(result.replies.last().unwrap().body(), "Do you wish to proceed?");
        assert_eq!(result.replies.last().unwrap().options(), ["Yes", "No"]);
    }

    #[tokio::test]
    async fn test_start_postback_begins_survey() {
        let harness = Harness::new();
        let result = harness
            .send(TurnActivity::postback(json!({"actionType": "StartBackPainSurvey"})))
            .await
            .unwrap();
        assert_eq!(result.status, DialogTurnStatus::Waiting);
    }

    #[tokio::test]
    async fn test_submit_postback_recommends_and_stores_record() {
        let harness = Harness::new();
        let result = harness
            .send(TurnActivity::postback(json!({
                "actionType": "SubmitBackPainData",
                "data": {"age": "52", "biologicalSex": "male", "race": "W"}
            })))
            .await
            .unwrap();

        assert_eq!(bodies(&result)[0], WORKING_ON_IT);
        assert!(bodies(&result)[1].contains("**Physical Therapy**"));
        assert!(harness.store.get(&harness.key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unrecognized_postback_saves_nothing() {
        let harness = Harness::new();
        let err = harness
            .send(TurnActivity::postback(json!({"actionType": "Dance"})))
            .await
            .unwrap_err();

        assert_eq!(err, TurnError::UnrecognizedAction("Dance".to_string()));
        assert!(harness.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_default_and_missing_actions_are_ignored() {
        let harness = Harness::new();
        for payload in [json!({"actionType": "Default"}), json!({"data": {}})] {
            let result = harness.send(TurnActivity::postback(payload)).await.unwrap();
            assert!(result.replies.is_empty());
        }
    }

    #[tokio::test]
    async fn test_completed_survey_runs_recommendation() {
        let harness = Harness::new();
        harness.say("start").await;
        for answer in ["yes", "45", "female", "asian", "6", "no", "no", "no", "no", "no", "no", "no"] {
            assert_eq!(harness.say(answer).await.status, DialogTurnStatus::Waiting);
        }

        let last = harness.say("no").await;
        assert_eq!(last.status, DialogTurnStatus::Completed);
        assert_eq!(
            bodies(&last),
            [
                "Here's what I have: age 45, female, Asian, pain level 6 of 10, and none of the listed history.",
                WORKING_ON_IT,
                "Your best treatment option with a likely successful result is **Physical Therapy**. \
                 I suggest you discuss it with your doctor.",
            ]
        );

        // Back at the top level afterwards.
        assert_eq!(bodies(&harness.say("hi").await), ["You said \"hi\""]);
    }

    #[tokio::test]
    async fn test_declined_survey_does_not_recommend() {
        let harness = Harness::new();
        harness.say("start").await;
        let result = harness.say("no").await;

        assert_eq!(result.status, DialogTurnStatus::Completed);
        assert_eq!(bodies(&result), ["I understand. I hope you feel better."]);
    }

    #[test]
    fn test_blank_text_defers_to_payload() {
        let key = ConversationKey::new("test", "input").unwrap();
        let input = turn_input(key.clone(), Some(" ".to_string()), Some(json!({"a": 1})));
        assert!(matches!(input.content, TurnContent::Payload(_)));

        let input = turn_input(key, Some("hi".to_string()), Some(json!({"a": 1})));
        assert_eq!(input.content, TurnContent::Text("hi".to_string()));
    }
}
