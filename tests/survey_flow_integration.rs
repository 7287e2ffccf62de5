//! Integration tests for the back pain survey across process restarts.
//!
//! Every turn builds a fresh runtime and handler over the same on-disk store,
//! so nothing but the persisted snapshot carries the conversation forward.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use back_me_up::adapters::scoring::MockTreatmentScorer;
use back_me_up::adapters::storage::FileStateStore;
use back_me_up::application::{
    ProcessTurnCommand, ProcessTurnHandler, ProcessTurnResult, RankTreatmentsHandler,
    RecommendTreatmentHandler, TurnActivity,
};
use back_me_up::domain::care::OutcomeStrength;
use back_me_up::domain::dialog::{
    ConversationSnapshot, DialogRegistry, DialogRuntime, DialogTurnStatus, DEFAULT_RETRY_PROMPT,
};
use back_me_up::domain::foundation::ConversationKey;
use back_me_up::domain::survey::{register_back_pain_dialogs, BackPainDemographics};
use back_me_up::ports::StateStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn key() -> ConversationKey {
    ConversationKey::new("webchat", "survey-flow").unwrap()
}

fn handler(dir: &Path, scorer: MockTreatmentScorer) -> ProcessTurnHandler {
    let mut registry = DialogRegistry::new();
    register_back_pain_dialogs(&mut registry).unwrap();
    let runtime = DialogRuntime::new(Arc::new(registry), Arc::new(FileStateStore::new(dir)));
    let ranker = RankTreatmentsHandler::new(Arc::new(scorer)).with_timeout(Duration::from_millis(200));
    ProcessTurnHandler::new(runtime, RecommendTreatmentHandler::new(ranker))
}

/// Runs one turn in a freshly started "process".
async fn turn(dir: &Path, text: &str) -> ProcessTurnResult {
    handler(dir, MockTreatmentScorer::demo())
        .handle(ProcessTurnCommand {
            key: key(),
            activity: TurnActivity::text(text),
        })
        .await
        .unwrap()
}

fn bodies(result: &ProcessTurnResult) -> Vec<&str> {
    result.replies.iter().map(|r| r.body()).collect()
}

async fn snapshot(dir: &Path) -> ConversationSnapshot {
    let bytes = FileStateStore::new(dir).get(&key()).await.unwrap().unwrap();
    ConversationSnapshot::from_bytes(&bytes).unwrap()
}

// =============================================================================
// Survey Flow
// =============================================================================

#[tokio::test]
async fn test_full_survey_survives_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let dir = dir.path();

    let opening = turn(dir, "start").await;
    assert_eq!(opening.status, DialogTurnStatus::Waiting);
    assert_eq!(bodies(&opening).last(), Some(&"Do you wish to proceed?"));

    let age = turn(dir, "yes").await;
    assert_eq!(bodies(&age), ["Okay. Let's get started.", "How old are you?"]);

    assert_eq!(bodies(&turn(dir, "I am 38").await), ["What is your biological sex?"]);
    assert_eq!(
        turn(dir, "woman").await.replies[0].options(),
        ["African American", "Caucasian", "Asian", "Hispanic", "Other"]
    );
    turn(dir, "latina").await;
    let first_question = turn(dir, "7").await;
    assert_eq!(bodies(&first_question), ["Have you ever been diagnosed with cancer?"]);
    assert_eq!(first_question.replies[0].options(), ["Yes", "No"]);

    for answer in ["yes", "no", "yes", "no", "no", "no", "no"] {
        assert_eq!(turn(dir, answer).await.status, DialogTurnStatus::Waiting);
    }

    // Mid-survey the snapshot holds every answer given so far.
    let record: BackPainDemographics = snapshot(dir).await.domain_records.get().unwrap();
    assert_eq!(record.age.as_deref(), Some("38"));
    assert_eq!(record.biological_sex.as_deref(), Some("female"));
    assert_eq!(record.race.as_deref(), Some("H"));
    assert_eq!(record.level_of_pain.as_deref(), Some("7"));
    assert_eq!(record.cancer_history.as_deref(), Some("yes"));
    assert_eq!(record.fecal_incontinence.as_deref(), Some("no"));
    assert_eq!(record.opioid_use, None);

    let last = turn(dir, "no").await;
    assert_eq!(last.status, DialogTurnStatus::Completed);
    let last_bodies = bodies(&last);
    assert_eq!(last_bodies.len(), 3);
    assert!(last_bodies[0].starts_with("Here's what I have: age 38, female, Hispanic, pain level 7 of 10"));
    assert!(last_bodies[2].contains("**Physical Therapy**"));

    let done = snapshot(dir).await;
    assert!(done.stack.is_empty());
    let record: BackPainDemographics = done.domain_records.get().unwrap();
    assert!(record.is_complete());
}

#[tokio::test]
async fn test_bad_answers_retry_without_moving_the_cursor() {
    let dir = tempfile::tempdir().unwrap();
    let dir = dir.path();

    turn(dir, "start").await;
    turn(dir, "yes").await;
    let before = snapshot(dir).await;

    let unparsable = turn(dir, "banana").await;
    assert_eq!(unparsable.status, DialogTurnStatus::Waiting);
    assert_eq!(bodies(&unparsable), [DEFAULT_RETRY_PROMPT, "How old are you?"]);

    let rejected = turn(dir, "0").await;
    assert_eq!(
        bodies(&rejected),
        ["Please enter an age greater than zero.", "How old are you?"]
    );

    let after = snapshot(dir).await;
    assert_eq!(after.stack.depth(), before.stack.depth());
    let waterfall = after.stack.frames()[0].waterfall_state().unwrap();
    assert_eq!(
        waterfall.step_index,
        before.stack.frames()[0].waterfall_state().unwrap().step_index
    );
    assert_eq!(after.stack.top().unwrap().prompt_state().unwrap().retry_count, 2);

    // The next valid answer moves on as if nothing happened.
    assert_eq!(bodies(&turn(dir, "52").await), ["What is your biological sex?"]);
}

#[tokio::test]
async fn test_ineligible_age_ends_without_recommendation() {
    let dir = tempfile::tempdir().unwrap();
    let dir = dir.path();

    turn(dir, "back pain").await;
    turn(dir, "yes").await;
    let result = turn(dir, "130").await;

    assert_eq!(result.status, DialogTurnStatus::Completed);
    assert_eq!(
        bodies(&result),
        ["I'm sorry, I'm not able to suggest care options for that age. Please talk with your doctor."]
    );
    assert!(snapshot(dir).await.stack.is_empty());
}

#[tokio::test]
async fn test_scoring_timeouts_still_produce_advice() {
    let dir = tempfile::tempdir().unwrap();
    let dir = dir.path();
    let slow = Duration::from_secs(5);
    let scorer = MockTreatmentScorer::demo()
        .with_delay("97111", slow, OutcomeStrength::Day1Success)
        .with_delay("97110", slow, OutcomeStrength::Day1Success);

    let result = handler(dir, scorer)
        .handle(ProcessTurnCommand {
            key: key(),
            activity: TurnActivity::postback(serde_json::json!({
                "ActionType": "SubmitBackPainData",
                "Data": {"Age": "60", "Sex": "male"}
            })),
        })
        .await
        .unwrap();

    // Neither success candidate answered in time; the two best responders win.
    let advice = result.replies[1].body();
    assert!(advice.contains("best options seem to be **Epidural** or **Physiatry**"), "{advice}");
}
