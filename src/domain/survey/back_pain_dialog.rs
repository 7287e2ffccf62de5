//! The back-pain survey waterfall and the prompts it uses.
//!
//! Step order: privacy notice and consent, age, biological sex, race, pain
//! level, eight yes/no health questions, summary. Each answer is written into
//! `BackPainDemographics` as soon as it is accepted, so the persisted record
//! always matches the persisted step index.

use crate::domain::dialog::{
    DialogError, DialogRegistry, DialogValue, PromptDialog, PromptValidation, StepContext,
    StepOutcome, WaterfallDialog,
};

use super::demographics::{BackPainDemographics, HealthQuestion};
use super::translations::{
    choice_set, code_for, label_for, CodedChoice, BIOLOGICAL_SEXES, PAIN_LEVELS, RACES,
};

pub const BACK_PAIN_DIALOG_ID: &str = "back-pain";

/// Ages above this are outside what the scoring model was trained on.
pub const MAX_ELIGIBLE_AGE: i64 = 120;

/// Stand-in age recorded by the age validator for ineligible answers.
pub const INELIGIBLE_AGE: i64 = -1;

pub mod prompts {
    pub const CONFIRM_START: &str = "back-pain_confirm-start";
    pub const AGE: &str = "back-pain_age";
    pub const BIOLOGICAL_SEX: &str = "back-pain_biological-sex";
    pub const RACE: &str = "back-pain_race";
    pub const PAIN_LEVEL: &str = "back-pain_pain-level";
    pub const YES_NO: &str = "back-pain_yes-no";
}

const PRIVACY_NOTICE: &str = "I'm about to ask you some questions to try to determine a course of care for your back pain. \
Some of the questions will be very personal. While we do use the information you provide to improve our ability to help future patients, \
we will never try to identify individuals or share individual data with anyone.";
const PRIVACY_ASSURANCE: &str = "We value your privacy above all other concerns.";
const DECLINED: &str = "I understand. I hope you feel better.";
const INELIGIBLE: &str =
    "I'm sorry, I'm not able to suggest care options for that age. Please talk with your doctor.";
const AGE_TOO_LOW: &str = "Please enter an age greater than zero.";

/// Registers the survey waterfall and every prompt it references.
pub fn register_back_pain_dialogs(registry: &mut DialogRegistry) -> Result<(), DialogError> {
    registry.register(PromptDialog::confirm(prompts::CONFIRM_START))?;
    registry.register(PromptDialog::integer(prompts::AGE).with_validator(validate_age))?;
    registry.register(PromptDialog::choice(
        prompts::BIOLOGICAL_SEX,
        choice_set(BIOLOGICAL_SEXES),
    ))?;
    registry.register(PromptDialog::choice(prompts::RACE, choice_set(RACES)))?;
    registry.register(PromptDialog::choice(prompts::PAIN_LEVEL, PAIN_LEVELS.clone()))?;
    registry.register(PromptDialog::confirm(prompts::YES_NO))?;
    registry.register(back_pain_waterfall())?;
    Ok(())
}

/// Zero and below are re-asked. Implausibly high ages are accepted but
/// replaced by `INELIGIBLE_AGE` for the next step to act on.
pub fn validate_age(value: &DialogValue) -> PromptValidation {
    match value.as_integer() {
        Some(age) if age < 1 => PromptValidation::Reject(AGE_TOO_LOW.to_string()),
        Some(age) if age > MAX_ELIGIBLE_AGE => {
            PromptValidation::Replace(DialogValue::Integer(INELIGIBLE_AGE))
        }
        _ => PromptValidation::Accept,
    }
}

fn back_pain_waterfall() -> WaterfallDialog {
    let mut dialog = WaterfallDialog::new(BACK_PAIN_DIALOG_ID)
        .step(confirm_start)
        .step(prompt_for_age)
        .step(record_age)
        .step(record_biological_sex)
        .step(record_race)
        .step(record_pain_level);

    for question in HealthQuestion::ALL {
        dialog = dialog.step(move |ctx, answer| record_health_answer(ctx, question, answer));
    }

    dialog
}

fn confirm_start(ctx: &mut StepContext<'_>, _args: DialogValue) -> Result<StepOutcome, DialogError> {
    ctx.update_record::<BackPainDemographics, _>(|d| *d = BackPainDemographics::default())?;
    ctx.send_text(PRIVACY_NOTICE);
    ctx.send_text(PRIVACY_ASSURANCE);
    Ok(StepOutcome::prompt(prompts::CONFIRM_START, "Do you wish to proceed?"))
}

fn prompt_for_age(ctx: &mut StepContext<'_>, proceed: DialogValue) -> Result<StepOutcome, DialogError> {
    if !expect_bool(ctx, &proceed)? {
        ctx.send_text(DECLINED);
        return Ok(StepOutcome::End(DialogValue::None));
    }

    ctx.send_text("Okay. Let's get started.");
    Ok(StepOutcome::prompt(prompts::AGE, "How old are you?"))
}

fn record_age(ctx: &mut StepContext<'_>, age: DialogValue) -> Result<StepOutcome, DialogError> {
    let age = age
        .as_integer()
        .ok_or_else(|| unexpected(ctx, "integer", &age))?;

    if age == INELIGIBLE_AGE {
        tracing::info!(conversation = %ctx.key(), "Survey ended for ineligible age");
        ctx.send_text(INELIGIBLE);
        return Ok(StepOutcome::End(DialogValue::None));
    }

    ctx.update_record::<BackPainDemographics, _>(|d| d.age = Some(age.to_string()))?;
    Ok(StepOutcome::prompt(prompts::BIOLOGICAL_SEX, "What is your biological sex?"))
}

fn record_biological_sex(ctx: &mut StepContext<'_>, choice: DialogValue) -> Result<StepOutcome, DialogError> {
    let code = coded_answer(ctx, &choice, BIOLOGICAL_SEXES)?;
    ctx.update_record::<BackPainDemographics, _>(|d| d.biological_sex = Some(code.to_string()))?;
    Ok(StepOutcome::prompt(prompts::RACE, "Which race do you most identify with?"))
}

fn record_race(ctx: &mut StepContext<'_>, choice: DialogValue) -> Result<StepOutcome, DialogError> {
    let code = coded_answer(ctx, &choice, RACES)?;
    ctx.update_record::<BackPainDemographics, _>(|d| d.race = Some(code.to_string()))?;
    Ok(StepOutcome::prompt(
        prompts::PAIN_LEVEL,
        "On a scale of 1 to 10, how bad is your pain right now?",
    ))
}

fn record_pain_level(ctx: &mut StepContext<'_>, choice: DialogValue) -> Result<StepOutcome, DialogError> {
    let level = choice
        .as_choice()
        .map(|c| c.value.clone())
        .ok_or_else(|| unexpected(ctx, "choice", &choice))?;
    ctx.update_record::<BackPainDemographics, _>(|d| d.level_of_pain = Some(level))?;
    Ok(ask(HealthQuestion::ALL[0]))
}

fn record_health_answer(
    ctx: &mut StepContext<'_>,
    question: HealthQuestion,
    answer: DialogValue,
) -> Result<StepOutcome, DialogError> {
    let yes = expect_bool(ctx, &answer)?;
    let demographics =
        ctx.update_record::<BackPainDemographics, _>(|d| d.set_answer(question, yes))?;

    match question.next() {
        Some(next) => Ok(ask(next)),
        None => {
            ctx.send_text(summary(&demographics));
            Ok(StepOutcome::End(DialogValue::Bool(true)))
        }
    }
}

fn ask(question: HealthQuestion) -> StepOutcome {
    StepOutcome::prompt(prompts::YES_NO, question.prompt())
}

/// One-line recap of the collected answers.
pub fn summary(demographics: &BackPainDemographics) -> String {
    let sex = demographics
        .biological_sex
        .as_deref()
        .and_then(|code| label_for(BIOLOGICAL_SEXES, code))
        .unwrap_or("unspecified");
    let race = demographics
        .race
        .as_deref()
        .and_then(|code| label_for(RACES, code))
        .unwrap_or("unspecified");
    let flagged: Vec<&str> = HealthQuestion::ALL
        .iter()
        .filter(|q| demographics.answer(**q) == Some("yes"))
        .map(|q| health_label(*q))
        .collect();

    let history = if flagged.is_empty() {
        "none of the listed history".to_string()
    } else {
        flagged.join(", ")
    };

    format!(
        "Here's what I have: age {}, {}, {}, pain level {} of 10, and {}.",
        demographics.age.as_deref().unwrap_or("unknown"),
        sex.to_lowercase(),
        race,
        demographics.level_of_pain.as_deref().unwrap_or("unknown"),
        history,
    )
}

fn health_label(question: HealthQuestion) -> &'static str {
    match question {
        HealthQuestion::CancerHistory => "cancer history",
        HealthQuestion::PsychiatricCare => "psychiatric care",
        HealthQuestion::PhysicalTherapy => "physical therapy",
        HealthQuestion::CognitiveBehavioralTherapy => "cognitive behavioral therapy",
        HealthQuestion::PreviousBackSurgery => "previous back surgery",
        HealthQuestion::Fever => "fever",
        HealthQuestion::FecalIncontinence => "fecal incontinence",
        HealthQuestion::OpioidUse => "opioid use",
    }
}

fn expect_bool(ctx: &StepContext<'_>, value: &DialogValue) -> Result<bool, DialogError> {
    value.as_bool().ok_or_else(|| unexpected(ctx, "bool", value))
}

fn coded_answer(
    ctx: &StepContext<'_>,
    value: &DialogValue,
    table: &[CodedChoice],
) -> Result<&'static str, DialogError> {
    value
        .as_choice()
        .and_then(|found| code_for(table, &found.value))
        .ok_or_else(|| unexpected(ctx, "coded choice", value))
}

fn unexpected(ctx: &StepContext<'_>, expected: &str, found: &DialogValue) -> DialogError {
    DialogError::invalid_state(
        ctx.dialog_id(),
        format!(
            "step {} expected {} result, got {}",
            ctx.step_index(),
            expected,
            found.kind()
        ),
    )
}
