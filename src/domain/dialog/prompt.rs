//! Prompt dialogs - ask one question, parse, validate, retry.
//!
//! A prompt renders its question when pushed, then waits. On the next turn
//! the raw input is recognized according to the prompt kind; unrecognized
//! input re-renders the question. Recognized input goes through the optional
//! validator, which may accept it, replace it with another value, or reject
//! it with a message. Only an accepted value resolves the prompt.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::choice::ChoiceSet;
use super::context::{Reply, TurnInput};
use super::value::DialogValue;

/// Sent before re-rendering the question when input is not understood.
pub const DEFAULT_RETRY_PROMPT: &str = "I'm sorry, I didn't understand that.";

const YES_TERMS: &[&str] = &["yes", "y", "yeah", "yep", "yup", "sure", "ok", "okay", "true"];
const NO_TERMS: &[&str] = &["no", "n", "nope", "nah", "false"];

/// Render options persisted with a waiting prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptOptions {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_prompt: Option<String>,
}

impl PromptOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            retry_prompt: None,
        }
    }

    pub fn with_retry_prompt(mut self, retry_prompt: impl Into<String>) -> Self {
        self.retry_prompt = Some(retry_prompt.into());
        self
    }

    pub fn retry_text(&self) -> &str {
        self.retry_prompt.as_deref().unwrap_or(DEFAULT_RETRY_PROMPT)
    }
}

/// The type of answer a prompt expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// Yes/no, resolving to `DialogValue::Bool`
    Confirm,
    /// Whole number, resolving to `DialogValue::Integer`
    Integer,
    /// One of an enumerated set, resolving to `DialogValue::Choice`
    Choice(ChoiceSet),
}

/// Verdict of a prompt validator on a recognized value.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptValidation {
    Accept,
    Replace(DialogValue),
    Reject(String),
}

pub type PromptValidator = Box<dyn Fn(&DialogValue) -> PromptValidation + Send + Sync>;

/// A registered single-question dialog.
pub struct PromptDialog {
    id: String,
    kind: PromptKind,
    validator: Option<PromptValidator>,
    default_options: Option<PromptOptions>,
}

impl PromptDialog {
    pub fn new(id: impl Into<String>, kind: PromptKind) -> Self {
        Self {
            id: id.into(),
            kind,
            validator: None,
            default_options: None,
        }
    }

    pub fn confirm(id: impl Into<String>) -> Self {
        Self::new(id, PromptKind::Confirm)
    }

    pub fn integer(id: impl Into<String>) -> Self {
        Self::new(id, PromptKind::Integer)
    }

    pub fn choice(id: impl Into<String>, choices: ChoiceSet) -> Self {
        Self::new(id, PromptKind::Choice(choices))
    }

    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&DialogValue) -> PromptValidation + Send + Sync + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Options used when the prompt is begun without explicit options.
    pub fn with_default_options(mut self, options: PromptOptions) -> Self {
        self.default_options = Some(options);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &PromptKind {
        &self.kind
    }

    pub fn default_options(&self) -> Option<&PromptOptions> {
        self.default_options.as_ref()
    }

    /// Renders the question.
    pub fn render(&self, options: &PromptOptions) -> Reply {
        match &self.kind {
            PromptKind::Confirm => Reply::choices(&options.prompt, vec!["Yes".into(), "No".into()]),
            PromptKind::Integer => Reply::text(&options.prompt),
            PromptKind::Choice(choices) => Reply::choices(&options.prompt, choices.labels()),
        }
    }

    /// Parses raw input into the expected type.
    pub fn recognize(&self, input: &TurnInput) -> Option<DialogValue> {
        match &self.kind {
            PromptKind::Confirm => input
                .payload()
                .and_then(|v| v.as_bool())
                .or_else(|| input.text().and_then(recognize_confirm))
                .map(DialogValue::Bool),
            PromptKind::Integer => input
                .payload()
                .and_then(|v| v.as_i64())
                .or_else(|| input.text().and_then(recognize_integer))
                .map(DialogValue::Integer),
            PromptKind::Choice(choices) => input
                .text()
                .and_then(|text| choices.recognize(text))
                .map(DialogValue::Choice),
        }
    }

    /// Runs the validator, accepting unchanged when none is configured.
    pub fn validate(&self, value: &DialogValue) -> PromptValidation {
        match &self.validator {
            Some(validator) => validator(value),
            None => PromptValidation::Accept,
        }
    }
}

impl fmt::Debug for PromptDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptDialog")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("has_validator", &self.validator.is_some())
            .field("default_options", &self.default_options)
            .finish()
    }
}

fn normalize(text: &str) -> String {
    text.trim()
        .trim_end_matches(['.', '!', ','])
        .trim()
        .to_lowercase()
}

fn recognize_confirm(text: &str) -> Option<bool> {
    let normalized = normalize(text);
    if YES_TERMS.contains(&normalized.as_str()) {
        Some(true)
    } else if NO_TERMS.contains(&normalized.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// First whitespace-separated token that reads as an integer, so that
/// "I'm 45 years old" yields 45. Surrounding punctuation is ignored, but a
/// minus sign only counts when it leads the token.
fn recognize_integer(text: &str) -> Option<i64> {
    text.split_whitespace().find_map(|token| {
        token
            .trim_start_matches(|c: char| !c.is_ascii_alphanumeric() && c != '-')
            .trim_end_matches(|c: char| !c.is_ascii_alphanumeric())
            .parse::<i64>()
            .ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialog::choice::Choice;
    use crate::domain::foundation::ConversationKey;

    fn key() -> ConversationKey {
        ConversationKey::new("test", "conv-1").unwrap()
    }

    fn text(s: &str) -> TurnInput {
        TurnInput::with_text(key(), s)
    }

    #[test]
    fn test_confirm_recognizes_yes_and_no() {
        let prompt = PromptDialog::confirm("confirm");
        assert_eq!(prompt.recognize(&text("yes")), Some(DialogValue::Bool(true)));
        assert_eq!(prompt.recognize(&text("  Yep! ")), Some(DialogValue::Bool(true)));
        assert_eq!(prompt.recognize(&text("NO")), Some(DialogValue::Bool(false)));
        assert_eq!(prompt.recognize(&text("maybe")), None);
    }

    #[test]
    fn test_confirm_accepts_boolean_payload() {
        let prompt = PromptDialog::confirm("confirm");
        let input = TurnInput::with_payload(key(), serde_json::json!(true));
        assert_eq!(prompt.recognize(&input), Some(DialogValue::Bool(true)));
    }

    #[test]
    fn test_integer_recognizes_embedded_number() {
        let prompt = PromptDialog::integer("age");
        assert_eq!(prompt.recognize(&text("45")), Some(DialogValue::Integer(45)));
        assert_eq!(prompt.recognize(&text("I'm 45 years old")), Some(DialogValue::Integer(45)));
        assert_eq!(prompt.recognize(&text("-3")), Some(DialogValue::Integer(-3)));
        assert_eq!(prompt.recognize(&text("forty")), None);
    }

    #[test]
    fn test_integer_ignores_hyphens_inside_words() {
        let prompt = PromptDialog::integer("age");
        assert_eq!(prompt.recognize(&text("covid-19")), None);
        assert_eq!(prompt.recognize(&text("age:-19")), None);
        assert_eq!(prompt.recognize(&text("after covid-19 I'm 45.")), Some(DialogValue::Integer(45)));
        assert_eq!(prompt.recognize(&text("(-3)")), Some(DialogValue::Integer(-3)));
    }

    #[test]
    fn test_choice_recognizes_string_payload() {
        let prompt = PromptDialog::choice(
            "sex",
            ChoiceSet::new(vec![Choice::new("Female").with_synonyms(["Woman"])]),
        );
        let input = TurnInput::with_payload(key(), serde_json::json!("woman"));
        let value = prompt.recognize(&input).unwrap();
        assert_eq!(value.as_choice().unwrap().value, "Female");
    }

    #[test]
    fn test_render_choice_lists_labels() {
        let prompt = PromptDialog::choice("pain", ChoiceSet::from_labels(["1", "2", "3"]));
        let reply = prompt.render(&PromptOptions::new("How bad is it?"));
        assert_eq!(reply.body(), "How bad is it?");
        assert_eq!(reply.options(), ["1", "2", "3"]);
    }

    #[test]
    fn test_render_confirm_offers_yes_no() {
        let reply = PromptDialog::confirm("c").render(&PromptOptions::new("Proceed?"));
        assert_eq!(reply.options(), ["Yes", "No"]);
    }

    #[test]
    fn test_validator_defaults_to_accept() {
        let prompt = PromptDialog::integer("age");
        assert_eq!(prompt.validate(&DialogValue::Integer(0)), PromptValidation::Accept);
    }

    #[test]
    fn test_validator_can_replace_and_reject() {
        let prompt = PromptDialog::integer("age").with_validator(|value| match value.as_integer() {
            Some(n) if n < 1 => PromptValidation::Reject("Too small".to_string()),
            Some(n) if n > 120 => PromptValidation::Replace(DialogValue::Integer(-1)),
            _ => PromptValidation::Accept,
        });
        assert_eq!(
            prompt.validate(&DialogValue::Integer(0)),
            PromptValidation::Reject("Too small".to_string())
        );
        assert_eq!(
            prompt.validate(&DialogValue::Integer(130)),
            PromptValidation::Replace(DialogValue::Integer(-1))
        );
        assert_eq!(prompt.validate(&DialogValue::Integer(45)), PromptValidation::Accept);
    }

    #[test]
    fn test_retry_text_falls_back_to_default() {
        assert_eq!(PromptOptions::new("q").retry_text(), DEFAULT_RETRY_PROMPT);
        assert_eq!(
            PromptOptions::new("q").with_retry_prompt("Numbers only").retry_text(),
            "Numbers only"
        );
    }
}
