//! Waterfall dialogs - a fixed sequence of steps.
//!
//! Each step receives the previous step's result and returns a `StepOutcome`
//! telling the runtime whether to run the next step now, suspend on a prompt,
//! start a child dialog, or end. The step index persisted in the instance is
//! the only resumption cursor.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::foundation::ConversationKey;

use super::context::Reply;
use super::errors::DialogError;
use super::prompt::PromptOptions;
use super::state::{DomainRecord, DomainRecords};
use super::value::DialogValue;

/// What a step asks the runtime to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Run the following step within this turn
    Next(DialogValue),
    /// Push a prompt and wait; the cursor advances once it resolves
    RequestPrompt {
        prompt_id: String,
        options: PromptOptions,
    },
    /// Push a child dialog; its end value resumes the following step
    BeginDialog { dialog_id: String, args: DialogValue },
    /// Pop this dialog, returning the value to the parent
    End(DialogValue),
}

impl StepOutcome {
    pub fn prompt(prompt_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        StepOutcome::RequestPrompt {
            prompt_id: prompt_id.into(),
            options: PromptOptions::new(prompt),
        }
    }

    pub fn begin(dialog_id: impl Into<String>, args: DialogValue) -> Self {
        StepOutcome::BeginDialog {
            dialog_id: dialog_id.into(),
            args,
        }
    }
}

/// Everything a step may touch while it runs.
pub struct StepContext<'a> {
    key: &'a ConversationKey,
    dialog_id: &'a str,
    step_index: usize,
    values: &'a mut BTreeMap<String, serde_json::Value>,
    records: &'a mut DomainRecords,
    replies: &'a mut Vec<Reply>,
}

impl<'a> StepContext<'a> {
    pub(super) fn new(
        key: &'a ConversationKey,
        dialog_id: &'a str,
        step_index: usize,
        values: &'a mut BTreeMap<String, serde_json::Value>,
        records: &'a mut DomainRecords,
        replies: &'a mut Vec<Reply>,
    ) -> Self {
        Self {
            key,
            dialog_id,
            step_index,
            values,
            records,
            replies,
        }
    }

    pub fn key(&self) -> &ConversationKey {
        self.key
    }

    pub fn dialog_id(&self) -> &str {
        self.dialog_id
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn send(&mut self, reply: Reply) {
        self.replies.push(reply);
    }

    pub fn send_text(&mut self, text: impl Into<String>) {
        self.replies.push(Reply::text(text));
    }

    pub fn record<T: DomainRecord>(&self) -> Result<T, DialogError> {
        self.records.get()
    }

    /// Mutates a domain record in place, creating it on first use.
    pub fn update_record<T, F>(&mut self, mutate: F) -> Result<T, DialogError>
    where
        T: DomainRecord + Clone,
        F: FnOnce(&mut T),
    {
        self.records.update(mutate)
    }

    /// Stores a step-local value that survives until this dialog ends.
    pub fn set_value<T: Serialize>(&mut self, name: &str, value: &T) -> Result<(), DialogError> {
        let json = serde_json::to_value(value)
            .map_err(|e| DialogError::invalid_state(self.dialog_id, e.to_string()))?;
        self.values.insert(name.to_string(), json);
        Ok(())
    }

    pub fn value<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, DialogError> {
        self.values
            .get(name)
            .map(|json| serde_json::from_value(json.clone()))
            .transpose()
            .map_err(|e| DialogError::invalid_state(self.dialog_id, e.to_string()))
    }
}

pub type WaterfallStep =
    Box<dyn Fn(&mut StepContext<'_>, DialogValue) -> Result<StepOutcome, DialogError> + Send + Sync>;

/// A registered step-sequence dialog.
pub struct WaterfallDialog {
    id: String,
    steps: Vec<WaterfallStep>,
}

impl WaterfallDialog {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            steps: Vec::new(),
        }
    }

    /// Appends a step.
    pub fn step<F>(mut self, step: F) -> Self
    where
        F: Fn(&mut StepContext<'_>, DialogValue) -> Result<StepOutcome, DialogError>
            + Send
            + Sync
            + 'static,
    {
        self.steps.push(Box::new(step));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_at(&self, index: usize) -> Option<&WaterfallStep> {
        self.steps.get(index)
    }
}

impl fmt::Debug for WaterfallDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaterfallDialog")
            .field("id", &self.id)
            .field("steps", &self.steps.len())
            .finish()
    }
}
