//! Persisted dialog state.
//!
//! One `ConversationSnapshot` is stored per conversation: the stack of active
//! dialog instances plus the domain records collected so far. Both are saved
//! together so the step cursor can never drift from the collected data.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::errors::DialogError;
use super::prompt::PromptOptions;

/// Per-invocation state of a waterfall.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallState {
    /// Index of the step currently executing or waiting on a prompt
    pub step_index: usize,
    /// Step-local values persisted between turns
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, serde_json::Value>,
}

/// Per-invocation state of a prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptState {
    pub options: PromptOptions,
    pub retry_count: u32,
}

/// State private to one dialog invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InstanceState {
    Waterfall(WaterfallState),
    Prompt(PromptState),
}

/// One frame of the dialog stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogInstance {
    pub dialog_id: String,
    pub state: InstanceState,
}

impl DialogInstance {
    pub fn waterfall(dialog_id: impl Into<String>) -> Self {
        Self {
            dialog_id: dialog_id.into(),
            state: InstanceState::Waterfall(WaterfallState::default()),
        }
    }

    pub fn prompt(dialog_id: impl Into<String>, options: PromptOptions) -> Self {
        Self {
            dialog_id: dialog_id.into(),
            state: InstanceState::Prompt(PromptState {
                options,
                retry_count: 0,
            }),
        }
    }

    pub fn waterfall_state(&self) -> Option<&WaterfallState> {
        match &self.state {
            InstanceState::Waterfall(state) => Some(state),
            InstanceState::Prompt(_) => None,
        }
    }

    pub fn waterfall_state_mut(&mut self) -> Result<&mut WaterfallState, DialogError> {
        match &mut self.state {
            InstanceState::Waterfall(state) => Ok(state),
            InstanceState::Prompt(_) => Err(DialogError::invalid_state(
                &self.dialog_id,
                "expected waterfall state, found prompt state",
            )),
        }
    }

    pub fn prompt_state(&self) -> Option<&PromptState> {
        match &self.state {
            InstanceState::Prompt(state) => Some(state),
            InstanceState::Waterfall(_) => None,
        }
    }

    pub fn prompt_state_mut(&mut self) -> Result<&mut PromptState, DialogError> {
        match &mut self.state {
            InstanceState::Prompt(state) => Ok(state),
            InstanceState::Waterfall(_) => Err(DialogError::invalid_state(
                &self.dialog_id,
                "expected prompt state, found waterfall state",
            )),
        }
    }
}

/// Call stack of active dialogs for one conversation. Last element is the top.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogStackState {
    frames: Vec<DialogInstance>,
}

impl DialogStackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn top(&self) -> Option<&DialogInstance> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut DialogInstance> {
        self.frames.last_mut()
    }

    pub fn push(&mut self, instance: DialogInstance) {
        self.frames.push(instance);
    }

    pub fn pop(&mut self) -> Option<DialogInstance> {
        self.frames.pop()
    }

    /// Frames from bottom to top.
    pub fn frames(&self) -> &[DialogInstance] {
        &self.frames
    }
}

/// A typed domain record stored alongside the dialog stack.
pub trait DomainRecord: Serialize + DeserializeOwned + Default {
    /// Key under which the record is persisted.
    const NAME: &'static str;
}

/// Named domain records of one conversation, kept as JSON at the
/// serialization boundary and read back into typed records on access.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainRecords {
    records: BTreeMap<String, serde_json::Value>,
}

impl DomainRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a record, yielding its default when it was never written.
    pub fn get<T: DomainRecord>(&self) -> Result<T, DialogError> {
        match self.records.get(T::NAME) {
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| DialogError::Record {
                name: T::NAME.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(T::default()),
        }
    }

    /// Writes a record, replacing any previous value.
    pub fn set<T: DomainRecord>(&mut self, record: &T) -> Result<(), DialogError> {
        let value = serde_json::to_value(record).map_err(|e| DialogError::Record {
            name: T::NAME.to_string(),
            reason: e.to_string(),
        })?;
        self.records.insert(T::NAME.to_string(), value);
        Ok(())
    }

    /// Reads, mutates and writes back a record, creating it on first use.
    pub fn update<T, F>(&mut self, mutate: F) -> Result<T, DialogError>
    where
        T: DomainRecord + Clone,
        F: FnOnce(&mut T),
    {
        let mut record = self.get::<T>()?;
        mutate(&mut record);
        self.set(&record)?;
        Ok(record)
    }

    pub fn contains<T: DomainRecord>(&self) -> bool {
        self.records.contains_key(T::NAME)
    }
}

/// Everything persisted for one conversation in a single write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSnapshot {
    pub stack: DialogStackState,
    #[serde(default)]
    pub domain_records: DomainRecords,
    pub updated_at: DateTime<Utc>,
}

impl ConversationSnapshot {
    pub fn new(stack: DialogStackState, domain_records: DomainRecords) -> Self {
        Self {
            stack,
            domain_records,
            updated_at: Utc::now(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DialogError> {
        serde_json::to_vec(self).map_err(|e| DialogError::CorruptSnapshot(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DialogError> {
        serde_json::from_slice(bytes).map_err(|e| DialogError::CorruptSnapshot(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Tally {
        count: u32,
        label: Option<String>,
    }

    impl DomainRecord for Tally {
        const NAME: &'static str = "tally";
    }

    #[test]
    fn test_stack_push_pop_top() {
        let mut stack = DialogStackState::new();
        assert!(stack.is_empty());

        stack.push(DialogInstance::waterfall("survey"));
        stack.push(DialogInstance::prompt("survey_age", PromptOptions::new("How old are you?")));

        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top().unwrap().dialog_id, "survey_age");

        let popped = stack.pop().unwrap();
        assert_eq!(popped.dialog_id, "survey_age");
        assert_eq!(stack.top().unwrap().dialog_id, "survey");
    }

    #[test]
    fn test_instance_state_accessors_reject_wrong_kind() {
        let mut waterfall = DialogInstance::waterfall("survey");
        assert!(waterfall.waterfall_state_mut().is_ok());
        assert!(matches!(
            waterfall.prompt_state_mut(),
            Err(DialogError::InvalidInstanceState { .. })
        ));
        assert!(waterfall.prompt_state().is_none());
    }

    #[test]
    fn test_records_default_until_written() {
        let records = DomainRecords::new();
        let tally: Tally = records.get().unwrap();
        assert_eq!(tally, Tally::default());
        assert!(!records.contains::<Tally>());
    }

    #[test]
    fn test_records_update_creates_lazily() {
        let mut records = DomainRecords::new();
        records.update::<Tally, _>(|t| t.count += 1).unwrap();
        records.update::<Tally, _>(|t| t.count += 1).unwrap();

        assert!(records.contains::<Tally>());
        assert_eq!(records.get::<Tally>().unwrap().count, 2);
    }

    #[test]
    fn test_records_report_shape_mismatch() {
        let mut records = DomainRecords::new();
        records
            .records
            .insert("tally".to_string(), serde_json::json!({"count": "many"}));

        let result = records.get::<Tally>();
        assert!(matches!(result, Err(DialogError::Record { .. })));
    }

    #[test]
    fn test_snapshot_survives_bytes() {
        let mut stack = DialogStackState::new();
        let mut instance = DialogInstance::waterfall("survey");
        instance.waterfall_state_mut().unwrap().step_index = 3;
        stack.push(instance);
        let mut records = DomainRecords::new();
        records.set(&Tally { count: 4, label: Some("x".to_string()) }).unwrap();

        let snapshot = ConversationSnapshot::new(stack, records);
        let decoded = ConversationSnapshot::from_bytes(&snapshot.to_bytes().unwrap()).unwrap();

        assert_eq!(decoded, snapshot);
        assert_eq!(decoded.stack.top().unwrap().waterfall_state().unwrap().step_index, 3);
    }

    #[test]
    fn test_snapshot_rejects_garbage() {
        let result = ConversationSnapshot::from_bytes(b"not json");
        assert!(matches!(result, Err(DialogError::CorruptSnapshot(_))));
    }
}
