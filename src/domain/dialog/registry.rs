//! Dialog Registry - dialog definitions by id.
//!
//! Built once at startup and shared read-only afterwards. Definitions are
//! checked as they are registered, so configuration mistakes surface before
//! the first turn rather than in the middle of a conversation.

use std::collections::HashMap;

use super::errors::DialogError;
use super::prompt::{PromptDialog, PromptKind};
use super::waterfall::WaterfallDialog;

/// A registered dialog: either a step sequence or a single prompt.
#[derive(Debug)]
pub enum DialogDefinition {
    Waterfall(WaterfallDialog),
    Prompt(PromptDialog),
}

impl DialogDefinition {
    pub fn id(&self) -> &str {
        match self {
            DialogDefinition::Waterfall(dialog) => dialog.id(),
            DialogDefinition::Prompt(prompt) => prompt.id(),
        }
    }
}

impl From<WaterfallDialog> for DialogDefinition {
    fn from(dialog: WaterfallDialog) -> Self {
        DialogDefinition::Waterfall(dialog)
    }
}

impl From<PromptDialog> for DialogDefinition {
    fn from(prompt: PromptDialog) -> Self {
        DialogDefinition::Prompt(prompt)
    }
}

#[derive(Debug, Default)]
pub struct DialogRegistry {
    dialogs: HashMap<String, DialogDefinition>,
}

impl DialogRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition under its id.
    ///
    /// Fails on a duplicate id, an empty waterfall, an empty choice set, or a
    /// choice set where one term selects more than one choice.
    pub fn register(&mut self, definition: impl Into<DialogDefinition>) -> Result<(), DialogError> {
        let definition = definition.into();
        let id = definition.id().to_string();

        if self.dialogs.contains_key(&id) {
            return Err(DialogError::DuplicateDialogId(id));
        }

        match &definition {
            DialogDefinition::Waterfall(dialog) if dialog.is_empty() => {
                return Err(DialogError::EmptyWaterfall(id));
            }
            DialogDefinition::Prompt(prompt) => {
                if let PromptKind::Choice(choices) = prompt.kind() {
                    if choices.is_empty() {
                        return Err(DialogError::EmptyChoiceSet(id));
                    }
                    if let Some(synonym) = choices.find_overlap() {
                        return Err(DialogError::AmbiguousChoice {
                            dialog_id: id,
                            synonym,
                        });
                    }
                }
            }
            DialogDefinition::Waterfall(_) => {}
        }

        self.dialogs.insert(id, definition);
        Ok(())
    }

    /// Looks up a definition. A miss is a configuration error.
    pub fn lookup(&self, id: &str) -> Result<&DialogDefinition, DialogError> {
        self.dialogs
            .get(id)
            .ok_or_else(|| DialogError::UnknownDialogId(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.dialogs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }
}
