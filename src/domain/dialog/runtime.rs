//! Dialog Stack Runtime - drives one conversation's stack for one turn.
//!
//! A turn is `create_context` → any number of `continue_stack` /
//! `begin_dialog` / `prompt` / `end_dialog` calls → exactly one `save_state`.
//! The stack operations are synchronous; only loading and saving touch the
//! store. Continuation between turns lives entirely in the persisted step
//! index and prompt state, so a fresh runtime over the same store resumes
//! exactly where the last one stopped.

use std::sync::Arc;

use crate::domain::foundation::ConversationKey;
use crate::ports::StateStore;

use super::context::{DialogContext, Reply, TurnInput, TurnResult};
use super::errors::DialogError;
use super::prompt::{PromptDialog, PromptOptions, PromptValidation};
use super::registry::{DialogDefinition, DialogRegistry};
use super::state::{ConversationSnapshot, DialogInstance, DialogStackState, DomainRecords};
use super::value::DialogValue;
use super::waterfall::{StepContext, StepOutcome, WaterfallDialog};

#[derive(Clone)]
pub struct DialogRuntime {
    registry: Arc<DialogRegistry>,
    store: Arc<dyn StateStore>,
}

impl DialogRuntime {
    pub fn new(registry: Arc<DialogRegistry>, store: Arc<dyn StateStore>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &DialogRegistry {
        &self.registry
    }

    /// Loads the conversation's persisted stack and records, or empty ones.
    pub async fn create_context(&self, key: &ConversationKey) -> Result<DialogContext, DialogError> {
        let snapshot = match self.store.get(key).await? {
            Some(bytes) => Some(ConversationSnapshot::from_bytes(&bytes)?),
            None => None,
        };

        let context = match snapshot {
            Some(snapshot) => DialogContext::new(key.clone(), snapshot.stack, snapshot.domain_records),
            None => DialogContext::new(key.clone(), DialogStackState::new(), DomainRecords::new()),
        };

        tracing::debug!(
            conversation = %key,
            depth = context.stack.depth(),
            "Loaded dialog stack"
        );
        Ok(context)
    }

    /// Commits the turn: stack and records go out in one write.
    ///
    /// Consumes the context and hands back the replies queued during the turn.
    pub async fn save_state(&self, context: DialogContext) -> Result<Vec<Reply>, DialogError> {
        let DialogContext {
            key,
            stack,
            records,
            replies,
        } = context;

        let depth = stack.depth();
        let bytes = ConversationSnapshot::new(stack, records).to_bytes()?;
        self.store.set(&key, bytes).await?;

        tracing::debug!(conversation = %key, depth, "Saved dialog stack");
        Ok(replies)
    }

    /// Hands the turn's input to the top dialog. An empty stack is a no-op.
    pub fn continue_stack(
        &self,
        context: &mut DialogContext,
        input: &TurnInput,
    ) -> Result<TurnResult, DialogError> {
        let Some(top) = context.stack.top() else {
            return Ok(TurnResult::no_active_dialog());
        };

        match self.registry.lookup(&top.dialog_id)? {
            DialogDefinition::Prompt(prompt) => self.continue_prompt(context, prompt, input),
            // A waterfall only sits on top between steps when a step queued
            // no prompt; treat the raw text as that step's answer.
            DialogDefinition::Waterfall(dialog) => {
                let value = input.text().map(DialogValue::from).unwrap_or_default();
                self.resume_waterfall(context, dialog, value)
            }
        }
    }

    /// Pushes a dialog and runs it until it waits or ends.
    pub fn begin_dialog(
        &self,
        context: &mut DialogContext,
        dialog_id: &str,
        args: DialogValue,
    ) -> Result<TurnResult, DialogError> {
        match self.registry.lookup(dialog_id)? {
            DialogDefinition::Waterfall(dialog) => {
                tracing::debug!(conversation = %context.key, dialog_id, "Beginning waterfall");
                context.stack.push(DialogInstance::waterfall(dialog_id));
                self.run_steps(context, dialog, args)
            }
            DialogDefinition::Prompt(prompt) => {
                let options = prompt.default_options().cloned().ok_or_else(|| {
                    DialogError::invalid_state(dialog_id, "prompt has no default options")
                })?;
                self.push_prompt(context, prompt, options)
            }
        }
    }

    /// Pushes a prompt with explicit render options and sends the question.
    pub fn prompt(
        &self,
        context: &mut DialogContext,
        prompt_id: &str,
        options: PromptOptions,
    ) -> Result<TurnResult, DialogError> {
        match self.registry.lookup(prompt_id)? {
            DialogDefinition::Prompt(prompt) => self.push_prompt(context, prompt, options),
            DialogDefinition::Waterfall(_) => Err(DialogError::invalid_state(
                prompt_id,
                "expected a prompt dialog, found a waterfall",
            )),
        }
    }

    /// Pops the top instance without resuming the one beneath it.
    pub fn end_dialog(&self, context: &mut DialogContext) -> Result<DialogInstance, DialogError> {
        let ended = context.stack.pop().ok_or(DialogError::NoActiveDialog)?;
        tracing::debug!(
            conversation = %context.key,
            dialog_id = %ended.dialog_id,
            depth = context.stack.depth(),
            "Ended dialog"
        );
        Ok(ended)
    }

    fn push_prompt(
        &self,
        context: &mut DialogContext,
        prompt: &PromptDialog,
        options: PromptOptions,
    ) -> Result<TurnResult, DialogError> {
        tracing::debug!(conversation = %context.key, prompt_id = prompt.id(), "Prompting");
        context.send(prompt.render(&options));
        context.stack.push(DialogInstance::prompt(prompt.id(), options));
        Ok(TurnResult::waiting())
    }

    fn continue_prompt(
        &self,
        context: &mut DialogContext,
        prompt: &PromptDialog,
        input: &TurnInput,
    ) -> Result<TurnResult, DialogError> {
        let Some(recognized) = prompt.recognize(input) else {
            return self.retry_prompt(context, prompt, None);
        };

        match prompt.validate(&recognized) {
            PromptValidation::Accept => self.complete_top(context, recognized),
            PromptValidation::Replace(value) => {
                tracing::debug!(
                    conversation = %context.key,
                    prompt_id = prompt.id(),
                    from = recognized.kind(),
                    to = value.kind(),
                    "Prompt value replaced by validator"
                );
                self.complete_top(context, value)
            }
            PromptValidation::Reject(message) => self.retry_prompt(context, prompt, Some(message)),
        }
    }

    /// Re-renders a waiting prompt. No cursor moves.
    fn retry_prompt(
        &self,
        context: &mut DialogContext,
        prompt: &PromptDialog,
        rejection: Option<String>,
    ) -> Result<TurnResult, DialogError> {
        let top = context.stack.top_mut().ok_or(DialogError::NoActiveDialog)?;
        let state = top.prompt_state_mut()?;
        state.retry_count += 1;
        let retry_count = state.retry_count;
        let options = state.options.clone();

        tracing::warn!(
            conversation = %context.key,
            prompt_id = prompt.id(),
            retry_count,
            rejected = rejection.is_some(),
            "Prompt input not accepted"
        );

        let message = rejection.unwrap_or_else(|| options.retry_text().to_string());
        context.send_text(message);
        context.send(prompt.render(&options));
        Ok(TurnResult::waiting())
    }

    /// Pops the finished top instance and resumes its parent, if any.
    fn complete_top(
        &self,
        context: &mut DialogContext,
        value: DialogValue,
    ) -> Result<TurnResult, DialogError> {
        self.end_dialog(context)?;

        let Some(parent_id) = context.stack.top().map(|parent| parent.dialog_id.clone()) else {
            return Ok(TurnResult::completed(value));
        };

        match self.registry.lookup(&parent_id)? {
            DialogDefinition::Waterfall(dialog) => self.resume_waterfall(context, dialog, value),
            DialogDefinition::Prompt(_) => Err(DialogError::invalid_state(
                parent_id,
                "prompt cannot be the parent of another dialog",
            )),
        }
    }

    /// Advances the top waterfall past the step that was waiting.
    fn resume_waterfall(
        &self,
        context: &mut DialogContext,
        dialog: &WaterfallDialog,
        value: DialogValue,
    ) -> Result<TurnResult, DialogError> {
        let top = context.stack.top_mut().ok_or(DialogError::NoActiveDialog)?;
        top.waterfall_state_mut()?.step_index += 1;
        self.run_steps(context, dialog, value)
    }

    /// Runs steps from the current cursor until one waits or ends.
    fn run_steps(
        &self,
        context: &mut DialogContext,
        dialog: &WaterfallDialog,
        mut value: DialogValue,
    ) -> Result<TurnResult, DialogError> {
        loop {
            let instance = context.stack.top_mut().ok_or(DialogError::NoActiveDialog)?;
            if instance.dialog_id != dialog.id() {
                return Err(DialogError::invalid_state(
                    dialog.id(),
                    format!("top of stack is {}", instance.dialog_id),
                ));
            }
            let state = instance.waterfall_state_mut()?;
            let step_index = state.step_index;

            // Running past the last step ends the dialog with the last result.
            let Some(step) = dialog.step_at(step_index) else {
                return self.complete_top(context, value);
            };

            tracing::debug!(
                conversation = %context.key,
                dialog_id = dialog.id(),
                step_index,
                "Running waterfall step"
            );

            let outcome = {
                let mut step_context = StepContext::new(
                    &context.key,
                    dialog.id(),
                    step_index,
                    &mut state.values,
                    &mut context.records,
                    &mut context.replies,
                );
                step(&mut step_context, value)?
            };

            match outcome {
                StepOutcome::Next(next) => {
                    let state = context
                        .stack
                        .top_mut()
                        .ok_or(DialogError::NoActiveDialog)?
                        .waterfall_state_mut()?;
                    state.step_index += 1;
                    value = next;
                }
                StepOutcome::RequestPrompt { prompt_id, options } => {
                    return self.prompt(context, &prompt_id, options);
                }
                StepOutcome::BeginDialog { dialog_id, args } => {
                    return self.begin_dialog(context, &dialog_id, args);
                }
                StepOutcome::End(result) => return self.complete_top(context, result),
            }
        }
    }
}

impl std::fmt::Debug for DialogRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogRuntime")
            .field("dialogs", &self.registry.len())
            .finish_non_exhaustive()
    }
}
