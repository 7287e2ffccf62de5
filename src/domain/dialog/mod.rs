//! Dialog stack engine.
//!
//! # Module Organization
//!
//! - `value` - Values threaded between steps and returned by dialogs
//! - `choice` - Enumerated choices with synonym matching
//! - `prompt` - Single-question dialogs with parse/validate/retry
//! - `waterfall` - Step-sequence dialogs and the step context
//! - `registry` - Dialog definitions by id
//! - `state` - Persisted stack, instance state and domain records
//! - `context` - Turn input, replies and the per-turn context
//! - `runtime` - Stack operations and turn load/save

mod choice;
mod context;
mod errors;
mod prompt;
mod registry;
mod runtime;
mod state;
mod value;
mod waterfall;

pub use choice::{Choice, ChoiceSet};
pub use context::{DialogContext, DialogTurnStatus, Reply, TurnContent, TurnInput, TurnResult};
pub use errors::DialogError;
pub use prompt::{
    PromptDialog, PromptKind, PromptOptions, PromptValidation, PromptValidator,
    DEFAULT_RETRY_PROMPT,
};
pub use registry::{DialogDefinition, DialogRegistry};
pub use runtime::DialogRuntime;
pub use state::{
    ConversationSnapshot, DialogInstance, DialogStackState, DomainRecord, DomainRecords,
    InstanceState, PromptState, WaterfallState,
};
pub use value::{DialogValue, FoundChoice};
pub use waterfall::{StepContext, StepOutcome, WaterfallDialog, WaterfallStep};
