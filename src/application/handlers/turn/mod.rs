//! Turn handlers - one inbound activity through the dialog stack.

mod conversation_locks;
mod errors;
mod postback;
mod process_turn;

pub use conversation_locks::ConversationLocks;
pub use errors::TurnError;
pub use postback::{PostbackAction, DEFAULT_ACTION, START_BACK_PAIN_SURVEY, SUBMIT_BACK_PAIN_DATA};
pub use process_turn::{
    ProcessTurnCommand, ProcessTurnHandler, ProcessTurnResult, TurnActivity, SAY_SOMETHING,
    START_COMMANDS,
};
