//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (conversation keys, reply ids, validation errors)
//! - `dialog` - Dialog stack engine: registry, runtime, waterfalls and prompts
//! - `survey` - Back-pain survey content and its domain record
//! - `care` - Outcome ranking and treatment recommendations

pub mod care;
pub mod dialog;
pub mod foundation;
pub mod survey;
