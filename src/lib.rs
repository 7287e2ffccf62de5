//! Back Me Up - Conversational back pain triage bot
//!
//! A multi-turn survey runs on a persisted dialog stack: every turn loads the
//! conversation's stack, lets the active dialog consume the input and saves
//! the stack once. A completed survey is scored against each candidate
//! treatment in parallel and turned into a recommendation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
