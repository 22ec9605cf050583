//! Core value types of the engine.
//!
//! This module contains the data the dispatcher works with:
//! - State identity and per-invocation arguments
//! - Callback keys built from user triggers and lifecycle verbs
//! - The bounded transition log
//!
//! Nothing in here invokes callbacks; all behavior lives in
//! [`crate::machine`].

mod event;
mod history;
mod state;

pub use event::{CallbackKey, Event, Lifecycle};
pub use history::{TransitionLog, TransitionRecord, DEFAULT_LOG_CAPACITY};
pub use state::{State, StateId};

pub(crate) use history::wrap_index;
