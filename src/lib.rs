//! Statestack: a hierarchical state machine driven by a stack of active states
//!
//! Behavior is expressed as nested modes. The innermost active state gets
//! the first chance to handle each trigger; unhandled triggers bubble out to
//! its ancestors, and once an ancestor handles one, the inner states that
//! did not understand it are retired.
//!
//! # Core Concepts
//!
//! - **State**: A comparable label with transient per-invocation arguments
//! - **Bindings**: Actions keyed by `(state, trigger)` or `(state, lifecycle verb)`
//! - **Active stack**: Root-to-innermost sequence of nested active states
//! - **Log**: Bounded record of the most recent realized transitions
//!
//! # Example
//!
//! ```rust
//! use statestack::builder::MachineBuilder;
//! use statestack::states;
//!
//! states! {
//!     OPENING = "opening",
//!     CLOSING = "closing",
//!     WAITING = "waiting",
//!     CLOSE = "close",
//!     INSERT = "insert",
//! }
//!
//! #[derive(Default)]
//! struct Player {
//!     got_cd: bool,
//! }
//!
//! let mut cd = MachineBuilder::<Player>::new()
//!     .initial(OPENING)
//!     .on(&OPENING, &CLOSE, |m, _| {
//!         let next = if m.context().got_cd { WAITING } else { CLOSING };
//!         m.set(next);
//!     })
//!     .on(&OPENING, &INSERT, |m, _| m.context_mut().got_cd = true)
//!     .build()
//!     .unwrap();
//!
//! assert!(cd.command(CLOSE));
//! assert!(cd.is(&CLOSING));
//! assert!(cd.get_log(0).unwrap().matches(&OPENING, &CLOSE, &CLOSING));
//! ```

pub mod builder;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder};
pub use core::{Event, Lifecycle, State, StateId, TransitionRecord};
pub use machine::Machine;
