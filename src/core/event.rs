//! Callback keys: user triggers and lifecycle verbs.

use super::state::{State, StateId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle verbs fired automatically on structural stack changes.
///
/// These live in their own namespace, so a user state literally named
/// `"init"` never collides with [`Lifecycle::Init`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Lifecycle {
    /// The state became active (pushed or set)
    Init,
    /// The state was removed from the stack
    Quit,
    /// A child state was pushed on top of this one
    Push,
    /// The child on top of this state was popped
    Back,
}

impl Lifecycle {
    pub const ALL: [Lifecycle; 4] = [Self::Init, Self::Quit, Self::Push, Self::Back];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Quit => "quit",
            Self::Push => "push",
            Self::Back => "back",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.as_str())
    }
}

/// Second half of a callback key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Event {
    /// A user trigger, identified without its arguments
    Trigger(StateId),
    /// One of the reserved lifecycle verbs
    Lifecycle(Lifecycle),
}

impl Event {
    pub fn as_trigger(&self) -> Option<&StateId> {
        match self {
            Self::Trigger(id) => Some(id),
            Self::Lifecycle(_) => None,
        }
    }

    pub fn as_lifecycle(&self) -> Option<Lifecycle> {
        match self {
            Self::Trigger(_) => None,
            Self::Lifecycle(verb) => Some(*verb),
        }
    }
}

impl From<Lifecycle> for Event {
    fn from(verb: Lifecycle) -> Self {
        Self::Lifecycle(verb)
    }
}

impl From<StateId> for Event {
    fn from(id: StateId) -> Self {
        Self::Trigger(id)
    }
}

impl From<&State> for Event {
    fn from(state: &State) -> Self {
        Self::Trigger(state.id().clone())
    }
}

impl From<State> for Event {
    fn from(state: State) -> Self {
        Self::Trigger(state.id().clone())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trigger(id) => write!(f, "{id}"),
            Self::Lifecycle(verb) => write!(f, "{verb}"),
        }
    }
}

/// `(source, event)` pair identifying one action slot.
///
/// Arguments are never part of a key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CallbackKey {
    pub source: StateId,
    pub event: Event,
}

impl CallbackKey {
    pub fn new(source: impl Into<StateId>, event: impl Into<Event>) -> Self {
        Self {
            source: source.into(),
            event: event.into(),
        }
    }
}

impl fmt::Display for CallbackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.source, self.event)
    }
}
