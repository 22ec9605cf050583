//! State identity and per-invocation arguments.
//!
//! A [`State`] is a label plus a transient list of string arguments. Only the
//! label takes part in equality, ordering and hashing, so states can be used
//! as map keys and compared against stack entries regardless of the
//! arguments they were entered with.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Immutable label identifying a state or a trigger.
///
/// Either a textual name or a 32-bit code. Codes whose four bytes are all
/// printable ASCII are displayed as a packed four-character code.
///
/// # Example
///
/// ```rust
/// use statestack::core::StateId;
///
/// let name = StateId::name("opening");
/// let code = StateId::fourcc(b"PLAY");
///
/// assert_eq!(name.to_string(), "opening");
/// assert_eq!(code.to_string(), "PLAY");
/// assert_eq!(StateId::code(7).to_string(), "7");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StateId {
    /// Textual label
    Name(Cow<'static, str>),
    /// Numeric label, possibly a four-character code
    Code(u32),
}

impl StateId {
    /// Build a textual id.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(Cow::Owned(name.into()))
    }

    /// Build a textual id from a static string without allocating.
    pub const fn from_static(name: &'static str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }

    /// Build a numeric id.
    pub const fn code(code: u32) -> Self {
        Self::Code(code)
    }

    /// Build a numeric id from four packed characters, first byte most significant.
    pub const fn fourcc(chars: &[u8; 4]) -> Self {
        Self::Code(u32::from_be_bytes(*chars))
    }

    /// The textual label, if this id is a name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Code(_) => None,
        }
    }

    /// The numeric label, if this id is a code.
    pub fn as_code(&self) -> Option<u32> {
        match self {
            Self::Name(_) => None,
            Self::Code(code) => Some(*code),
        }
    }

    /// True for an empty name. Codes are never blank.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Name(name) if name.is_empty())
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Code(code) => {
                let bytes = code.to_be_bytes();
                if bytes.iter().all(|b| (0x20..=0x7e).contains(b)) {
                    bytes.iter().try_for_each(|&b| write!(f, "{}", b as char))
                } else {
                    write!(f, "{code}")
                }
            }
        }
    }
}

impl From<&State> for StateId {
    fn from(state: &State) -> Self {
        state.id.clone()
    }
}

impl From<State> for StateId {
    fn from(state: State) -> Self {
        state.id
    }
}

/// A state (or trigger) label carrying the arguments of one invocation.
///
/// Arguments are attached by copy: [`State::with_args`] returns a new value
/// and leaves the original untouched.
///
/// # Example
///
/// ```rust
/// use statestack::core::State;
///
/// const PLAY: State = State::from_static("play");
///
/// let track = PLAY.with_arg(3);
/// assert_eq!(track, PLAY);
/// assert_eq!(track.args(), ["3"]);
/// assert!(PLAY.args().is_empty());
/// assert_eq!(track.to_string(), "play(3)");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct State {
    id: StateId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    args: Vec<String>,
}

impl State {
    /// Create a state with no arguments.
    pub const fn new(id: StateId) -> Self {
        Self {
            id,
            args: Vec::new(),
        }
    }

    /// Create a named state.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(StateId::name(name))
    }

    /// Create a named state from a static string. Usable in `const` items.
    pub const fn from_static(name: &'static str) -> Self {
        Self::new(StateId::from_static(name))
    }

    /// Create a state identified by a numeric code.
    pub const fn code(code: u32) -> Self {
        Self::new(StateId::code(code))
    }

    /// Create a state identified by a four-character code.
    pub const fn fourcc(chars: &[u8; 4]) -> Self {
        Self::new(StateId::fourcc(chars))
    }

    pub fn id(&self) -> &StateId {
        &self.id
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Copy of this state carrying `args`, each rendered with `ToString`.
    pub fn with_args<I, T>(&self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Self {
            id: self.id.clone(),
            args: args.into_iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Copy of this state carrying a single argument.
    pub fn with_arg(&self, arg: impl ToString) -> Self {
        self.with_args([arg])
    }

    /// Copy of this state with the arguments dropped.
    pub fn bare(&self) -> Self {
        Self::new(self.id.clone())
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialEq<StateId> for State {
    fn eq(&self, other: &StateId) -> bool {
        self.id == *other
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.id, self.args.join(","))
    }
}
