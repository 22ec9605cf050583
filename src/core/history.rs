//! Bounded transition log.
//!
//! Keeps the most recent realized transitions, lifecycle transitions
//! included, in the order they were realized. Once the log is full the
//! oldest record is evicted.

use super::event::Event;
use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Default number of records retained by a [`TransitionLog`].
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Record of a single realized transition.
///
/// `previous` is the state whose callback ran, `current` the innermost
/// active state right after that callback returned. The record takes its
/// place in the log before the callback runs, so it precedes every
/// transition the callback causes.
///
/// # Example
///
/// ```rust
/// use statestack::core::{Event, State, TransitionRecord};
///
/// let record = TransitionRecord::new(
///     State::named("opening"),
///     Event::from(State::named("close")),
///     Vec::new(),
///     State::named("closing"),
/// );
///
/// assert_eq!(record.to_string(), "[opening()]->close()->[closing()]");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state whose callback handled the event
    pub previous: State,
    /// The trigger or lifecycle verb that was handled
    pub trigger: Event,
    /// Arguments the callback was invoked with
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Innermost active state after the callback returned
    pub current: State,
    /// When the record was appended, before the callback ran
    pub at: DateTime<Utc>,
}

impl TransitionRecord {
    /// Create a record stamped with the current time.
    pub fn new(previous: State, trigger: Event, args: Vec<String>, current: State) -> Self {
        Self {
            previous,
            trigger,
            args,
            current,
            at: Utc::now(),
        }
    }

    /// True when `previous`, `trigger` and `current` carry the given ids.
    pub fn matches(&self, previous: &State, trigger: impl Into<Event>, current: &State) -> bool {
        self.previous == *previous && self.trigger == trigger.into() && self.current == *current
    }
}

impl fmt::Display for TransitionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.trigger {
            Event::Trigger(id) => write!(
                f,
                "[{}]->{}({})->[{}]",
                self.previous,
                id,
                self.args.join(","),
                self.current
            ),
            Event::Lifecycle(verb) => {
                write!(f, "[{}]->{}->[{}]", self.previous, verb, self.current)
            }
        }
    }
}

/// Resolve a wraparound position against a sequence of `len` items stored
/// oldest (bottom) first.
///
/// A nonnegative `pos` counts back from the newest item, so `0` is the
/// newest. A negative `pos` indexes Python-style, so `-1` is the newest and
/// `-len` the oldest. Both wrap modulo `len`.
pub(crate) fn wrap_index(pos: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let size = len as isize;
    let index = if pos >= 0 {
        size - 1 - pos % size
    } else {
        size - 1 + (pos + 1) % size
    };
    Some(index as usize)
}

/// Fixed-capacity ring of transition records.
///
/// # Example
///
/// ```rust
/// use statestack::core::{Lifecycle, State, TransitionLog, TransitionRecord};
///
/// let mut log = TransitionLog::new(2);
/// for name in ["a", "b", "c"] {
///     let state = State::named(name);
///     log.record(TransitionRecord::new(
///         state.clone(),
///         Lifecycle::Init.into(),
///         Vec::new(),
///         state,
///     ));
/// }
///
/// assert_eq!(log.len(), 2);
/// assert_eq!(log.oldest().unwrap().previous, State::named("b"));
/// assert_eq!(log.newest().unwrap().previous, State::named("c"));
/// ```
///
/// Every appended record gets a sequence number, so a record can be
/// amended later for as long as it has not been evicted. The log is export
/// only; it serializes but is never restored.
#[derive(Clone, Debug, Serialize)]
pub struct TransitionLog {
    capacity: usize,
    entries: VecDeque<TransitionRecord>,
    #[serde(skip)]
    appended: u64,
}

impl Default for TransitionLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl TransitionLog {
    /// Create an empty log retaining at most `capacity` records.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
            appended: 0,
        }
    }

    /// Append a record, evicting the oldest ones beyond capacity.
    ///
    /// Returns the sequence number of the appended record.
    pub fn record(&mut self, record: TransitionRecord) -> u64 {
        let seq = self.appended;
        self.appended += 1;
        if self.capacity == 0 {
            return seq;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(record);
        seq
    }

    /// Record with sequence number `seq`, unless it was evicted or cleared.
    pub fn by_seq_mut(&mut self, seq: u64) -> Option<&mut TransitionRecord> {
        let first = self.appended - self.entries.len() as u64;
        let index = seq.checked_sub(first)?;
        self.entries.get_mut(usize::try_from(index).ok()?)
    }

    /// Wraparound accessor; `0` and `-1` are the newest record.
    pub fn get(&self, pos: isize) -> Option<&TransitionRecord> {
        wrap_index(pos, self.entries.len()).and_then(|i| self.entries.get(i))
    }

    pub fn newest(&self) -> Option<&TransitionRecord> {
        self.entries.back()
    }

    pub fn oldest(&self) -> Option<&TransitionRecord> {
        self.entries.front()
    }

    /// Records from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &TransitionRecord> + '_ {
        self.entries.iter()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
