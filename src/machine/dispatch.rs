//! Trigger dispatch: bubbling from the innermost state outward, then
//! retiring the inner states that did not handle the trigger.

use super::stack::Token;
use super::Machine;
use crate::core::{CallbackKey, Event, State, TransitionRecord};

impl<C> Machine<C> {
    /// Invoke the action bound to `(source, event)` with `args`.
    ///
    /// Arguments carried by `source` are ignored. On success the transition
    /// is appended to the log before the action runs, so it precedes the
    /// transitions the action causes; its `current` is filled in once the
    /// action has returned. Without a binding nothing happens and `false`
    /// is returned.
    pub fn call(&mut self, source: &State, event: impl Into<Event>, args: &[String]) -> bool {
        let key = CallbackKey::new(source, event);
        let Some(action) = self.table.action(&key) else {
            tracing::trace!(machine = %self.id, key = %key, "No binding");
            return false;
        };

        let mut record =
            TransitionRecord::new(source.clone(), key.event, args.to_vec(), source.clone());
        let seq = self.log.record(record.clone());

        action(self, args);

        record.current = self.stack.top().cloned().unwrap_or_else(|| source.clone());
        if let Some(logged) = self.log.by_seq_mut(seq) {
            logged.current = record.current.clone();
        }
        let line = record.to_string();
        tracing::debug!(machine = %self.id, transition = %line, "Transition realized");
        self.hooks.verbose(&line);
        true
    }

    /// Dispatch `trigger` to the innermost state able to handle it.
    ///
    /// States are tried from the innermost outward. Once one handles the
    /// trigger, every state tried before it that is still active gets
    /// `Quit` and is removed, innermost first. Whatever the handling action
    /// left above the handling state goes with them, so a bubbled trigger
    /// always leaves the handling state innermost. The handling state itself
    /// is not re-entered. Returns `false`, touching nothing, when no active
    /// state handles the trigger.
    pub fn command(&mut self, trigger: State) -> bool {
        if self.stack.is_empty() {
            self.unhandled(&trigger);
            return false;
        }
        self.current_trigger = None;

        let event = Event::Trigger(trigger.id().clone());
        let frames = self.stack.frames().to_vec();
        let mut cancelled: Vec<Token> = Vec::new();

        for frame in frames.iter().rev() {
            if !self.call(&frame.state, event.clone(), trigger.args()) {
                cancelled.push(frame.token);
                continue;
            }
            if !cancelled.is_empty() {
                self.retire_above(frame.token);
            }
            for token in cancelled {
                if let Some(state) = self.retire(token) {
                    tracing::debug!(machine = %self.id, state = %state, "Retired");
                }
            }
            self.current_trigger = Some(trigger);
            return true;
        }

        self.unhandled(&trigger);
        false
    }

    /// Attach `args` to `trigger`, then [`Machine::command`] it.
    pub fn command_with<I, T>(&mut self, trigger: State, args: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.command(trigger.with_args(args))
    }

    fn unhandled(&self, trigger: &State) {
        let line = match self.stack.top() {
            Some(top) => format!("unhandled trigger {trigger} raised on state [{top}]"),
            None => format!("unhandled trigger {trigger} raised on empty stack"),
        };
        tracing::debug!(machine = %self.id, trigger = %trigger, "Unhandled trigger");
        self.hooks.warning(&line);
    }
}
