//! Structural stack operations and the lifecycle verbs they fire.

use super::stack::Token;
use super::Machine;
use crate::core::{Lifecycle, State};

impl<C> Machine<C> {
    /// Suspend the innermost state and enter `state` on top of it.
    ///
    /// Fires `(top, Push)` then `(state, Init)`. Pushing the id that is
    /// already innermost does nothing. Refused while shutting down and while
    /// the innermost state is running its `Quit` callback.
    pub fn push(&mut self, state: State) {
        if self.refuse("push", &state) {
            return;
        }
        if self.stack.top() == Some(&state) {
            return;
        }
        if let Some(frame) = self
            .stack
            .top_frame()
            .filter(|frame| self.quitting.contains(&frame.token))
        {
            let quitting = frame.state.clone();
            tracing::warn!(
                machine = %self.id,
                state = %state,
                quitting = %quitting,
                "Refusing push onto a quitting state"
            );
            self.hooks
                .warning(&format!("push of [{state}] refused while [{quitting}] is quitting"));
            return;
        }
        if let Some(top) = self.stack.top().cloned() {
            self.fire(&top, Lifecycle::Push);
        }
        tracing::debug!(machine = %self.id, state = %state, depth = self.stack.len() + 1, "Push");
        self.stack.push(state.clone());
        self.fire(&state, Lifecycle::Init);
    }

    /// Terminate the innermost state and resume its parent.
    ///
    /// Fires `(top, Quit)`, removes that state, then fires `(new top, Back)`.
    /// Returns the removed state, or `None` on an empty stack. Called from
    /// the innermost state's own `Quit` callback, it removes that state
    /// without firing `Quit` again.
    pub fn pop(&mut self) -> Option<State> {
        let (token, top) = self
            .stack
            .top_frame()
            .map(|frame| (frame.token, frame.state.clone()))?;

        // A nested pop from the quit callback already removed the frame and resumed the parent.
        let Some(removed) = self.retire(token) else {
            return Some(top);
        };
        tracing::debug!(machine = %self.id, state = %removed, depth = self.stack.len(), "Pop");
        if let Some(parent) = self.stack.top().cloned() {
            self.fire(&parent, Lifecycle::Back);
        }
        Some(removed)
    }

    /// Replace the innermost state with `state` at the same depth.
    ///
    /// Fires `(top, Quit)` then `(state, Init)`. On an empty stack this is
    /// a [`Machine::push`], as it is when the `Quit` callback itself removed
    /// or replaced the innermost state.
    pub fn set(&mut self, state: State) {
        if self.refuse("set", &state) {
            return;
        }
        let Some((token, top)) = self
            .stack
            .top_frame()
            .map(|frame| (frame.token, frame.state.clone()))
        else {
            self.push(state);
            return;
        };
        // The quit callback removed or replaced the frame; enter on top of what is left.
        if !self.quit_frame(token) || self.stack.replace(token, state.clone()).is_none() {
            self.push(state);
            return;
        }
        tracing::debug!(machine = %self.id, from = %top, to = %state, "Set");
        self.fire(&state, Lifecycle::Init);
    }

    /// Alias of [`Machine::set`].
    pub fn start(&mut self, state: State) {
        self.set(state);
    }

    /// Pop every active state, innermost first, firing `Quit` for each.
    ///
    /// `push` and `set` are refused while draining. Runs automatically on
    /// drop; the engine may be reused afterwards.
    pub fn shutdown(&mut self) {
        self.draining = true;
        while self.pop().is_some() {}
        self.draining = false;
    }

    /// Quit and remove the frame holding `token` together with every frame
    /// above it, innermost first. Returns `None` if the frame is gone by the
    /// time its own turn comes.
    pub(super) fn retire(&mut self, token: Token) -> Option<State> {
        if !self.quit_frame(token) {
            return None;
        }
        self.stack.remove(token)
    }

    /// Retire every frame above `token`, innermost first.
    pub(super) fn retire_above(&mut self, token: Token) {
        while self.stack.position(token).is_some() {
            let Some(top) = self.stack.top_frame().map(|frame| frame.token) else {
                break;
            };
            if top == token {
                break;
            }
            if let Some(state) = self.retire(top) {
                tracing::debug!(machine = %self.id, state = %state, "Retired");
            }
        }
    }

    /// Fire `Quit` for the frame holding `token` once it is innermost.
    ///
    /// A frame whose `Quit` is already running is not quit again. Returns
    /// whether the frame is still on the stack afterwards.
    fn quit_frame(&mut self, token: Token) -> bool {
        self.retire_above(token);
        let Some(state) = self.stack.lookup(token).cloned() else {
            return false;
        };
        if !self.quitting.contains(&token) {
            self.quitting.push(token);
            self.fire(&state, Lifecycle::Quit);
            self.quitting.retain(|quitting| *quitting != token);
        }
        self.stack.position(token).is_some()
    }

    pub(super) fn fire(&mut self, state: &State, verb: Lifecycle) -> bool {
        let args = state.args().to_vec();
        self.call(state, verb, &args)
    }

    fn refuse(&self, op: &str, state: &State) -> bool {
        if !self.draining {
            return false;
        }
        tracing::warn!(machine = %self.id, state = %state, "Refusing {op} while shutting down");
        self.hooks
            .warning(&format!("{op} of [{state}] refused while shutting down"));
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{Lifecycle, State};
    use crate::machine::Machine;
    use crate::states;

    states! {
        ROOT = "root",
        CHILD = "child",
        GRANDCHILD = "grandchild",
    }

    type Journal = Vec<String>;

    fn journaled() -> Machine<Journal> {
        let mut machine = Machine::with_context(ROOT, Journal::new());
        for state in [ROOT, CHILD, GRANDCHILD] {
            for verb in Lifecycle::ALL {
                let line = format!("{} {}", verb.as_str(), state.id());
                machine
                    .on(&state, verb)
                    .bind(move |m, _| m.context_mut().push(line.clone()));
            }
        }
        machine
    }

    fn take(machine: &mut Machine<Journal>) -> Journal {
        std::mem::take(machine.context_mut())
    }

    #[test]
    fn push_suspends_parent_then_enters_child() {
        let mut machine = journaled();
        machine.push(CHILD);

        assert_eq!(take(&mut machine), ["push root", "init child"]);
        assert_eq!(machine.depth(), 2);
        assert!(machine.is(&CHILD));
    }

    #[test]
    fn push_of_current_top_is_noop() {
        let mut machine = journaled();
        machine.push(CHILD);
        take(&mut machine);
        let logged = machine.log().len();

        machine.push(CHILD.with_arg("ignored"));

        assert!(take(&mut machine).is_empty());
        assert_eq!(machine.depth(), 2);
        assert_eq!(machine.log().len(), logged);
    }

    #[test]
    fn push_of_non_adjacent_duplicate_grows_stack() {
        let mut machine = journaled();
        machine.push(CHILD);
        machine.push(ROOT);
        assert_eq!(machine.depth(), 3);
    }

    #[test]
    fn pop_quits_child_then_resumes_parent() {
        let mut machine = journaled();
        machine.push(CHILD);
        take(&mut machine);

        let popped = machine.pop();

        assert_eq!(popped, Some(CHILD));
        assert_eq!(take(&mut machine), ["quit child", "back root"]);
        assert!(machine.is(&ROOT));
    }

    #[test]
    fn pop_of_last_state_fires_no_back() {
        let mut machine = journaled();
        assert_eq!(machine.pop(), Some(ROOT));
        assert_eq!(take(&mut machine), ["quit root"]);
        assert!(machine.is_empty());
        assert_eq!(machine.pop(), None);
    }

    #[test]
    fn set_replaces_at_same_depth() {
        let mut machine = journaled();
        machine.push(CHILD);
        take(&mut machine);

        machine.set(GRANDCHILD);

        assert_eq!(take(&mut machine), ["quit child", "init grandchild"]);
        assert_eq!(machine.depth(), 2);
        assert_eq!(machine.path(), [&ROOT, &GRANDCHILD]);
    }

    #[test]
    fn set_of_same_state_reenters_it() {
        let mut machine = journaled();
        machine.start(ROOT);
        assert_eq!(take(&mut machine), ["quit root", "init root"]);
        assert_eq!(machine.depth(), 1);
    }

    #[test]
    fn set_on_empty_stack_pushes() {
        let mut machine = journaled();
        machine.pop();
        take(&mut machine);

        machine.set(CHILD);

        assert_eq!(take(&mut machine), ["init child"]);
        assert_eq!(machine.depth(), 1);
    }

    #[test]
    fn init_receives_arguments_of_entered_state() {
        let mut machine = Machine::with_context(ROOT, Journal::new());
        machine
            .on(&CHILD, Lifecycle::Init)
            .bind(|m, args| m.context_mut().extend(args.iter().cloned()));

        machine.push(CHILD.with_args(["level", "3"]));

        assert_eq!(machine.context(), &["level", "3"]);
        assert_eq!(machine.top().unwrap().args(), ["level", "3"]);
    }

    #[test]
    fn shutdown_quits_every_state_innermost_first() {
        let mut machine = journaled();
        machine.push(CHILD);
        machine.push(GRANDCHILD);
        take(&mut machine);

        machine.shutdown();

        assert_eq!(
            take(&mut machine),
            [
                "quit grandchild",
                "back child",
                "quit child",
                "back root",
                "quit root"
            ]
        );
        assert!(machine.is_empty());
    }

    #[test]
    fn quit_callback_cannot_grow_stack_during_shutdown() {
        let mut machine = Machine::with_context(ROOT, Journal::new());
        machine
            .on(&ROOT, Lifecycle::Quit)
            .bind(|m, _| m.push(CHILD));

        machine.shutdown();

        assert!(machine.is_empty());
    }

    #[test]
    fn quit_runs_while_state_is_still_active() {
        let mut machine = Machine::with_context(ROOT, Journal::new());
        machine.push(CHILD);
        machine
            .on(&CHILD, Lifecycle::Quit)
            .bind(|m, _| {
                let depth = m.depth();
                m.context_mut().push(format!("depth {}", depth));
            });
        machine.on(&ROOT, Lifecycle::Back).bind(|m, _| {
            m.context_mut().push("back root".to_string());
        });

        assert_eq!(machine.pop(), Some(CHILD));
        assert_eq!(machine.context(), &["depth 2", "back root"]);
    }

    #[test]
    fn quit_callback_popping_its_own_state() {
        let mut machine = journaled();
        machine.push(CHILD);
        machine.on(&CHILD, Lifecycle::Quit).bind(|m, _| {
            m.context_mut().push("quit child".to_string());
            m.pop();
        });
        take(&mut machine);

        assert_eq!(machine.pop(), Some(CHILD));

        assert_eq!(take(&mut machine), ["quit child", "back root"]);
        assert_eq!(machine.path(), [&ROOT]);
    }

    #[test]
    fn quit_callback_replacing_its_own_state() {
        let mut machine = journaled();
        machine.push(CHILD);
        machine.on(&CHILD, Lifecycle::Quit).bind(|m, _| {
            m.context_mut().push("quit child".to_string());
            m.set(GRANDCHILD);
        });
        take(&mut machine);

        assert_eq!(machine.pop(), Some(CHILD));

        assert_eq!(take(&mut machine), ["quit child", "init grandchild"]);
        assert_eq!(machine.path(), [&ROOT, &GRANDCHILD]);
    }

    #[test]
    fn set_enters_on_top_when_quit_callback_replaced_the_state() {
        let mut machine = journaled();
        machine.push(CHILD);
        machine.on(&CHILD, Lifecycle::Quit).bind(|m, _| {
            m.context_mut().push("quit child".to_string());
            m.set(GRANDCHILD);
        });
        take(&mut machine);

        machine.set(ROOT);

        assert_eq!(
            take(&mut machine),
            ["quit child", "init grandchild", "push grandchild", "init root"]
        );
        assert_eq!(machine.path(), [&ROOT, &GRANDCHILD, &ROOT]);
    }

    #[test]
    fn shutdown_survives_quit_callbacks_that_pop() {
        let mut machine = journaled();
        machine.push(CHILD);
        machine.push(GRANDCHILD);
        for state in [ROOT, CHILD, GRANDCHILD] {
            let line = format!("quit {}", state.id());
            machine.on(&state, Lifecycle::Quit).bind(move |m, _| {
                m.context_mut().push(line.clone());
                m.pop();
            });
        }
        take(&mut machine);

        machine.shutdown();

        assert_eq!(
            take(&mut machine),
            [
                "quit grandchild",
                "back child",
                "quit child",
                "back root",
                "quit root"
            ]
        );
        assert!(machine.is_empty());
    }

    #[test]
    fn push_onto_quitting_state_is_refused() {
        let mut machine = Machine::with_context(ROOT, Journal::new());
        machine.push(CHILD);
        machine
            .on(&CHILD, Lifecycle::Quit)
            .bind(|m, _| m.push(GRANDCHILD));
        let warnings = std::sync::Arc::new(std::sync::Mutex::new(Vec::<String>::new()));
        let sink = std::sync::Arc::clone(&warnings);
        machine.on_warning(move |line| sink.lock().unwrap().push(line.to_string()));

        assert_eq!(machine.pop(), Some(CHILD));

        assert_eq!(machine.path(), [&ROOT]);
        assert_eq!(
            *warnings.lock().unwrap(),
            ["push of [grandchild()] refused while [child()] is quitting"]
        );
    }
}
