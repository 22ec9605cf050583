//! The hierarchical state machine engine.
//!
//! A [`Machine`] owns a stack of nested active states, a table of callbacks
//! keyed by `(state, event)` and a bounded log of realized transitions.
//! Triggers are offered to the innermost active state first and bubble
//! outward until some state handles them; inner states that did not
//! understand the trigger are then retired.
//!
//! # Example
//!
//! ```rust
//! use statestack::core::Lifecycle;
//! use statestack::machine::Machine;
//! use statestack::states;
//!
//! states! {
//!     MENU = "menu",
//!     OPTIONS = "options",
//!     BACK = "back",
//!     OPEN_OPTIONS = "open-options",
//! }
//!
//! let mut ui = Machine::with_context(MENU, Vec::<String>::new());
//! ui.on(&MENU, &OPEN_OPTIONS).bind(|m, _| m.push(OPTIONS));
//! ui.on(&MENU, &BACK).bind(|m, _| m.context_mut().push("menu handled back".into()));
//! ui.on(&OPTIONS, Lifecycle::Quit)
//!     .bind(|m, _| m.context_mut().push("options closed".into()));
//!
//! assert!(ui.command(OPEN_OPTIONS));
//! assert_eq!(ui.depth(), 2);
//!
//! // `options` has no binding for `back`, so it bubbles to `menu`
//! // and `options` is retired.
//! assert!(ui.command(BACK));
//! assert_eq!(ui.depth(), 1);
//! assert_eq!(ui.context(), &["menu handled back", "options closed"]);
//! ```

mod config;
mod diagnostics;
mod dispatch;
mod lifecycle;
mod snapshot;
mod stack;
mod table;

pub use config::MachineConfig;
pub use diagnostics::{Hook, Hooks};
pub use snapshot::Snapshot;
pub use stack::ActiveStack;
pub use table::{Action, CallbackTable, Slot};

use crate::core::{CallbackKey, Event, State, StateId, TransitionLog, TransitionRecord};
use stack::Token;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Stack-based hierarchical state machine.
///
/// `C` is an application context owned by the engine and reachable from
/// every action through [`Machine::context_mut`].
pub struct Machine<C = ()> {
    id: Uuid,
    stack: ActiveStack,
    table: CallbackTable<C>,
    log: TransitionLog,
    current_trigger: Option<State>,
    hooks: Hooks,
    config: MachineConfig,
    draining: bool,
    /// Frames whose `Quit` callback is running
    quitting: Vec<Token>,
    context: C,
}

impl Machine<()> {
    /// Create an engine with no context, entering `root`.
    pub fn new(root: State) -> Self {
        Self::with_context(root, ())
    }
}

impl<C> Machine<C> {
    /// Create an engine owning `context`, entering `root`.
    ///
    /// `(root, Init)` fires immediately, so it only reaches a callback when
    /// the engine is built through [`crate::builder::MachineBuilder`] with
    /// that binding registered up front.
    pub fn with_context(root: State, context: C) -> Self {
        Self::from_parts(
            Uuid::new_v4(),
            root,
            context,
            MachineConfig::default(),
            Hooks::default(),
            CallbackTable::new(),
        )
    }

    pub(crate) fn from_parts(
        id: Uuid,
        root: State,
        context: C,
        config: MachineConfig,
        hooks: Hooks,
        table: CallbackTable<C>,
    ) -> Self {
        let mut machine = Self {
            id,
            stack: ActiveStack::new(),
            table,
            log: TransitionLog::new(config.log_capacity),
            current_trigger: None,
            hooks,
            config,
            draining: false,
            quitting: Vec::new(),
            context,
        };
        tracing::debug!(machine = %id, root = %root, "Machine created");
        machine.push(root);
        machine
    }

    /// Binding slot for `(source, event)`, created empty if absent.
    ///
    /// Binding a slot that already holds an action replaces it.
    pub fn on(&mut self, source: impl Into<StateId>, event: impl Into<Event>) -> &mut Slot<C> {
        self.table.slot(CallbackKey::new(source, event))
    }

    /// Bind `action` to `(source, event)`.
    ///
    /// Returns `true` when a previous binding was replaced; the warning hook
    /// is told about it.
    pub fn bind<F>(&mut self, source: impl Into<StateId>, event: impl Into<Event>, action: F) -> bool
    where
        F: Fn(&mut Machine<C>, &[String]) + Send + Sync + 'static,
    {
        bind_reporting(&mut self.table, &self.hooks, CallbackKey::new(source, event), Arc::new(action))
    }

    /// Install a callback receiving warning lines (unhandled triggers,
    /// replaced bindings, refused changes during shutdown).
    pub fn on_warning<F>(&mut self, hook: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.hooks.on_warning = Some(Arc::new(hook));
    }

    /// Install a callback receiving one line per transition, once its
    /// callback has returned.
    pub fn on_verbose<F>(&mut self, hook: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.hooks.on_verbose = Some(Arc::new(hook));
    }

    /// Active state at `pos`; `0` and `-1` are the innermost, `-depth()` the root.
    pub fn get_state(&self, pos: isize) -> Option<&State> {
        self.stack.get(pos)
    }

    /// Log record at `pos`; `0` and `-1` are the newest.
    pub fn get_log(&self, pos: isize) -> Option<&TransitionRecord> {
        self.log.get(pos)
    }

    /// Active path and full log as text.
    pub fn debug(&self) -> String {
        diagnostics::render(&self.stack, &self.log)
    }

    /// Innermost active state.
    pub fn top(&self) -> Option<&State> {
        self.stack.top()
    }

    pub fn root(&self) -> Option<&State> {
        self.stack.root()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Active states, root first.
    pub fn path(&self) -> Vec<&State> {
        self.stack.iter().collect()
    }

    pub fn stack(&self) -> &ActiveStack {
        &self.stack
    }

    pub fn table(&self) -> &CallbackTable<C> {
        &self.table
    }

    pub fn log(&self) -> &TransitionLog {
        &self.log
    }

    /// True when the innermost active state has this id.
    pub fn is(&self, id: impl Into<StateId>) -> bool {
        let id = id.into();
        self.stack.top().is_some_and(|top| *top == id)
    }

    /// True when any active state has this id.
    pub fn is_active(&self, id: impl Into<StateId>) -> bool {
        self.stack.contains(&id.into())
    }

    /// True when the last handled trigger has this id.
    pub fn did(&self, id: impl Into<StateId>) -> bool {
        let id = id.into();
        self.current_trigger.as_ref().is_some_and(|t| *t == id)
    }

    /// Last handled trigger. Cleared at the start of every dispatch.
    pub fn current_trigger(&self) -> Option<&State> {
        self.current_trigger.as_ref()
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            machine: self.id,
            taken_at: Utc::now(),
            path: self.stack.iter().cloned().collect(),
            current_trigger: self.current_trigger.clone(),
            log: self.log.iter().cloned().collect(),
        }
    }
}

impl<C> Drop for Machine<C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

pub(crate) fn bind_reporting<C>(
    table: &mut CallbackTable<C>,
    hooks: &Hooks,
    key: CallbackKey,
    action: Action<C>,
) -> bool {
    let slot = table.slot(key);
    let replaced = slot.is_bound();
    if replaced {
        hooks.warning(&format!("binding {} replaced", slot.key()));
    }
    slot.bind_action(action);
    replaced
}
