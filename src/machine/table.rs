//! Callback table mapping `(source, event)` keys to actions.

use super::Machine;
use crate::core::CallbackKey;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Side-effecting callback bound to one key.
///
/// Receives the engine itself, so the body may `push`, `pop`, `set` or
/// `command` reentrantly, plus the arguments of the invocation.
pub type Action<C> = Arc<dyn Fn(&mut Machine<C>, &[String]) + Send + Sync>;

/// Binding slot for one key. Empty until an action is bound.
pub struct Slot<C> {
    key: CallbackKey,
    action: Option<Action<C>>,
}

impl<C> Slot<C> {
    fn empty(key: CallbackKey) -> Self {
        Self { key, action: None }
    }

    /// Bind `action`, replacing whatever was bound before.
    pub fn bind<F>(&mut self, action: F) -> &mut Self
    where
        F: Fn(&mut Machine<C>, &[String]) + Send + Sync + 'static,
    {
        self.bind_action(Arc::new(action))
    }

    /// Bind an already shared action.
    pub fn bind_action(&mut self, action: Action<C>) -> &mut Self {
        if self.action.replace(action).is_some() {
            tracing::debug!(key = %self.key, "Binding replaced");
        }
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.action = None;
        self
    }

    pub fn is_bound(&self) -> bool {
        self.action.is_some()
    }

    pub fn key(&self) -> &CallbackKey {
        &self.key
    }
}

/// All bindings of one engine. At most one action per key.
pub struct CallbackTable<C> {
    slots: HashMap<CallbackKey, Slot<C>>,
}

impl<C> Default for CallbackTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CallbackTable<C> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Slot for `key`, created empty if absent.
    pub fn slot(&mut self, key: CallbackKey) -> &mut Slot<C> {
        self.slots
            .entry(key)
            .or_insert_with_key(|key| Slot::empty(key.clone()))
    }

    /// Shared handle to the bound action, if any.
    pub(crate) fn action(&self, key: &CallbackKey) -> Option<Action<C>> {
        self.slots.get(key).and_then(|slot| slot.action.clone())
    }

    pub fn contains(&self, key: &CallbackKey) -> bool {
        self.slots.get(key).is_some_and(Slot::is_bound)
    }

    /// Bound keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &CallbackKey> + '_ {
        self.slots
            .values()
            .filter(|slot| slot.is_bound())
            .map(Slot::key)
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_bound()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C> fmt::Debug for CallbackTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&CallbackKey> = self.keys().collect();
        keys.sort();
        f.debug_struct("CallbackTable").field("bound", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Lifecycle, State};

    fn key(source: &str, trigger: &str) -> CallbackKey {
        CallbackKey::new(State::named(source), State::named(trigger))
    }

    #[test]
    fn slot_is_created_empty() {
        let mut table: CallbackTable<()> = CallbackTable::new();
        assert!(!table.slot(key("a", "go")).is_bound());
        assert!(!table.contains(&key("a", "go")));
        assert!(table.is_empty());
    }

    #[test]
    fn bind_makes_key_callable() {
        let mut table: CallbackTable<()> = CallbackTable::new();
        table.slot(key("a", "go")).bind(|_, _| {});

        assert!(table.contains(&key("a", "go")));
        assert!(table.action(&key("a", "go")).is_some());
        assert!(table.action(&key("a", "stop")).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn last_binding_wins() {
        let mut table: CallbackTable<Vec<&'static str>> = CallbackTable::new();
        table.slot(key("a", "go")).bind(|m, _| m.context_mut().push("first"));
        table.slot(key("a", "go")).bind(|m, _| m.context_mut().push("second"));

        assert_eq!(table.len(), 1);

        let mut machine = Machine::with_context(State::named("a"), Vec::new());
        let action = table.action(&key("a", "go")).unwrap();
        action(&mut machine, &[]);
        assert_eq!(machine.context(), &["second"]);
    }

    #[test]
    fn clear_unbinds() {
        let mut table: CallbackTable<()> = CallbackTable::new();
        table.slot(key("a", "go")).bind(|_, _| {}).clear();
        assert!(!table.contains(&key("a", "go")));
    }

    #[test]
    fn lifecycle_keys_are_separate() {
        let mut table: CallbackTable<()> = CallbackTable::new();
        table
            .slot(CallbackKey::new(State::named("a"), Lifecycle::Init))
            .bind(|_, _| {});

        assert!(table.contains(&CallbackKey::new(State::named("a"), Lifecycle::Init)));
        assert!(!table.contains(&key("a", "init")));
    }

    #[test]
    fn debug_lists_bound_keys() {
        let mut table: CallbackTable<()> = CallbackTable::new();
        table.slot(key("a", "go")).bind(|_, _| {});
        table.slot(key("b", "stop"));

        let rendered = format!("{table:?}");
        assert!(rendered.contains("CallbackTable"));
        assert_eq!(table.keys().count(), 1);
    }
}
