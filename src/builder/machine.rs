//! Builder for constructing machines.

use crate::builder::error::{BuildError, BuildErrors};
use crate::core::{CallbackKey, Event, State, StateId};
use crate::machine::{bind_reporting, Action, CallbackTable, Hooks, Machine, MachineConfig};
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use uuid::Uuid;

/// Builder for constructing machines with a fluent API.
///
/// Bindings registered here are installed before the root state is
/// entered, so `(root, Init)` reaches its callback.
///
/// # Example
///
/// ```
/// use statestack::builder::MachineBuilder;
/// use statestack::core::Lifecycle;
/// use statestack::states;
///
/// states! {
///     IDLE = "idle",
///     WAKE = "wake",
/// }
///
/// let machine = MachineBuilder::<u32>::new()
///     .initial(IDLE)
///     .log_capacity(8)
///     .on(&IDLE, Lifecycle::Init, |m, _| *m.context_mut() += 1)
///     .on(&IDLE, &WAKE, |m, _| *m.context_mut() += 10)
///     .build()
///     .unwrap();
///
/// assert_eq!(*machine.context(), 1);
/// assert_eq!(machine.log().capacity(), 8);
/// ```
pub struct MachineBuilder<C = ()> {
    initial: Option<State>,
    context: C,
    config: MachineConfig,
    bindings: Vec<(CallbackKey, Action<C>)>,
    hooks: Hooks,
}

impl<C: Default> MachineBuilder<C> {
    /// Create a builder with a default context.
    pub fn new() -> Self {
        Self::with_context(C::default())
    }
}

impl<C: Default> Default for MachineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> MachineBuilder<C> {
    /// Create a builder owning `context`.
    pub fn with_context(context: C) -> Self {
        Self {
            initial: None,
            context,
            config: MachineConfig::default(),
            bindings: Vec::new(),
            hooks: Hooks::default(),
        }
    }

    /// Set the root state (required).
    pub fn initial(mut self, state: State) -> Self {
        self.initial = Some(state);
        self
    }

    /// Replace the context.
    pub fn context(mut self, context: C) -> Self {
        self.context = context;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set how many transition records are retained.
    pub fn log_capacity(mut self, capacity: usize) -> Self {
        self.config.log_capacity = capacity;
        self
    }

    /// Bind `action` to `(source, event)`. Later bindings for the same key win.
    pub fn on<F>(mut self, source: impl Into<StateId>, event: impl Into<Event>, action: F) -> Self
    where
        F: Fn(&mut Machine<C>, &[String]) + Send + Sync + 'static,
    {
        self.bindings
            .push((CallbackKey::new(source, event), Arc::new(action)));
        self
    }

    /// Receive warning lines from the machine.
    pub fn on_warning<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.hooks.on_warning = Some(Arc::new(hook));
        self
    }

    /// Receive one line per realized transition.
    pub fn on_verbose<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.hooks.on_verbose = Some(Arc::new(hook));
        self
    }

    /// Check the builder, accumulating every problem.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<BuildError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<BuildError>>> = Vec::new();

        checks.push(match &self.initial {
            None => Validation::fail(BuildError::MissingInitialState),
            Some(state) => not_blank(state.id(), "initial state".to_string()),
        });

        checks.push(if self.config.log_capacity == 0 {
            Validation::fail(BuildError::ZeroLogCapacity)
        } else {
            Validation::success(())
        });

        for (key, _) in &self.bindings {
            checks.push(not_blank(&key.source, format!("source of binding {key}")));
            if let Event::Trigger(trigger) = &key.event {
                checks.push(not_blank(trigger, format!("trigger of binding {key}")));
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the machine and enter the root state.
    pub fn build(self) -> Result<Machine<C>, BuildErrors> {
        if let Validation::Failure(errors) = self.validate() {
            return Err(BuildErrors::new(errors.iter().cloned().collect()));
        }
        let root = self.initial.ok_or_else(|| {
            BuildErrors::new(vec![BuildError::MissingInitialState])
        })?;

        let mut table = CallbackTable::new();
        for (key, action) in self.bindings {
            bind_reporting(&mut table, &self.hooks, key, action);
        }

        Ok(Machine::from_parts(
            Uuid::new_v4(),
            root,
            self.context,
            self.config,
            self.hooks,
            table,
        ))
    }
}

fn not_blank(id: &StateId, which: String) -> Validation<(), NonEmptyVec<BuildError>> {
    if id.is_blank() {
        Validation::fail(BuildError::EmptyStateName { which })
    } else {
        Validation::success(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Lifecycle;
    use crate::states;
    use std::sync::Mutex;

    states! {
        IDLE = "idle",
        BUSY = "busy",
        GO = "go",
    }

    #[test]
    fn builder_requires_initial_state() {
        let result = MachineBuilder::<()>::new().build();

        let errors = result.err().unwrap();
        assert!(errors.contains(&BuildError::MissingInitialState));
    }

    #[test]
    fn builder_accumulates_all_errors() {
        let result = MachineBuilder::<()>::new()
            .log_capacity(0)
            .on(State::named(""), &GO, |_, _| {})
            .on(&IDLE, State::named(""), |_, _| {})
            .build();

        let errors = result.err().unwrap();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&BuildError::MissingInitialState));
        assert!(errors.contains(&BuildError::ZeroLogCapacity));
        assert_eq!(
            errors
                .errors()
                .iter()
                .filter(|e| matches!(e, BuildError::EmptyStateName { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn validate_passes_for_complete_builder() {
        let builder = MachineBuilder::<()>::new()
            .initial(IDLE)
            .on(&IDLE, &GO, |m, _| m.set(BUSY));
        assert!(builder.validate().is_success());
    }

    #[test]
    fn root_init_fires_during_build() {
        let machine = MachineBuilder::<Vec<String>>::new()
            .initial(IDLE.with_arg("boot"))
            .on(&IDLE, Lifecycle::Init, |m, args| {
                let line = format!("init idle {}", args.join(","));
                m.context_mut().push(line);
            })
            .build()
            .unwrap();

        assert_eq!(machine.context(), &["init idle boot"]);
        assert_eq!(machine.log().len(), 1);
    }

    #[test]
    fn later_binding_wins_and_is_reported() {
        let warnings = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&warnings);

        let mut machine = MachineBuilder::<Vec<&'static str>>::new()
            .initial(IDLE)
            .on_warning(move |line| sink.lock().unwrap().push(line.to_string()))
            .on(&IDLE, &GO, |m, _| m.context_mut().push("first"))
            .on(&IDLE, &GO, |m, _| m.context_mut().push("second"))
            .build()
            .unwrap();

        assert!(machine.command(GO));
        assert_eq!(machine.context(), &["second"]);
        assert_eq!(
            *warnings.lock().unwrap(),
            ["binding (idle, go) replaced"]
        );
    }

    #[test]
    fn with_context_and_config() {
        let machine = MachineBuilder::with_context(7u8)
            .initial(IDLE)
            .config(MachineConfig { log_capacity: 3 })
            .build()
            .unwrap();

        assert_eq!(*machine.context(), 7);
        assert_eq!(machine.config().log_capacity, 3);
        assert_eq!(machine.log().capacity(), 3);
    }
}
