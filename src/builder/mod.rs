//! Builder API for ergonomic machine construction.
//!
//! This module provides a fluent builder, ready-made actions for the common
//! "just move there" transitions, and the `states!` declaration macro.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::{BuildError, BuildErrors};
pub use machine::MachineBuilder;

use crate::core::State;
use crate::machine::Machine;

/// Action that replaces the innermost state with `target`.
///
/// # Example
///
/// ```
/// use statestack::builder::{set_to, MachineBuilder};
/// use statestack::states;
///
/// states! {
///     GREEN = "green",
///     YELLOW = "yellow",
///     TIMER = "timer",
/// }
///
/// let mut light = MachineBuilder::<()>::new()
///     .initial(GREEN)
///     .on(&GREEN, &TIMER, set_to(YELLOW))
///     .build()
///     .unwrap();
///
/// assert!(light.command(TIMER));
/// assert!(light.is(&YELLOW));
/// ```
pub fn set_to<C: 'static>(
    target: State,
) -> impl Fn(&mut Machine<C>, &[String]) + Send + Sync + 'static {
    move |machine: &mut Machine<C>, _: &[String]| machine.set(target.clone())
}

/// Action that enters `target` on top of the innermost state, passing the
/// invocation arguments along.
pub fn push_to<C: 'static>(
    target: State,
) -> impl Fn(&mut Machine<C>, &[String]) + Send + Sync + 'static {
    move |machine: &mut Machine<C>, args: &[String]| machine.push(target.with_args(args.iter()))
}

/// Action that terminates the innermost state.
pub fn pop_back<C: 'static>() -> impl Fn(&mut Machine<C>, &[String]) + Send + Sync + 'static {
    |machine: &mut Machine<C>, _: &[String]| {
        machine.pop();
    }
}
