//! Macros for ergonomic state declarations.

/// Declare `State` constants named after their label.
///
/// # Example
///
/// ```
/// use statestack::states;
///
/// states! {
///     pub OPENING = "opening",
///     /// Tray closed, no disc
///     CLOSING = "closing",
/// }
///
/// assert_eq!(OPENING.to_string(), "opening()");
/// assert_ne!(OPENING, CLOSING);
/// ```
#[macro_export]
macro_rules! states {
    (
        $(
            $(#[$meta:meta])*
            $vis:vis $name:ident = $label:literal
        ),* $(,)?
    ) => {
        $(
            $(#[$meta])*
            $vis const $name: $crate::core::State = $crate::core::State::from_static($label);
        )*
    };
}
