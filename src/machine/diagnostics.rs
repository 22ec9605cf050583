//! Optional diagnostic hooks and text rendering.

use super::stack::ActiveStack;
use crate::core::TransitionLog;
use std::fmt::{self, Write};
use std::sync::Arc;

/// Line-oriented diagnostic callback.
pub type Hook = Arc<dyn Fn(&str) + Send + Sync>;

/// Application callbacks mirroring the engine's `warn`/`debug` trace events.
#[derive(Clone, Default)]
pub struct Hooks {
    pub(crate) on_warning: Option<Hook>,
    pub(crate) on_verbose: Option<Hook>,
}

impl Hooks {
    pub(crate) fn warning(&self, line: &str) {
        if let Some(hook) = &self.on_warning {
            hook(line);
        }
    }

    pub(crate) fn verbose(&self, line: &str) {
        if let Some(hook) = &self.on_verbose {
            hook(line);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_warning", &self.on_warning.is_some())
            .field("on_verbose", &self.on_verbose.is_some())
            .finish()
    }
}

/// Render the active path and the full log.
pub(crate) fn render(stack: &ActiveStack, log: &TransitionLog) -> String {
    let mut out = String::new();
    let path: Vec<String> = stack.iter().map(ToString::to_string).collect();
    let _ = writeln!(out, "active ({}): {}", stack.len(), path.join(" > "));
    let _ = writeln!(out, "log ({}/{}):", log.len(), log.capacity());
    for (i, record) in log.iter().enumerate() {
        let _ = writeln!(out, "  #{i} {record}");
    }
    out
}
