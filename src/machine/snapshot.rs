//! Export-only diagnostic snapshot of an engine.
//!
//! Captures the active path and the transition log for logging or UI
//! display. Bindings are closures and are never included; there is no
//! restore path.

use crate::core::{State, TransitionRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Point-in-time view of one engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// Engine instance the snapshot was taken from
    pub machine: Uuid,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    /// Active states, root first
    pub path: Vec<State>,

    /// Last trigger that was handled
    pub current_trigger: Option<State>,

    /// Transition log, oldest first
    pub log: Vec<TransitionRecord>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
