//! Engine configuration.

use crate::core::DEFAULT_LOG_CAPACITY;
use serde::{Deserialize, Serialize};

/// Tunables fixed at construction time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Maximum number of records kept in the transition log
    pub log_capacity: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}
