//! Build errors for the machine builder.

use std::fmt;
use thiserror::Error;

/// A single problem found while validating a builder.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Log capacity must be at least 1")]
    ZeroLogCapacity,

    #[error("Empty state name used as {which}")]
    EmptyStateName { which: String },
}

/// Every problem found while validating a builder.
///
/// Validation does not stop at the first problem; all of them are reported
/// together.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildErrors {
    errors: Vec<BuildError>,
}

impl BuildErrors {
    pub(crate) fn new(errors: Vec<BuildError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[BuildError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn contains(&self, error: &BuildError) -> bool {
        self.errors.contains(error)
    }
}

impl fmt::Display for BuildErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "machine rejected with {} error(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "; {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for BuildErrors {}
