//! State errors.

use std::error::Error;
use std::fmt;

/// Errors from state mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateError {
    /// The initializer buffer is full. Fatal: losing a pending track
    /// would silently bias results.
    InitializerOverflow {
        /// Configured buffer capacity.
        capacity: usize,
    },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitializerOverflow { capacity } => {
                write!(f, "initializer buffer overflow (capacity {capacity})")
            }
        }
    }
}

impl Error for StateError {}
