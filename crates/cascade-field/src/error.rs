//! Field configuration errors.

use std::error::Error;
use std::fmt;

/// Errors from field setup. Fatal at build time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// Driver options failed validation.
    InvalidOptions {
        /// Description of the invalid option.
        reason: String,
    },
    /// A gridded field's tables are malformed.
    InvalidGrid {
        /// Description of the shape problem.
        reason: String,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOptions { reason } => write!(f, "invalid field options: {reason}"),
            Self::InvalidGrid { reason } => write!(f, "invalid field grid: {reason}"),
        }
    }
}

impl Error for FieldError {}
