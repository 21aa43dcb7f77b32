//! Params construction and access errors.

use std::error::Error;
use std::fmt;

/// Errors raised while building or accessing params.
///
/// All variants are fatal at build time; params are never partially
/// constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamsError {
    /// Tables disagree about counts or contents.
    Inconsistent {
        /// Description of the inconsistency.
        reason: String,
    },
    /// A device-space view was requested without an active device.
    NotConfigured {
        /// The missing capability.
        what: &'static str,
    },
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inconsistent { reason } => write!(f, "inconsistent params: {reason}"),
            Self::NotConfigured { what } => write!(f, "{what} is not configured"),
        }
    }
}

impl Error for ParamsError {}
