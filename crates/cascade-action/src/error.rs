//! Registry errors.

use std::error::Error;
use std::fmt;

use cascade_core::ActionId;

/// Errors from action registration. All are fatal at build time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// The action was constructed with an id other than the one the
    /// registry is about to assign.
    IdMismatch {
        /// The id the registry would assign.
        expected: ActionId,
        /// The id the action reports.
        got: ActionId,
        /// The action's label.
        label: String,
    },
    /// Another action already claimed the label.
    DuplicateLabel {
        /// The conflicting label.
        label: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdMismatch {
                expected,
                got,
                label,
            } => write!(
                f,
                "action '{label}' reports id {got} but the registry assigns {expected}"
            ),
            Self::DuplicateLabel { label } => write!(f, "duplicate action label '{label}'"),
        }
    }
}

impl Error for RegistryError {}
