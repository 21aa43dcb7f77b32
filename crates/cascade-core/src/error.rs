//! Error types shared across the engine.
//!
//! Per-track "soft" failures (tracking cuts, looping kills, field
//! propagation failures) are state transitions, not errors: they are
//! recorded in diagnostics counters and never propagate. The types
//! here cover the fatal paths only.

use std::error::Error;
use std::fmt;

use crate::id::TrackSlotId;

/// A fatal per-slot fault raised inside an action's executor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackFault {
    /// A core contract was violated for this slot.
    InvariantFailure {
        /// Description of the violated invariant.
        what: String,
    },
    /// Geometry could not resolve the slot's position.
    Geometry {
        /// Description of the navigation failure.
        what: String,
    },
}

impl fmt::Display for TrackFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvariantFailure { what } => write!(f, "invariant failure: {what}"),
            Self::Geometry { what } => write!(f, "geometry failure: {what}"),
        }
    }
}

impl Error for TrackFault {}

/// Errors from a single action's `execute()`.
///
/// Per-slot faults are gathered while the slot loop runs and surfaced
/// once afterwards: the first fault is carried in full, the rest are
/// counted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionError {
    /// One or more slots faulted during the slot loop.
    Track {
        /// First faulting slot.
        slot: TrackSlotId,
        /// The first fault.
        fault: TrackFault,
        /// Number of additional faults not reported individually.
        suppressed: usize,
    },
    /// The action's own contract was violated.
    InvariantFailure {
        /// Description of the violation.
        what: String,
    },
    /// The initializer buffer overflowed while enqueuing new tracks.
    InitializerOverflow {
        /// Configured buffer capacity.
        capacity: usize,
        /// Records pending when the overflow occurred, including the
        /// one that did not fit.
        pending: usize,
    },
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Track {
                slot,
                fault,
                suppressed,
            } => {
                write!(f, "slot {slot}: {fault}")?;
                if *suppressed > 0 {
                    write!(f, " (+{suppressed} more)")?;
                }
                Ok(())
            }
            Self::InvariantFailure { what } => write!(f, "invariant failure: {what}"),
            Self::InitializerOverflow { capacity, pending } => write!(
                f,
                "initializer buffer overflow: {pending} pending exceeds capacity {capacity}"
            ),
        }
    }
}

impl Error for ActionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Track { fault, .. } => Some(fault),
            _ => None,
        }
    }
}

/// Errors surfaced from one step of the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// An action failed; the step is aborted.
    ActionFailed {
        /// Label of the failing action.
        label: String,
        /// The underlying action error.
        reason: ActionError,
    },
    /// The initializer buffer capacity was exceeded.
    InitializerOverflow {
        /// Configured capacity of the buffer.
        capacity: usize,
        /// Number of records pending when the overflow occurred.
        pending: usize,
    },
    /// An end-of-step hook failed.
    HookFailed {
        /// Label of the failing hook.
        label: String,
        /// Description of the failure.
        reason: String,
    },
    /// A device-only path was invoked without device support.
    NotConfigured {
        /// The missing capability.
        what: &'static str,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActionFailed { label, reason } => {
                write!(f, "action '{label}' failed: {reason}")
            }
            Self::InitializerOverflow { capacity, pending } => {
                write!(
                    f,
                    "initializer buffer overflow: {pending} pending exceeds capacity {capacity}"
                )
            }
            Self::HookFailed { label, reason } => {
                write!(f, "hook '{label}' failed: {reason}")
            }
            Self::NotConfigured { what } => write!(f, "{what} is not configured"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ActionFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_error_display_counts_suppressed() {
        let err = ActionError::Track {
            slot: TrackSlotId(3),
            fault: TrackFault::InvariantFailure {
                what: "negative energy".into(),
            },
            suppressed: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("slot 3"));
        assert!(msg.contains("+2 more"));
    }

    #[test]
    fn step_error_sources_chain() {
        let err = StepError::ActionFailed {
            label: "scatter".into(),
            reason: ActionError::InvariantFailure {
                what: "bad selection".into(),
            },
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("scatter"));
    }
}
