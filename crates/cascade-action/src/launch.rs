//! Per-track launch helpers and fault accumulation.
//!
//! The canonical launch is "apply this executor to every slot". These
//! helpers encode the two filters the pipeline uses — by selected
//! post-step action and by selected along-step action — and consult
//! the sorted thread ranges when the state maintains them. Per-slot
//! faults are gathered while the loop runs and surfaced once after it,
//! in the context of the offending slot.

use cascade_core::{ActionError, ActionId, TrackFault, TrackSlotId, TrackStatus};
use cascade_state::CoreState;

/// Gathers per-slot faults raised inside a slot loop.
///
/// The first fault is kept in full; later ones are only counted. A
/// faulting slot is also transitioned to the errored status so the
/// accounting invariant holds even though the step is about to abort.
#[derive(Debug, Default)]
pub struct ErrorAccumulator {
    first: Option<(TrackSlotId, TrackFault)>,
    count: usize,
}

impl ErrorAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fault for `slot`.
    pub fn push(&mut self, slot: TrackSlotId, fault: TrackFault) {
        if self.first.is_none() {
            self.first = Some((slot, fault));
        }
        self.count += 1;
    }

    /// Whether any fault was recorded.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Surface the gathered faults, if any.
    pub fn finish(self) -> Result<(), ActionError> {
        match self.first {
            None => Ok(()),
            Some((slot, fault)) => Err(ActionError::Track {
                slot,
                fault,
                suppressed: self.count - 1,
            }),
        }
    }
}

/// Apply `f` to every alive slot whose `post_step_action` is `action`.
///
/// When the state maintains sorted thread ranges the loop covers only
/// `get_action_range(action)`; otherwise it scans the full bank and
/// filters per slot.
pub fn launch_post<F>(state: &mut CoreState, action: ActionId, mut f: F) -> Result<(), ActionError>
where
    F: FnMut(&mut CoreState, TrackSlotId) -> Result<(), TrackFault>,
{
    let mut errors = ErrorAccumulator::new();
    let range = state
        .get_action_range(action)
        .unwrap_or(0..state.capacity());
    for thread in range {
        let slot = state.track_slots[thread];
        let i = slot.0 as usize;
        if state.sim.status[i] != TrackStatus::Alive
            || state.sim.post_step_action[i] != Some(action)
        {
            continue;
        }
        if let Err(fault) = f(state, slot) {
            state.sim.status[slot.0 as usize] = TrackStatus::Errored;
            state.diag.errored += 1;
            errors.push(slot, fault);
        }
    }
    errors.finish()
}

/// Apply `f` to every alive slot whose `along_step_action` is `action`.
///
/// Along-step selection is per track (set at initialization), not per
/// step, so this never consults the sorted ranges.
pub fn launch_along<F>(state: &mut CoreState, action: ActionId, mut f: F) -> Result<(), ActionError>
where
    F: FnMut(&mut CoreState, TrackSlotId) -> Result<(), TrackFault>,
{
    let mut errors = ErrorAccumulator::new();
    for thread in 0..state.capacity() {
        let slot = state.track_slots[thread];
        let i = slot.0 as usize;
        if state.sim.status[i] != TrackStatus::Alive
            || state.sim.along_step_action[i] != Some(action)
        {
            continue;
        }
        if let Err(fault) = f(state, slot) {
            state.sim.status[slot.0 as usize] = TrackStatus::Errored;
            state.diag.errored += 1;
            errors.push(slot, fault);
        }
    }
    errors.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_keeps_first_and_counts_rest() {
        let mut acc = ErrorAccumulator::new();
        acc.push(
            TrackSlotId(2),
            TrackFault::InvariantFailure { what: "a".into() },
        );
        acc.push(
            TrackSlotId(5),
            TrackFault::InvariantFailure { what: "b".into() },
        );
        match acc.finish() {
            Err(ActionError::Track {
                slot, suppressed, ..
            }) => {
                assert_eq!(slot, TrackSlotId(2));
                assert_eq!(suppressed, 1);
            }
            other => panic!("expected Track error, got {other:?}"),
        }
    }

    #[test]
    fn empty_accumulator_finishes_ok() {
        assert!(ErrorAccumulator::new().finish().is_ok());
    }
}
