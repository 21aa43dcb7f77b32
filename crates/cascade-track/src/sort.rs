//! By-action partition of the slot indirection.

use cascade_core::{ActionError, ActionId, StepOrder, TrackStatus};
use cascade_action::StepAction;
use cascade_params::CoreParams;
use cascade_state::CoreState;

/// Partitions `track_slots` so slots sharing a `post_step_action` are
/// contiguous, and rebuilds the action → thread-range table.
///
/// Runs immediately after discrete selection, so the post-order
/// actions (interactions, boundary, tracking cut) launch over exactly
/// their own range. Slots with no selected action (inactive) sort past
/// the last range. No-op when the state is unsorted.
pub struct SortTracksAction {
    id: ActionId,
}

impl SortTracksAction {
    /// Construct with the id the registry is about to assign.
    pub fn new(id: ActionId) -> Self {
        Self { id }
    }
}

impl StepAction for SortTracksAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        "sort-tracks"
    }

    fn description(&self) -> &str {
        "partition track slots by their next discrete action"
    }

    fn order(&self) -> StepOrder {
        StepOrder::PrePost
    }

    fn execute(&self, _params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError> {
        let CoreState {
            sim,
            track_slots,
            offsets,
            ..
        } = state;
        let Some(offsets) = offsets.as_mut() else {
            return Ok(());
        };
        let num_actions = offsets.num_actions();

        // Key: the selected action for alive slots, the tail otherwise.
        let key = |slot: &cascade_core::TrackSlotId| -> usize {
            let i = slot.0 as usize;
            if sim.status[i] == TrackStatus::Alive {
                match sim.post_step_action[i] {
                    Some(action) => action.0 as usize,
                    None => num_actions,
                }
            } else {
                num_actions
            }
        };

        let mut counts = vec![0usize; num_actions];
        for slot in track_slots.iter() {
            let k = key(slot);
            if k < num_actions {
                counts[k] += 1;
            }
        }
        track_slots.sort_by_key(key);
        offsets.rebuild(&counts);
        Ok(())
    }
}
