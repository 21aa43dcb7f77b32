//! Tracking cuts: kill a track and deposit its remaining energy.

use cascade_core::{ActionError, ActionId, CutReason, StepOrder, TrackStatus};
use cascade_action::{launch_post, StepAction};
use cascade_params::CoreParams;
use cascade_state::CoreState;

/// Kills tracks marked for a cut, depositing their remaining energy
/// locally.
///
/// Cuts are per-track recoverable events, never errors: the slot is
/// recycled at the end of the step and the pipeline continues. The
/// reason recorded by the marking action feeds the diagnostics
/// counters.
pub struct TrackingCutAction {
    id: ActionId,
}

impl TrackingCutAction {
    /// Construct with the id the registry is about to assign.
    pub fn new(id: ActionId) -> Self {
        Self { id }
    }
}

impl StepAction for TrackingCutAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        "tracking-cut"
    }

    fn description(&self) -> &str {
        "kill marked tracks and deposit their remaining energy"
    }

    fn order(&self) -> StepOrder {
        StepOrder::Post
    }

    fn execute(&self, _params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError> {
        launch_post(state, self.id, |state, slot| {
            let i = slot.0 as usize;
            let remaining = state.particle.energy[i];
            state.phys.eloss[i] += remaining;
            state.particle.energy[i] = 0.0;
            state.sim.status[i] = TrackStatus::Killed;
            match state.phys.cut_reason[i] {
                Some(CutReason::Looping) => state.diag.looping_cuts += 1,
                Some(CutReason::FieldFailure) => state.diag.field_failure_cuts += 1,
                Some(CutReason::UserCut) => state.diag.user_cuts += 1,
                Some(CutReason::EnergyCutoff) | None => state.diag.energy_cutoff_cuts += 1,
                Some(CutReason::Escaped) => state.diag.escaped += 1,
            }
            Ok(())
        })
    }
}
