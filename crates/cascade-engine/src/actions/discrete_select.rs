//! Post-step interaction selection.

use cascade_core::{ActionError, ActionId, StepOrder, TrackStatus};
use cascade_action::StepAction;
use cascade_params::CoreParams;
use cascade_state::CoreState;

/// Residual tolerance for deciding a process's MFP is exhausted.
const MFP_EPSILON: f64 = 1e-9;

/// Resolves which discrete interaction, if any, happens at the end of
/// the step.
///
/// Every alive slot first pays the optical depth of the step it just
/// took: each process's residual MFP decreases by (step length x cross
/// section). Slots still selecting this action (not boundary-limited,
/// not cut, not propagation-limited) then either dispatch to the
/// limiting process's interaction kernel — when its MFP is exhausted —
/// or fall through to the propagation-limit marker.
pub struct DiscreteSelectAction {
    id: ActionId,
}

impl DiscreteSelectAction {
    /// Construct with the id the registry is about to assign.
    pub fn new(id: ActionId) -> Self {
        Self { id }
    }
}

impl StepAction for DiscreteSelectAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        "discrete-select"
    }

    fn description(&self) -> &str {
        "decrement interaction MFPs and select the post-step kernel"
    }

    fn order(&self) -> StepOrder {
        StepOrder::PrePost
    }

    fn execute(&self, params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError> {
        let scalars = *params.scalars();
        for i in 0..state.capacity() {
            if state.sim.status[i] != TrackStatus::Alive {
                continue;
            }
            let particle = state.particle.particle_id[i].expect("alive slot has a particle");
            let mat = state.material.mat[i].expect("alive slot has a material");
            let moved = state.sim.step_length[i];

            // Pay the optical depth of the step for every process.
            let processes = params.physics().processes(particle);
            for (pid, def) in processes.iter() {
                let p = pid.0 as usize;
                if let Some(mfp) = state.phys.mfp[i][p] {
                    let xs = def.macro_xs[mat.0 as usize];
                    state.phys.mfp[i][p] = Some((mfp - moved * xs).max(0.0));
                }
            }

            if state.sim.post_step_action[i] != Some(self.id) {
                // Boundary, tracking cut, or propagation limit already
                // claimed this slot.
                continue;
            }

            let mut selected = None;
            if let Some(pid) = state.phys.limit_process[i] {
                let p = pid.0 as usize;
                if state.phys.mfp[i][p].is_some_and(|mfp| mfp <= MFP_EPSILON) {
                    // Interact: this process resamples next step.
                    state.phys.mfp[i][p] = None;
                    selected = Some(processes[pid].action);
                }
            }
            state.sim.post_step_action[i] = selected.or(scalars.propagation_limit_action);
        }
        Ok(())
    }
}
