//! Step-scratch reset and interaction-length sampling.

use rand::Rng;

use cascade_core::{ActionError, ActionId, StepOrder, TrackStatus};
use cascade_action::StepAction;
use cascade_params::CoreParams;
use cascade_state::CoreState;

/// Prepares every alive slot for the step.
///
/// Zeroes the step-local scratch (deposition, secondaries, step
/// length), records the step start point, samples an exponential
/// residual MFP for every process that has none, converts the MFPs
/// into the physics step limit, and resets the post-step selection to
/// the discrete-select action.
pub struct PreStepAction {
    id: ActionId,
}

impl PreStepAction {
    /// Construct with the id the registry is about to assign.
    pub fn new(id: ActionId) -> Self {
        Self { id }
    }
}

impl StepAction for PreStepAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        "pre-step"
    }

    fn description(&self) -> &str {
        "reset step scratch and sample interaction lengths"
    }

    fn order(&self) -> StepOrder {
        StepOrder::PreStep
    }

    fn execute(&self, params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError> {
        let discrete_select = params.scalars().discrete_select_action;
        for i in 0..state.capacity() {
            if state.sim.status[i] != TrackStatus::Alive {
                continue;
            }
            let particle = state.particle.particle_id[i].expect("alive slot has a particle");
            let mat = state.material.mat[i].expect("alive slot has a material");

            // Step-local scratch.
            state.phys.eloss[i] = 0.0;
            state.phys.cut_reason[i] = None;
            state.phys.secondaries[i].clear();
            state.sim.step_length[i] = 0.0;
            state.phys.step_start_pos[i] = state.geo.pos[i];
            state.phys.step_start_time[i] = state.sim.time[i];
            state.sim.step_count[i] += 1;
            state.sim.post_step_action[i] = discrete_select;

            // Sample exhausted MFPs and derive the physics step limit.
            let processes = params.physics().processes(particle);
            let mut limit = f64::INFINITY;
            let mut limit_process = None;
            for (pid, def) in processes.iter() {
                let p = pid.0 as usize;
                let mfp = match state.phys.mfp[i][p] {
                    Some(mfp) => mfp,
                    None => {
                        let u: f64 = state.rng.engine[i].random();
                        let mfp = -(1.0 - u).ln();
                        state.phys.mfp[i][p] = Some(mfp);
                        mfp
                    }
                };
                let xs = def.macro_xs[mat.0 as usize];
                if xs > 0.0 {
                    let distance = mfp / xs;
                    if distance < limit {
                        limit = distance;
                        limit_process = Some(pid);
                    }
                }
            }
            state.phys.step_limit[i] = limit;
            state.phys.limit_process[i] = limit_process;
        }
        Ok(())
    }
}
