//! Field-free along-step for charged tracks.

use std::sync::Arc;

use cascade_core::{ActionError, ActionId, StepOrder, TrackFault};
use cascade_action::{launch_along, StepAction};
use cascade_params::CoreParams;
use cascade_state::CoreState;

use crate::common;
use crate::fluct::FluctuationModel;
use crate::msc::MscModel;

/// Straight-line propagation for charged tracks with optional MSC and
/// energy-loss fluctuation.
pub struct AlongStepGeneralLinearAction {
    id: ActionId,
    msc: Option<Arc<dyn MscModel>>,
    fluct: Option<Arc<dyn FluctuationModel>>,
}

impl AlongStepGeneralLinearAction {
    /// Construct with the id the registry is about to assign.
    pub fn new(
        id: ActionId,
        msc: Option<Arc<dyn MscModel>>,
        fluct: Option<Arc<dyn FluctuationModel>>,
    ) -> Self {
        Self { id, msc, fluct }
    }
}

impl StepAction for AlongStepGeneralLinearAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        "along-step-general-linear"
    }

    fn description(&self) -> &str {
        "field-free along-step with optional MSC and energy loss"
    }

    fn order(&self) -> StepOrder {
        StepOrder::Along
    }

    fn execute(&self, params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError> {
        let scalars = *params.scalars();
        launch_along(state, self.id, |state, slot| {
            let i = slot.0 as usize;
            let limit = common::proposed_limit(params, state, slot, self.msc.as_ref());
            let volume = state.geo.volume[i].expect("occupied slot has a volume");
            let to_boundary = params.geometry().navigator.distance_to_boundary(
                &state.geo.pos[i],
                &state.geo.dir[i],
                volume,
            );
            let boundary = to_boundary <= limit;
            let moved = limit.min(to_boundary);
            if !moved.is_finite() {
                return Err(TrackFault::Geometry {
                    what: "unbounded step: no physics limit and no boundary".into(),
                });
            }

            let dir = state.geo.dir[i];
            state.geo.pos[i] = cascade_core::math::axpy(moved, &dir, &state.geo.pos[i]);
            state.sim.step_length[i] = moved;
            state.geo.on_boundary[i] = boundary;
            if boundary {
                state.sim.post_step_action[i] = scalars.boundary_action;
            }
            state.sim.num_looping_steps[i] = 0;

            if let Some(msc) = &self.msc {
                common::apply_msc(state, slot, msc);
            }
            common::apply_eloss_and_time(params, state, slot, self.fluct.as_ref());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::{CutReason, TrackSlotId};
    use cascade_test_utils::{electron_primary, slab_params_and_state, spawn_track};

    #[test]
    fn continuous_loss_reduces_energy() {
        let (params, mut state) = slab_params_and_state(4, 16);
        spawn_track(
            &params,
            &mut state,
            TrackSlotId(0),
            &electron_primary(0, 10.0),
        );
        state.phys.step_limit[0] = 0.5;

        AlongStepGeneralLinearAction::new(ActionId(2), None, None)
            .execute(&params, &mut state)
            .unwrap();

        // The slab test medium has dedx = 2 MeV/cm.
        assert!((state.particle.energy[0] - 9.0).abs() < 1e-9);
        assert!((state.phys.eloss[0] - 1.0).abs() < 1e-9);
        assert_ne!(
            state.sim.post_step_action[0],
            params.scalars().tracking_cut_action
        );
    }

    #[test]
    fn loss_to_cutoff_marks_a_tracking_cut() {
        let (params, mut state) = slab_params_and_state(4, 16);
        spawn_track(
            &params,
            &mut state,
            TrackSlotId(0),
            &electron_primary(0, 0.6),
        );
        // 0.6 MeV over 0.5 cm at 2 MeV/cm: loss exceeds the energy.
        state.phys.step_limit[0] = 0.5;

        AlongStepGeneralLinearAction::new(ActionId(2), None, None)
            .execute(&params, &mut state)
            .unwrap();

        assert_eq!(state.particle.energy[0], 0.0);
        assert!((state.phys.eloss[0] - 0.6).abs() < 1e-12);
        assert_eq!(state.phys.cut_reason[0], Some(CutReason::EnergyCutoff));
        assert_eq!(
            state.sim.post_step_action[0],
            params.scalars().tracking_cut_action
        );
    }

    #[test]
    fn range_caps_the_step() {
        // With dedx = 2 and a 0.6 MeV electron, the range table in the
        // slab medium is 0.3 cm; a long physics limit must be capped.
        let (params, mut state) = slab_params_and_state(4, 16);
        spawn_track(
            &params,
            &mut state,
            TrackSlotId(0),
            &electron_primary(0, 0.6),
        );
        state.phys.step_limit[0] = 100.0;

        AlongStepGeneralLinearAction::new(ActionId(2), None, None)
            .execute(&params, &mut state)
            .unwrap();

        assert!(state.sim.step_length[0] <= 0.3 + 1e-12);
    }
}
