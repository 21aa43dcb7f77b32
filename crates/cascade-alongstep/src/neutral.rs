//! Straight-line along-step for neutral tracks.

use cascade_core::{ActionError, ActionId, StepOrder, TrackFault};
use cascade_action::{launch_along, StepAction};
use cascade_params::CoreParams;
use cascade_state::CoreState;

/// Propagates neutral tracks in a straight line to the physics limit
/// or the next boundary, whichever comes first.
///
/// No field, no MSC, no continuous energy loss; time still advances.
pub struct AlongStepNeutralAction {
    id: ActionId,
}

impl AlongStepNeutralAction {
    /// Construct with the id the registry is about to assign.
    pub fn new(id: ActionId) -> Self {
        Self { id }
    }
}

impl StepAction for AlongStepNeutralAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        "along-step-neutral"
    }

    fn description(&self) -> &str {
        "straight-line propagation for neutral tracks"
    }

    fn order(&self) -> StepOrder {
        StepOrder::Along
    }

    fn execute(&self, params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError> {
        let scalars = *params.scalars();
        launch_along(state, self.id, |state, slot| {
            let i = slot.0 as usize;
            let limit = crate::common::proposed_limit(params, state, slot, None);
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
            crate::common::apply_eloss_and_time(params, state, slot, None);
            Ok(())
        })
    }
}
