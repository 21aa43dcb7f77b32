//! Surface crossing.

use cascade_core::{ActionError, ActionId, StepOrder, TrackStatus};
use cascade_action::{launch_post, StepAction};
use cascade_params::CoreParams;
use cascade_state::CoreState;

/// Crosses the surface a boundary-limited track stopped on.
///
/// The slot's volume, instance chain, and material update together,
/// before any later action can read them. A track that exits the
/// outermost volume is killed as escaped.
pub struct BoundaryAction {
    id: ActionId,
}

impl BoundaryAction {
    /// Construct with the id the registry is about to assign.
    pub fn new(id: ActionId) -> Self {
        Self { id }
    }
}

impl StepAction for BoundaryAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        "geo-boundary"
    }

    fn description(&self) -> &str {
        "cross the volume surface reached by the along-step"
    }

    fn order(&self) -> StepOrder {
        StepOrder::Post
    }

    fn execute(&self, params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError> {
        launch_post(state, self.id, |state, slot| {
            let i = slot.0 as usize;
            let volume = state.geo.volume[i].expect("boundary-limited slot has a volume");
            match params.geometry().navigator.cross_boundary(
                &state.geo.pos[i],
                &state.geo.dir[i],
                volume,
            ) {
                Some(next) => {
                    state.geo.volume[i] = Some(next);
                    state.geo.instances[i] = params.geometry().truncated_chain(next);
                    state.material.mat[i] = Some(params.geo_material().material(next));
                    state.geo.on_boundary[i] = true;
                }
                None => {
                    state.sim.status[i] = TrackStatus::Killed;
                    state.diag.escaped += 1;
                }
            }
            Ok(())
        })
    }
}
