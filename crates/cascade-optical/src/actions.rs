//! Interaction kernels for the reduced optical action set.
//!
//! The nested optical stepper registers ordinary post-order actions
//! like the charged pipeline does; these two cover the minimum a
//! useful optical run needs. Reflectivity and surface-roughness models
//! plug in the same way.

use rand::Rng;

use cascade_core::{ActionError, ActionId, StepOrder, TrackStatus};
use cascade_action::{launch_post, StepAction};
use cascade_params::CoreParams;
use cascade_state::CoreState;

/// Sample an isotropic unit direction.
pub(crate) fn isotropic_direction(rng: &mut rand_chacha::ChaCha8Rng) -> cascade_core::Real3 {
    let cos_theta: f64 = 2.0 * rng.random::<f64>() - 1.0;
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let phi = 2.0 * std::f64::consts::PI * rng.random::<f64>();
    [sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta]
}

/// Absorbs an optical photon, depositing its energy locally.
pub struct OpticalAbsorptionAction {
    id: ActionId,
}

impl OpticalAbsorptionAction {
    /// Construct with the id the registry is about to assign.
    pub fn new(id: ActionId) -> Self {
        Self { id }
    }
}

impl StepAction for OpticalAbsorptionAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        "optical-absorption"
    }

    fn order(&self) -> StepOrder {
        StepOrder::Post
    }

    fn execute(&self, _params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError> {
        launch_post(state, self.id, |state, slot| {
            let i = slot.0 as usize;
            state.phys.eloss[i] += state.particle.energy[i];
            state.particle.energy[i] = 0.0;
            state.sim.status[i] = TrackStatus::Killed;
            Ok(())
        })
    }
}

/// Elastic Rayleigh scattering: redirect the photon, keep its energy.
pub struct OpticalRayleighAction {
    id: ActionId,
}

impl OpticalRayleighAction {
    /// Construct with the id the registry is about to assign.
    pub fn new(id: ActionId) -> Self {
        Self { id }
    }
}

impl StepAction for OpticalRayleighAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        "optical-rayleigh"
    }

    fn order(&self) -> StepOrder {
        StepOrder::Post
    }

    fn execute(&self, _params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError> {
        launch_post(state, self.id, |state, slot| {
            let i = slot.0 as usize;
            let CoreState { geo, rng, .. } = state;
            geo.dir[i] = isotropic_direction(&mut rng.engine[i]);
            Ok(())
        })
    }
}
