//! Multiple-scattering interface.
//!
//! Concrete MSC models live outside the core; the along-step actions
//! consume this trait. The model may limit the step before propagation
//! and applies its angular deflection and lateral displacement after.

use rand::RngCore;

use cascade_core::math::Real3;
use cascade_core::PhysMatId;

/// Inputs for sampling a scattering deflection.
#[derive(Clone, Copy, Debug)]
pub struct MscStep {
    /// Kinetic energy at the start of the step [MeV].
    pub energy: f64,
    /// Material the step occurred in.
    pub material: PhysMatId,
    /// Geometric step length [cm].
    pub step_length: f64,
    /// Direction at the end of propagation.
    pub direction: Real3,
}

/// A sampled deflection: the new direction and a lateral displacement.
#[derive(Clone, Copy, Debug)]
pub struct MscSample {
    /// New unit direction.
    pub direction: Real3,
    /// Lateral displacement to add to the position [cm].
    pub displacement: Real3,
}

/// A multiple-Coulomb-scattering model.
pub trait MscModel: Send + Sync {
    /// Model name for diagnostics.
    fn label(&self) -> &str;

    /// Limit the step before propagation [cm].
    ///
    /// `cached_range` is the per-slot range cache: models that derive
    /// their limit from a range may read and update it to avoid
    /// recomputing every step. Return `f64::INFINITY` for no limit.
    fn step_limit(
        &self,
        energy: f64,
        material: PhysMatId,
        cached_range: &mut Option<f64>,
        rng: &mut dyn RngCore,
    ) -> f64;

    /// Sample the deflection for a completed step.
    fn apply(&self, step: &MscStep, rng: &mut dyn RngCore) -> MscSample;
}
