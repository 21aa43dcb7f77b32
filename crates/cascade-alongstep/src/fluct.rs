//! Energy-loss-fluctuation interface.

use rand::RngCore;

use cascade_core::PhysMatId;

/// Samples the energy lost over a step around its mean.
///
/// Concrete straggling models live outside the core. Implementations
/// must return a non-negative loss; the along-step action clamps the
/// result to the track's kinetic energy.
pub trait FluctuationModel: Send + Sync {
    /// Model name for diagnostics.
    fn label(&self) -> &str;

    /// Sample the actual loss for a step with `mean_loss` [MeV].
    fn sample(&self, mean_loss: f64, energy: f64, material: PhysMatId, rng: &mut dyn RngCore)
        -> f64;
}
