//! The generator-model interface.

use rand::RngCore;

use cascade_core::math::Real3;
use cascade_core::{EventId, ParticleId, PhysMatId};

use crate::distribution::GeneratorDistribution;

/// The charged-step attributes a generator model samples from.
///
/// Assembled by the offload gather action at the end of each step,
/// before vacated slots are recycled.
#[derive(Clone, Copy, Debug)]
pub struct ChargedStep {
    /// Generating species.
    pub particle: ParticleId,
    /// Charge [e]; never zero.
    pub charge: f64,
    /// Material the step occurred in.
    pub material: PhysMatId,
    /// Owning event.
    pub event_id: EventId,
    /// Position at the step start [cm].
    pub pre_pos: Real3,
    /// Position at the step end [cm].
    pub post_pos: Real3,
    /// Time at the step start [ns].
    pub pre_time: f64,
    /// Time at the step end [ns].
    pub post_time: f64,
    /// Step length [cm].
    pub step_length: f64,
    /// Energy deposited over the step [MeV].
    pub energy_deposition: f64,
}

/// A photon-source model (Cherenkov, scintillation).
///
/// Implementations decide whether a charged step emits and how many
/// photons; the offload machinery owns buffering and the nested
/// stepping. Models live outside the core.
pub trait OpticalGenerator: Send + Sync {
    /// Model name for diagnostics.
    fn label(&self) -> &str;

    /// Sample a distribution for one charged step, or `None` when the
    /// step does not emit.
    fn sample(&self, step: &ChargedStep, rng: &mut dyn RngCore) -> Option<GeneratorDistribution>;
}
