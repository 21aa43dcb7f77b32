//! Generator distributions: compact photon-source records.

use cascade_core::math::Real3;
use cascade_core::{EventId, PhysMatId};

/// Which physical process sourced the photons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    /// Cherenkov radiation from a fast charged track.
    Cherenkov,
    /// Scintillation light from deposited energy.
    Scintillation,
}

/// One end of the generating charged step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepPointRecord {
    /// Position [cm].
    pub pos: Real3,
    /// Lab time [ns].
    pub time: f64,
}

/// A compact description of a photon source: one charged step that
/// will emit `num_photons` optical photons when the buffer flushes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneratorDistribution {
    /// Sourcing process.
    pub kind: GeneratorKind,
    /// Step start point.
    pub pre: StepPointRecord,
    /// Step end point.
    pub post: StepPointRecord,
    /// Step length [cm].
    pub step_length: f64,
    /// Charge of the generating track [e].
    pub charge: f64,
    /// Material the step occurred in.
    pub material: PhysMatId,
    /// Event of the generating track.
    pub event_id: EventId,
    /// Photons this distribution will emit.
    pub num_photons: u32,
    /// Photon kinetic energy [MeV].
    pub photon_energy: f64,
}
