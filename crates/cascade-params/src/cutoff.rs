//! Tracking-cutoff table.

use cascade_core::{ParticleId, PhysMatId};

use crate::error::ParamsError;

/// Kinetic-energy tracking cutoffs per (particle, material) [MeV].
///
/// A track whose energy falls to or below its cutoff is cut: its
/// remaining energy is deposited locally and the slot is killed.
#[derive(Clone, Debug, Default)]
pub struct CutoffParams {
    num_materials: usize,
    /// Flattened `[particle][material]` cutoffs.
    cutoffs: Vec<f64>,
}

impl CutoffParams {
    /// Build from a flattened `[particle][material]` table.
    pub fn new(
        num_particles: usize,
        num_materials: usize,
        cutoffs: Vec<f64>,
    ) -> Result<Self, ParamsError> {
        if cutoffs.len() != num_particles * num_materials {
            return Err(ParamsError::Inconsistent {
                reason: format!(
                    "cutoff table has {} entries, expected {} x {}",
                    cutoffs.len(),
                    num_particles,
                    num_materials
                ),
            });
        }
        Ok(Self {
            num_materials,
            cutoffs,
        })
    }

    /// A uniform cutoff for every (particle, material) pair.
    pub fn uniform(num_particles: usize, num_materials: usize, cutoff: f64) -> Self {
        Self {
            num_materials,
            cutoffs: vec![cutoff; num_particles * num_materials],
        }
    }

    /// The cutoff for `particle` in `mat` [MeV].
    pub fn energy_cutoff(&self, particle: ParticleId, mat: PhysMatId) -> f64 {
        self.cutoffs[particle.0 as usize * self.num_materials + mat.0 as usize]
    }
}
