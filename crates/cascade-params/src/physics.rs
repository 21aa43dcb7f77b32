//! Physics process tables.
//!
//! The engine does not compute cross sections; it consumes tabulated
//! macroscopic values supplied by the problem builder. Each discrete
//! process records the action id of its interaction kernel, which is
//! how the discrete-select step maps a sampled process onto the
//! pipeline.

use cascade_core::{ActionId, ItemMap, ParticleId, PhysMatId, ProcessId};

use crate::error::ParamsError;

/// One discrete process attached to a particle species.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessDef {
    /// Human-readable name, e.g. `"compton"`.
    pub label: String,
    /// Action implementing the interaction kernel.
    pub action: ActionId,
    /// Macroscopic cross section per material [1/cm].
    pub macro_xs: Vec<f64>,
}

/// Per-species physics: discrete processes plus continuous-loss tables.
#[derive(Clone, Debug, Default)]
pub struct ParticlePhysics {
    /// Discrete processes in registration order.
    pub processes: ItemMap<ProcessId, ProcessDef>,
    /// Stopping power per material [MeV/cm]; empty for neutral species.
    pub dedx: Vec<f64>,
}

/// The physics table, indexed by particle species.
#[derive(Clone, Debug, Default)]
pub struct PhysicsParams {
    /// Physics per species, aligned with the particle table.
    pub per_particle: ItemMap<ParticleId, ParticlePhysics>,
}

impl PhysicsParams {
    /// The processes registered for a species.
    pub fn processes(&self, particle: ParticleId) -> &ItemMap<ProcessId, ProcessDef> {
        &self.per_particle[particle].processes
    }

    /// Macroscopic cross section [1/cm] for one process in `mat`.
    pub fn macro_xs(&self, particle: ParticleId, process: ProcessId, mat: PhysMatId) -> f64 {
        self.per_particle[particle].processes[process].macro_xs[mat.0 as usize]
    }

    /// Stopping power [MeV/cm], zero when the species has no loss table.
    pub fn dedx(&self, particle: ParticleId, mat: PhysMatId) -> f64 {
        let p = &self.per_particle[particle];
        p.dedx.get(mat.0 as usize).copied().unwrap_or(0.0)
    }

    /// Remaining range [cm] for kinetic energy `energy`, from the
    /// constant stopping power. Infinite for species without a loss
    /// table.
    pub fn range(&self, particle: ParticleId, mat: PhysMatId, energy: f64) -> f64 {
        let dedx = self.dedx(particle, mat);
        if dedx > 0.0 {
            energy / dedx
        } else {
            f64::INFINITY
        }
    }

    /// Validate table shapes against the particle and material counts.
    pub fn validate(&self, num_particles: usize, num_materials: usize) -> Result<(), ParamsError> {
        if self.per_particle.len() != num_particles {
            return Err(ParamsError::Inconsistent {
                reason: format!(
                    "physics table covers {} species but {} are defined",
                    self.per_particle.len(),
                    num_particles
                ),
            });
        }
        for (pid, phys) in self.per_particle.iter() {
            for (_, proc) in phys.processes.iter() {
                if proc.macro_xs.len() != num_materials {
                    return Err(ParamsError::Inconsistent {
                        reason: format!(
                            "process '{}' of particle {pid} tabulates {} materials, expected {}",
                            proc.label,
                            proc.macro_xs.len(),
                            num_materials
                        ),
                    });
                }
                if proc.macro_xs.iter().any(|&xs| !xs.is_finite() || xs < 0.0) {
                    return Err(ParamsError::Inconsistent {
                        reason: format!(
                            "process '{}' of particle {pid} has a non-finite or negative \
                             cross section",
                            proc.label
                        ),
                    });
                }
            }
            if !phys.dedx.is_empty() && phys.dedx.len() != num_materials {
                return Err(ParamsError::Inconsistent {
                    reason: format!(
                        "dedx table of particle {pid} tabulates {} materials, expected {}",
                        phys.dedx.len(),
                        num_materials
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_process_physics() -> PhysicsParams {
        PhysicsParams {
            per_particle: [ParticlePhysics {
                processes: [ProcessDef {
                    label: "absorb".into(),
                    action: ActionId(5),
                    macro_xs: vec![0.1, 0.2],
                }]
                .into_iter()
                .collect(),
                dedx: vec![],
            }]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn xs_lookup() {
        let phys = one_process_physics();
        assert_eq!(
            phys.macro_xs(ParticleId(0), ProcessId(0), PhysMatId(1)),
            0.2
        );
    }

    #[test]
    fn neutral_dedx_is_zero() {
        let phys = one_process_physics();
        assert_eq!(phys.dedx(ParticleId(0), PhysMatId(0)), 0.0);
        assert_eq!(
            phys.range(ParticleId(0), PhysMatId(0), 1.0),
            f64::INFINITY
        );
    }

    #[test]
    fn validate_rejects_wrong_material_count() {
        let phys = one_process_physics();
        assert!(phys.validate(1, 2).is_ok());
        assert!(phys.validate(1, 3).is_err());
        assert!(phys.validate(2, 2).is_err());
    }
}
