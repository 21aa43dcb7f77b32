//! The assembled core params.

use std::fmt;

use cascade_core::ParticleId;

use crate::aux::AuxRegistry;
use crate::cutoff::CutoffParams;
use crate::error::ParamsError;
use crate::geometry::GeometryParams;
use crate::material::{GeoMaterialParams, MaterialParams};
use crate::particle::ParticleParams;
use crate::physics::PhysicsParams;
use crate::scalars::CoreScalars;
use crate::sim::{RngParams, SimParams, TrackInitParams};
use crate::store::ParamsStore;

/// The immutable problem description: every sub-table in one struct.
///
/// Built by the problem setup code, validated once, then frozen inside
/// a [`CoreParams`]. Field order mirrors the sub-table list of the
/// data model.
#[derive(Clone)]
pub struct CoreParamsData {
    /// Geometry navigator and recording limits.
    pub geometry: GeometryParams,
    /// Volume → material mapping.
    pub geo_material: GeoMaterialParams,
    /// Material table.
    pub materials: MaterialParams,
    /// Particle species table.
    pub particles: ParticleParams,
    /// Discrete-process and continuous-loss tables.
    pub physics: PhysicsParams,
    /// Tracking cutoffs.
    pub cutoffs: CutoffParams,
    /// RNG seeding.
    pub rng: RngParams,
    /// Stepping controls.
    pub sim: SimParams,
    /// Track-initialization defaults.
    pub init: TrackInitParams,
    /// Core action ids and stream limits.
    pub scalars: CoreScalars,
    /// Auxiliary per-stream state factories.
    pub aux: AuxRegistry,
}

impl CoreParamsData {
    /// Check cross-table consistency.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.particles.is_empty() {
            return Err(ParamsError::Inconsistent {
                reason: "no particle species defined".into(),
            });
        }
        if self.materials.is_empty() {
            return Err(ParamsError::Inconsistent {
                reason: "no materials defined".into(),
            });
        }
        if self.geometry.num_volumes() == 0 {
            return Err(ParamsError::Inconsistent {
                reason: "geometry has no volumes".into(),
            });
        }
        if self.geometry.volume_instance_depth == 0 {
            return Err(ParamsError::Inconsistent {
                reason: "volume_instance_depth must be at least 1".into(),
            });
        }
        if self.geo_material.volume_to_material.len() != self.geometry.num_volumes() {
            return Err(ParamsError::Inconsistent {
                reason: format!(
                    "geo-material map covers {} volumes but the geometry has {}",
                    self.geo_material.volume_to_material.len(),
                    self.geometry.num_volumes()
                ),
            });
        }
        if let Some(&bad) = self
            .geo_material
            .volume_to_material
            .values()
            .find(|m| m.0 as usize >= self.materials.len())
        {
            return Err(ParamsError::Inconsistent {
                reason: format!("geo-material map references undefined material {bad}"),
            });
        }
        self.physics
            .validate(self.particles.len(), self.materials.len())?;
        if !(self.sim.secondary_stack_factor >= 1.0 && self.sim.secondary_stack_factor.is_finite())
        {
            return Err(ParamsError::Inconsistent {
                reason: format!(
                    "secondary_stack_factor must be finite and >= 1, got {}",
                    self.sim.secondary_stack_factor
                ),
            });
        }
        if let Some(field) = self.scalars.first_unassigned() {
            return Err(ParamsError::Inconsistent {
                reason: format!("core scalar '{field}' is unassigned"),
            });
        }
        Ok(())
    }

    /// Number of discrete processes for one species.
    pub fn num_processes(&self, particle: ParticleId) -> usize {
        self.physics.processes(particle).len()
    }
}

impl fmt::Debug for CoreParamsData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreParamsData")
            .field("num_volumes", &self.geometry.num_volumes())
            .field("num_materials", &self.materials.len())
            .field("num_particles", &self.particles.len())
            .field("max_streams", &self.scalars.max_streams)
            .finish()
    }
}

/// Validated, frozen core params with host/device mirroring.
///
/// All accessors return host-space references; the device-space view
/// is explicit via [`device_ref`](CoreParams::device_ref).
#[derive(Clone, Debug)]
pub struct CoreParams {
    store: ParamsStore<CoreParamsData>,
}

impl CoreParams {
    /// Validate and freeze `data`.
    pub fn new(data: CoreParamsData) -> Result<Self, ParamsError> {
        data.validate()?;
        Ok(Self {
            store: ParamsStore::new(data),
        })
    }

    /// The host-space view of every table.
    pub fn host_ref(&self) -> &CoreParamsData {
        self.store.host_ref()
    }

    /// The device-space view, when a device context was active.
    pub fn device_ref(&self) -> Result<&CoreParamsData, ParamsError> {
        self.store.device_ref()
    }

    /// Geometry navigator and recording limits.
    pub fn geometry(&self) -> &GeometryParams {
        &self.host_ref().geometry
    }

    /// Volume → material mapping.
    pub fn geo_material(&self) -> &GeoMaterialParams {
        &self.host_ref().geo_material
    }

    /// Material table.
    pub fn materials(&self) -> &MaterialParams {
        &self.host_ref().materials
    }

    /// Particle species table.
    pub fn particles(&self) -> &ParticleParams {
        &self.host_ref().particles
    }

    /// Physics tables.
    pub fn physics(&self) -> &PhysicsParams {
        &self.host_ref().physics
    }

    /// Tracking cutoffs.
    pub fn cutoffs(&self) -> &CutoffParams {
        &self.host_ref().cutoffs
    }

    /// RNG seeding.
    pub fn rng(&self) -> &RngParams {
        &self.host_ref().rng
    }

    /// Stepping controls.
    pub fn sim(&self) -> &SimParams {
        &self.host_ref().sim
    }

    /// Track-initialization defaults.
    pub fn init(&self) -> &TrackInitParams {
        &self.host_ref().init
    }

    /// Core action ids and stream limits.
    pub fn scalars(&self) -> &CoreScalars {
        &self.host_ref().scalars
    }

    /// Auxiliary state factories.
    pub fn aux(&self) -> &AuxRegistry {
        &self.host_ref().aux
    }
}
