//! Immutable problem description tables for Cascade transport.
//!
//! Params are the read-many half of the data model: built once before
//! a run, shared read-only by every stream, and mirrored to the device
//! memory space when a device context is active. All mutable per-track
//! data lives in `cascade-state`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod aux;
pub mod cutoff;
pub mod device;
pub mod error;
pub mod geometry;
pub mod material;
pub mod particle;
pub mod physics;
pub mod scalars;
pub mod sim;
pub mod store;

mod core_params;

pub use aux::{AuxParams, AuxRegistry};
pub use core_params::{CoreParams, CoreParamsData};
pub use cutoff::CutoffParams;
pub use error::ParamsError;
pub use geometry::{GeometryParams, Navigator};
pub use material::{GeoMaterialParams, MaterialDef, MaterialParams};
pub use particle::{ParticleDef, ParticleParams};
pub use physics::{ParticlePhysics, PhysicsParams, ProcessDef};
pub use scalars::CoreScalars;
pub use sim::{RngParams, SimParams, TrackInitParams};
pub use store::ParamsStore;
