//! Per-stream track-slot state for Cascade transport.
//!
//! A [`CoreState`] is the mutable half of the data model: one
//! fixed-capacity bank of track slots, stored slot-of-arrays, owned
//! exclusively by a single stream. Params are shared read-only; no two
//! streams ever share a state.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod aux_state;
pub mod counters;
pub mod error;
pub mod geo;
pub mod init;
pub mod offsets;
pub mod phys;
pub mod rng;
pub mod sim;

mod core_state;

pub use aux_state::AuxStateVec;
pub use core_state::CoreState;
pub use counters::{CoreStateCounters, DiagCounters};
pub use error::StateError;
pub use geo::{GeoStates, MaterialStates};
pub use init::{InitStates, InitializerBuffer};
pub use offsets::ActionOffsets;
pub use phys::PhysicsStates;
pub use rng::RngStates;
pub use sim::{ParticleStates, SimStates};
