//! Optical-photon offload pipeline for Cascade transport.
//!
//! Charged steps can source large numbers of optical photons
//! (Cherenkov, scintillation). Rather than tracking them inline, the
//! offload pipeline buffers compact generator distributions per stream
//! and, when enough photons are queued, runs them through a nested
//! optical stepper built from the same engine machinery with a reduced
//! action set.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod actions;
pub mod buffer;
pub mod distribution;
pub mod generator;
pub mod offload;

pub use actions::{OpticalAbsorptionAction, OpticalRayleighAction};
pub use buffer::OffloadBuffer;
pub use distribution::{GeneratorDistribution, GeneratorKind, StepPointRecord};
pub use generator::{ChargedStep, OpticalGenerator};
pub use offload::{OffloadCounters, OffloadOptions, OffloadSetup, OpticalOffload};
