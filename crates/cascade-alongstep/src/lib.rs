//! Along-step actions for Cascade transport.
//!
//! The along-step phase handles everything continuous between two
//! discrete interactions: propagation (straight or through a magnetic
//! field), multiple scattering, continuous energy loss, and the
//! looping-track watchdog. Exactly one charged and one neutral
//! along-step action are installed per stream, chosen at build time.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod fluct;
pub mod linear;
pub mod msc;
pub mod neutral;
pub mod uniform;

mod common;

pub use fluct::FluctuationModel;
pub use linear::AlongStepGeneralLinearAction;
pub use msc::{MscModel, MscSample, MscStep};
pub use neutral::AlongStepNeutralAction;
pub use uniform::{
    AlongStepFieldMscAction, AlongStepRZMapFieldAction, AlongStepUniformFieldAction,
};
