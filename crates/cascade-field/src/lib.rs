//! Magnetic-field propagation for Cascade transport.
//!
//! A field source maps position to field vector; the driver integrates
//! the equation of motion with an embedded Dormand–Prince 4(5) pair
//! under relative-error and chord-sagitta control; the propagator
//! couples the driver to the geometry so a curved step never crosses a
//! volume surface unnoticed.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod driver;
pub mod error;
pub mod field;
pub mod options;
pub mod propagator;
pub mod rk;

pub use driver::{DriverResult, FieldDriver};
pub use error::FieldError;
pub use field::{FieldSource, RZMapField, UniformField};
pub use options::FieldDriverOptions;
pub use propagator::{FieldPropagator, Propagation};
pub use rk::OdeState;
