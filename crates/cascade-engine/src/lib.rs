//! Step pipeline and stepper API for Cascade transport.
//!
//! The engine owns the per-step machinery: the core pipeline actions
//! (slot refill, pre-step sampling, interaction selection, boundary
//! crossing, tracking cuts), the strict action ordering, and the
//! caller-facing [`Stepper`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod actions;
pub mod config;
pub mod hook;
pub mod metrics;
pub mod stepper;

pub use config::{ConfigError, StepperInput};
pub use hook::StepHook;
pub use metrics::StepMetrics;
pub use stepper::{RunResult, StepCounters, Stepper};
