//! Per-step attribute collection for Cascade transport.
//!
//! A step collector gathers a user-selected set of attributes at the
//! pre and post points of every step taken inside detector volumes and
//! delivers them, batched per step, to callback interfaces. With no
//! detector map configured, every track is recorded.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod collector;
pub mod interface;
pub mod selection;
pub mod step_data;

pub use collector::{CollectError, StepCollector};
pub use interface::{DetectorMap, StepInterface};
pub use selection::{StepPointSelection, StepSelection};
pub use step_data::{DetectorStep, DetectorStepBatch, StepPointData};
