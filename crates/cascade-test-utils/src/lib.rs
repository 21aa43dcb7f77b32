//! Test utilities and mock types for Cascade development.
//!
//! Provides mock navigators, canned params/state builders, mock
//! interaction kernels, and a full-pipeline builder for integration
//! tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod navigators;
mod params;
mod pipeline;

pub use navigators::{OneBoxNavigator, SlabNavigator};
pub use params::{
    electron_primary, electron_primary_along_x, gamma_primary, minimal_params_and_state,
    minimal_params_and_state_sorted, minimal_state, slab_params_and_state, spawn_track,
    xslab_params_and_state,
};
pub use pipeline::{
    build_pipeline, FailingInteractAction, FieldSetup, MockInteractAction, MockInteractConfig,
    PipelineOptions, TestPipeline,
};
