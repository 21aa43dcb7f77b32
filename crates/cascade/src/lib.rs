//! Cascade: a data-parallel track-slot stepping engine for
//! electromagnetic shower transport.
//!
//! This is the top-level facade crate re-exporting the public API of
//! the Cascade sub-crates. For most users, adding `cascade` as a
//! single dependency is sufficient.
//!
//! # Architecture
//!
//! Transport runs over a fixed-capacity bank of track slots, one bank
//! per stream. Each step executes an ordered pipeline of actions:
//! slot refill and pre-step sampling, the along-step (propagation,
//! MSC, continuous energy loss), interaction selection, the discrete
//! interaction kernels, boundary crossing and tracking cuts, then
//! secondary extension and bookkeeping. Secondaries either reuse
//! freshly vacated slots or wait in a bounded initializer buffer.
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `cascade-core` | Ids, records, errors, math |
//! | [`params`] | `cascade-params` | Problem description tables |
//! | [`state`] | `cascade-state` | Per-stream slot bank |
//! | [`action`] | `cascade-action` | Action trait and registry |
//! | [`track`] | `cascade-track` | Lifecycle actions |
//! | [`field`] | `cascade-field` | Field propagation |
//! | [`alongstep`] | `cascade-alongstep` | Along-step actions |
//! | [`optical`] | `cascade-optical` | Optical offload pipeline |
//! | [`collect`] | `cascade-collect` | Step collection |
//! | [`engine`] | `cascade-engine` | Pipeline and stepper |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types: ids, records, errors, math helpers.
pub mod types {
    pub use cascade_core::*;
}

/// Immutable problem description tables.
pub mod params {
    pub use cascade_params::*;
}

/// Per-stream track-slot state.
pub mod state {
    pub use cascade_state::*;
}

/// The step-action trait and registry.
pub mod action {
    pub use cascade_action::*;
}

/// Track lifecycle actions.
pub mod track {
    pub use cascade_track::*;
}

/// Magnetic-field propagation.
pub mod field {
    pub use cascade_field::*;
}

/// Along-step actions.
pub mod alongstep {
    pub use cascade_alongstep::*;
}

/// Optical-photon offload.
pub mod optical {
    pub use cascade_optical::*;
}

/// Per-step attribute collection.
pub mod collect {
    pub use cascade_collect::*;
}

/// The step pipeline and stepper API.
pub mod engine {
    pub use cascade_engine::*;
}

/// The types most users need.
pub mod prelude {
    pub use cascade_action::{ActionRegistry, StepAction};
    pub use cascade_core::{
        ActionId, EventId, ParticleId, Primary, StepError, StepOrder, StreamId, TrackSlotId,
        TrackStatus,
    };
    pub use cascade_engine::{RunResult, StepCounters, Stepper, StepperInput};
    pub use cascade_params::{CoreParams, CoreParamsData};
    pub use cascade_state::CoreState;
}
