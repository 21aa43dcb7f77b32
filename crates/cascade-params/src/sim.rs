//! Simulation control, RNG, and track-initialization parameters.

use cascade_core::TrackOrder;

/// Engine-level stepping controls.
#[derive(Clone, Debug)]
pub struct SimParams {
    /// Max consecutive zero-progress along-step iterations before a
    /// looping track is cut.
    pub looping_threshold: u32,
    /// Cap on step iterations in a single `run()` call.
    pub max_substeps: u32,
    /// Slot traversal order for the per-action executors.
    pub track_order: TrackOrder,
    /// Over-allocation ratio for the per-step secondary scratch.
    pub secondary_stack_factor: f64,
    /// Run the end-of-pipeline state consistency check every step.
    pub status_check: bool,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            looping_threshold: 256,
            max_substeps: 4096,
            track_order: TrackOrder::Unsorted,
            secondary_stack_factor: 3.0,
            status_check: false,
        }
    }
}

/// Random-number engine parameters.
#[derive(Clone, Copy, Debug)]
pub struct RngParams {
    /// Global seed; every track derives its own engine state from
    /// `(seed, event id, track id)`.
    pub seed: u64,
}

impl Default for RngParams {
    fn default() -> Self {
        Self { seed: 20220904 }
    }
}

/// Track-initialization defaults.
#[derive(Clone, Copy, Debug)]
pub struct TrackInitParams {
    /// Default initializer-buffer capacity per stream.
    pub capacity: usize,
    /// Default track-slot count per stream.
    pub tracks_per_stream: usize,
}

impl Default for TrackInitParams {
    fn default() -> Self {
        Self {
            capacity: 1 << 16,
            tracks_per_stream: 1 << 12,
        }
    }
}
