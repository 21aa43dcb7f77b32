//! The step-data callback interface.

use indexmap::IndexMap;

use cascade_core::{DetectorId, VolumeId};

use crate::selection::StepSelection;
use crate::step_data::DetectorStepBatch;

/// Mapping from logical volume to sensitive detector.
pub type DetectorMap = IndexMap<VolumeId, DetectorId>;

/// A consumer of collected step data.
///
/// Interfaces declare what they need up front; the collector merges
/// the declarations of all interfaces sharing a stream and delivers
/// one batch per step. `process` takes `&self`: implementations that
/// accumulate use interior mutability, since the same interface may be
/// shared by several streams.
pub trait StepInterface: Send + Sync {
    /// The attributes this interface needs recorded.
    fn selection(&self) -> StepSelection;

    /// Volumes this interface treats as detectors.
    ///
    /// `None` collects every track everywhere.
    fn detector_map(&self) -> Option<&DetectorMap> {
        None
    }

    /// Skip steps that deposited no energy.
    ///
    /// The filter only applies when every interface on the collector
    /// requests it, so no interface silently loses rows.
    fn nonzero_energy_deposition(&self) -> bool {
        false
    }

    /// Receive the rows gathered from one step.
    fn process(&self, batch: &DetectorStepBatch);
}
