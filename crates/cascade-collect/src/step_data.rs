//! Collected step rows.

use cascade_core::math::Real3;
use cascade_core::{
    ActionId, DetectorId, EventId, InstanceChain, ParticleId, TrackId, VolumeId,
};

/// Attributes recorded at one step point. Unselected attributes are
/// `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepPointData {
    /// Position [cm].
    pub position: Option<Real3>,
    /// Unit direction.
    pub direction: Option<Real3>,
    /// Lab time [ns].
    pub time: Option<f64>,
    /// Kinetic energy [MeV].
    pub energy: Option<f64>,
    /// Volume id.
    pub volume: Option<VolumeId>,
    /// Volume-instance chain, truncated to the configured depth.
    pub instances: InstanceChain,
}

/// One collected step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectorStep {
    /// Detector of the step's volume; `None` when collecting all
    /// tracks.
    pub detector: Option<DetectorId>,
    /// Track identity.
    pub track_id: Option<TrackId>,
    /// Owning event.
    pub event_id: Option<EventId>,
    /// Producing track.
    pub parent_id: Option<TrackId>,
    /// Particle species.
    pub particle: Option<ParticleId>,
    /// The post-step action selected for the step.
    pub action: Option<ActionId>,
    /// Energy deposited over the step [MeV].
    pub energy_deposition: f64,
    /// Step length [cm].
    pub step_length: f64,
    /// Pre and post point attributes.
    pub points: [StepPointData; 2],
}

/// The rows gathered from one step of one stream.
#[derive(Clone, Debug, Default)]
pub struct DetectorStepBatch {
    /// Collected rows in slot order.
    pub steps: Vec<DetectorStep>,
}

impl DetectorStepBatch {
    /// Number of collected rows.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no rows were collected.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
