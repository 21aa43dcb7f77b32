//! Track records and lifecycle enums.

use smallvec::SmallVec;

use crate::id::{EventId, ParticleId, PrimaryId, TrackId, TrackSlotId, VolumeId};
use crate::math::Real3;
use crate::InstanceChain;

/// Occupancy state of a track slot.
///
/// The lifecycle is: `Inactive → Alive` when an initializer is
/// consumed; `Alive → Killed` on absorption, cutoff, or escape;
/// `Alive → Errored` when a per-track contract is violated (e.g. field
/// propagation made no progress); `Killed`/`Errored → Inactive` when
/// the slot is cleared and appended to the vacancy list at the end of
/// the step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TrackStatus {
    /// No track occupies the slot; it is listed as a vacancy.
    #[default]
    Inactive,
    /// A track occupies the slot and is being transported.
    Alive,
    /// The track ended this step; the slot is recycled at step end.
    Killed,
    /// The track failed this step; the slot is recycled at step end.
    Errored,
}

/// Why a track was cut (killed by the core rather than by physics).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CutReason {
    /// Energy fell below the per-(particle, material) tracking cutoff.
    EnergyCutoff,
    /// The track left the outermost volume.
    Escaped,
    /// The looping watchdog fired after consecutive zero-progress steps.
    Looping,
    /// Field propagation failed to change the position.
    FieldFailure,
    /// A user-configured cut.
    UserCut,
}

/// Position of the actions within one step of the pipeline.
///
/// The pipeline executes orders strictly in the sequence below; within
/// one order, actions run in registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepOrder {
    /// Once per run, before the first step.
    BeginRun,
    /// Slot refill and step-scratch reset.
    PreStep,
    /// Continuous propagation (field, MSC, energy loss).
    Along,
    /// Selection of the discrete interaction, partitioning.
    PrePost,
    /// Discrete interactions, boundary crossing, tracking cuts.
    Post,
    /// Secondary extension, bookkeeping, state checks.
    PostPost,
    /// Once per run, after the last step.
    EndRun,
}

/// One of the two recorded step endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepPoint {
    /// State at the start of the step.
    Pre,
    /// State at the end of the step.
    Post,
}

impl StepPoint {
    /// Index into per-point arrays.
    pub fn index(self) -> usize {
        match self {
            StepPoint::Pre => 0,
            StepPoint::Post => 1,
        }
    }
}

/// Slot traversal order for the per-action executors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrackOrder {
    /// Slots are visited in bank order.
    #[default]
    Unsorted,
    /// Slots are partitioned by their next discrete action each step.
    PartitionByAction,
}

/// A user-supplied track source: the only input path into the engine.
///
/// Wire-compatible for save/restore: plain scalars and fixed arrays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primary {
    /// Event this primary belongs to.
    pub event_id: EventId,
    /// Particle species.
    pub particle_id: ParticleId,
    /// Kinetic energy [MeV].
    pub energy: f64,
    /// Starting position [cm].
    pub position: Real3,
    /// Unit starting direction.
    pub direction: Real3,
    /// Starting time [ns].
    pub time: f64,
}

/// A track produced by a discrete interaction this step.
///
/// Secondaries inherit the producing track's position and time; the
/// record carries only what the interaction sampled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Secondary {
    /// Particle species.
    pub particle_id: ParticleId,
    /// Kinetic energy [MeV].
    pub energy: f64,
    /// Unit direction.
    pub direction: Real3,
    /// Statistical weight.
    pub weight: f64,
}

/// A deferred track-creation record pending slot assignment.
///
/// The `geo_parent` back-reference is valid only within the step that
/// produced the secondary; buffered records therefore also snapshot
/// the parent's volume and instance chain at creation time, so a
/// record consumed in a later step never re-navigates from scratch
/// unless it has no geometry at all (primaries).
#[derive(Clone, Debug, PartialEq)]
pub struct Initializer {
    /// Particle species.
    pub particle_id: ParticleId,
    /// Kinetic energy [MeV].
    pub energy: f64,
    /// Starting position [cm].
    pub position: Real3,
    /// Unit starting direction.
    pub direction: Real3,
    /// Starting time [ns].
    pub time: f64,
    /// Statistical weight.
    pub weight: f64,
    /// Owning event.
    pub event_id: EventId,
    /// Identity assigned at creation; unique within the event.
    pub track_id: TrackId,
    /// Producing track, if any.
    pub parent_id: Option<TrackId>,
    /// Originating primary, for primaries only.
    pub primary_id: Option<PrimaryId>,
    /// Slot of the producing track, valid only in the producing step.
    pub geo_parent: Option<TrackSlotId>,
    /// Snapshot of the creation volume, if known.
    pub volume: Option<VolumeId>,
    /// Snapshot of the creation volume-instance chain.
    pub instances: InstanceChain,
}

impl Initializer {
    /// Build an initializer from a primary record.
    ///
    /// The geometry fields are left unassigned; the volume is located
    /// by navigation when the record is materialized into a slot.
    pub fn from_primary(primary: &Primary, track_id: TrackId, primary_id: PrimaryId) -> Self {
        Self {
            particle_id: primary.particle_id,
            energy: primary.energy,
            position: primary.position,
            direction: primary.direction,
            time: primary.time,
            weight: 1.0,
            event_id: primary.event_id,
            track_id,
            parent_id: None,
            primary_id: Some(primary_id),
            geo_parent: None,
            volume: None,
            instances: SmallVec::new(),
        }
    }
}
