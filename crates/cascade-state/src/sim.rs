//! Simulation-bookkeeping and particle slot arrays.

use cascade_core::{ActionId, EventId, ParticleId, PrimaryId, TrackId, TrackSlotId, TrackStatus};

/// Per-slot simulation bookkeeping, stored slot-of-arrays.
///
/// Every vector has the bank capacity as its length. Id fields are
/// `None` on inactive slots.
#[derive(Clone, Debug)]
pub struct SimStates {
    /// Occupancy status.
    pub status: Vec<TrackStatus>,
    /// Track identity, unique within the owning event.
    pub track_id: Vec<Option<TrackId>>,
    /// Producing track, `None` for primaries.
    pub parent_id: Vec<Option<TrackId>>,
    /// Owning event.
    pub event_id: Vec<Option<EventId>>,
    /// Originating primary, when the track is one.
    pub primary_id: Vec<Option<PrimaryId>>,
    /// Steps taken by the occupying track.
    pub step_count: Vec<u32>,
    /// Lab time [ns].
    pub time: Vec<f64>,
    /// Length of the current step [cm].
    pub step_length: Vec<f64>,
    /// Statistical weight.
    pub weight: Vec<f64>,
    /// Along-step action selected for the occupying track.
    pub along_step_action: Vec<Option<ActionId>>,
    /// Next discrete action selected this step.
    pub post_step_action: Vec<Option<ActionId>>,
    /// Consecutive zero-progress along-step iterations.
    pub num_looping_steps: Vec<u32>,
}

impl SimStates {
    /// Allocate for a bank of `capacity` slots, all inactive.
    pub fn new(capacity: usize) -> Self {
        Self {
            status: vec![TrackStatus::Inactive; capacity],
            track_id: vec![None; capacity],
            parent_id: vec![None; capacity],
            event_id: vec![None; capacity],
            primary_id: vec![None; capacity],
            step_count: vec![0; capacity],
            time: vec![0.0; capacity],
            step_length: vec![0.0; capacity],
            weight: vec![0.0; capacity],
            along_step_action: vec![None; capacity],
            post_step_action: vec![None; capacity],
            num_looping_steps: vec![0; capacity],
        }
    }

    /// Whether a slot currently holds a track (any non-inactive status).
    pub fn is_occupied(&self, slot: TrackSlotId) -> bool {
        self.status[slot.0 as usize] != TrackStatus::Inactive
    }

    /// Clear one slot back to the inactive state.
    pub fn clear_slot(&mut self, slot: TrackSlotId) {
        let i = slot.0 as usize;
        self.status[i] = TrackStatus::Inactive;
        self.track_id[i] = None;
        self.parent_id[i] = None;
        self.event_id[i] = None;
        self.primary_id[i] = None;
        self.step_count[i] = 0;
        self.time[i] = 0.0;
        self.step_length[i] = 0.0;
        self.weight[i] = 0.0;
        self.along_step_action[i] = None;
        self.post_step_action[i] = None;
        self.num_looping_steps[i] = 0;
    }
}

/// Per-slot particle arrays.
#[derive(Clone, Debug)]
pub struct ParticleStates {
    /// Species of the occupying track.
    pub particle_id: Vec<Option<ParticleId>>,
    /// Kinetic energy [MeV].
    pub energy: Vec<f64>,
}

impl ParticleStates {
    /// Allocate for a bank of `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            particle_id: vec![None; capacity],
            energy: vec![0.0; capacity],
        }
    }

    /// Clear one slot.
    pub fn clear_slot(&mut self, slot: TrackSlotId) {
        let i = slot.0 as usize;
        self.particle_id[i] = None;
        self.energy[i] = 0.0;
    }
}
