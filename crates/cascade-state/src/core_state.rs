//! The assembled per-stream state.

use std::ops::Range;

use cascade_core::{ActionId, TrackOrder, TrackSlotId, TrackStatus};
use cascade_params::CoreParams;

use crate::aux_state::AuxStateVec;
use crate::counters::{CoreStateCounters, DiagCounters};
use crate::geo::{GeoStates, MaterialStates};
use crate::init::InitStates;
use crate::offsets::ActionOffsets;
use crate::phys::PhysicsStates;
use crate::rng::RngStates;
use crate::sim::{ParticleStates, SimStates};

/// All mutable state for one stream: a fixed-capacity slot bank stored
/// slot-of-arrays, plus the initializer buffer and bookkeeping.
///
/// Construction establishes the fresh invariant: every slot inactive,
/// the vacancy list holding every slot index in ascending order, and
/// counters zeroed. [`reset()`](CoreState::reset) restores exactly
/// that state. The state holds no reference to its params; callers
/// pass params alongside the state wherever both are needed.
#[derive(Debug)]
pub struct CoreState {
    /// Owning stream.
    pub stream_id: cascade_core::StreamId,
    /// Simulation bookkeeping arrays.
    pub sim: SimStates,
    /// Particle arrays.
    pub particle: ParticleStates,
    /// Geometry arrays.
    pub geo: GeoStates,
    /// Material arrays.
    pub material: MaterialStates,
    /// Physics arrays.
    pub phys: PhysicsStates,
    /// RNG engine states.
    pub rng: RngStates,
    /// Vacancies, initializer buffer, id issuance.
    pub init: InitStates,
    /// Slot indirection: executors visit `track_slots[thread]`.
    pub track_slots: Vec<TrackSlotId>,
    /// Action → thread-range table, present when sorting is enabled.
    pub offsets: Option<ActionOffsets>,
    /// Auxiliary per-stream states.
    pub aux: AuxStateVec,
    /// Slot-accounting counters, refreshed every step.
    pub counters: CoreStateCounters,
    /// Cumulative diagnostics.
    pub diag: DiagCounters,
    warming_up: bool,
    seed: u64,
    num_actions: usize,
}

impl CoreState {
    /// Construct for one stream.
    ///
    /// `num_actions` bounds the action ids that can appear in slots and
    /// sizes the offsets table when the params request sorted order.
    pub fn new(
        params: &CoreParams,
        stream_id: cascade_core::StreamId,
        num_track_slots: usize,
        initializer_capacity: usize,
        num_actions: usize,
    ) -> Self {
        let seed = params.rng().seed;
        let offsets = match params.sim().track_order {
            TrackOrder::Unsorted => None,
            TrackOrder::PartitionByAction => Some(ActionOffsets::new(num_actions)),
        };
        Self {
            stream_id,
            sim: SimStates::new(num_track_slots),
            particle: ParticleStates::new(num_track_slots),
            geo: GeoStates::new(num_track_slots),
            material: MaterialStates::new(num_track_slots),
            phys: PhysicsStates::new(num_track_slots),
            rng: RngStates::new(seed, stream_id, num_track_slots),
            init: InitStates::new(num_track_slots, initializer_capacity),
            track_slots: (0..num_track_slots as u32).map(TrackSlotId).collect(),
            offsets,
            aux: AuxStateVec::from_registry(params.aux(), num_track_slots),
            counters: CoreStateCounters {
                num_vacancies: num_track_slots,
                ..Default::default()
            },
            diag: DiagCounters::default(),
            warming_up: false,
            seed,
            num_actions,
        }
    }

    /// Number of track slots.
    pub fn capacity(&self) -> usize {
        self.sim.status.len()
    }

    /// Global RNG seed the state was built with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether the state is being stepped with no active tracks.
    pub fn warming_up(&self) -> bool {
        self.warming_up
    }

    /// Set the warmup flag.
    pub fn set_warming_up(&mut self, value: bool) {
        self.warming_up = value;
    }

    /// The slot visited by thread index `thread`.
    pub fn slot_at(&self, thread: usize) -> TrackSlotId {
        self.track_slots[thread]
    }

    /// The thread range for `action` when sorting is enabled.
    ///
    /// `None` means the state is unsorted and callers must visit every
    /// thread, filtering per slot.
    pub fn get_action_range(&self, action: ActionId) -> Option<Range<usize>> {
        self.offsets.as_ref().map(|o| o.get_action_range(action))
    }

    /// Clear one slot back to inactive across every component.
    pub fn clear_slot(&mut self, slot: TrackSlotId) {
        self.sim.clear_slot(slot);
        self.particle.clear_slot(slot);
        self.geo.clear_slot(slot);
        self.material.clear_slot(slot);
        self.phys.clear_slot(slot);
    }

    /// Finalize the slot lifecycle for this step: killed and errored
    /// slots become inactive and the vacancy list is rebuilt in
    /// ascending order.
    ///
    /// Returns `(num_killed, num_errored)` observed before clearing.
    pub fn rebuild_vacancies(&mut self) -> (usize, usize) {
        let mut killed = 0;
        let mut errored = 0;
        for i in 0..self.capacity() {
            match self.sim.status[i] {
                TrackStatus::Killed => killed += 1,
                TrackStatus::Errored => errored += 1,
                _ => {}
            }
        }
        for i in 0..self.capacity() {
            let slot = TrackSlotId(i as u32);
            if matches!(
                self.sim.status[i],
                TrackStatus::Killed | TrackStatus::Errored
            ) {
                self.clear_slot(slot);
            }
        }
        self.init.vacancies.clear();
        for i in 0..self.capacity() {
            if self.sim.status[i] == TrackStatus::Inactive {
                self.init.vacancies.push(TrackSlotId(i as u32));
            }
        }
        self.counters.num_vacancies = self.init.vacancies.len();
        (killed, errored)
    }

    /// Restore the freshly-constructed invariant.
    pub fn reset(&mut self) {
        let n = self.capacity();
        for i in 0..n {
            self.clear_slot(TrackSlotId(i as u32));
        }
        self.rng = RngStates::new(self.seed, self.stream_id, n);
        self.init.reset();
        self.track_slots.clear();
        self.track_slots.extend((0..n as u32).map(TrackSlotId));
        if let Some(offsets) = &mut self.offsets {
            offsets.clear();
        }
        self.counters = CoreStateCounters {
            num_vacancies: n,
            ..Default::default()
        };
        self.diag = DiagCounters::default();
        self.warming_up = false;
    }

    /// Number of actions the state was sized for.
    pub fn num_actions(&self) -> usize {
        self.num_actions
    }
}
