//! Secondary extension: vacancy recycling and new-track creation.

use smallvec::SmallVec;

use cascade_core::{ActionError, ActionId, Initializer, StepOrder, TrackSlotId};
use cascade_action::StepAction;
use cascade_params::CoreParams;
use cascade_state::CoreState;

use crate::initialize::materialize;

/// Converts the secondaries produced this step into new tracks.
///
/// Runs at the end of the pipeline, in three phases:
///
/// 1. **Collect** — walk slots in ascending order and their secondary
///    lists in production order, issuing track ids and snapshotting
///    the producing slot's geometry into each record. The ordering is
///    deterministic by (producing slot, local index), so results
///    reproduce given the same RNG streams.
/// 2. **Recycle** — killed and errored slots become inactive and the
///    vacancy list is rebuilt ascending.
/// 3. **Place** — each record takes a vacancy directly (marking the
///    slot alive) while one exists, else it is appended to the
///    initializer buffer. Never both, never lost.
pub struct ExtendFromSecondariesAction {
    id: ActionId,
}

impl ExtendFromSecondariesAction {
    /// Construct with the id the registry is about to assign.
    pub fn new(id: ActionId) -> Self {
        Self { id }
    }
}

impl StepAction for ExtendFromSecondariesAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        "extend-from-secondaries"
    }

    fn description(&self) -> &str {
        "recycle vacated slots and enqueue secondaries as new tracks"
    }

    fn order(&self) -> StepOrder {
        StepOrder::PostPost
    }

    fn execute(&self, params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError> {
        // Phase 1: collect in deterministic order, capturing the
        // parent geometry while the parent slot still holds it. The
        // stack factor is the configured over-allocation ratio for
        // this per-step scratch.
        let capacity_hint =
            (state.capacity() as f64 * params.sim().secondary_stack_factor) as usize;
        let mut staged: Vec<Initializer> = Vec::with_capacity(capacity_hint);
        for i in 0..state.capacity() {
            if state.phys.secondaries[i].is_empty() {
                continue;
            }
            let slot = TrackSlotId(i as u32);
            let event = state.sim.event_id[i].expect("producing slot has an event");
            let parent = state.sim.track_id[i].expect("producing slot has a track id");
            let parent_weight = state.sim.weight[i];
            let produced: SmallVec<[cascade_core::Secondary; 2]> =
                std::mem::take(&mut state.phys.secondaries[i]);
            for secondary in produced {
                let track_id = state.init.next_track_id(event);
                staged.push(Initializer {
                    particle_id: secondary.particle_id,
                    energy: secondary.energy,
                    position: state.geo.pos[i],
                    direction: secondary.direction,
                    time: state.sim.time[i],
                    weight: parent_weight * secondary.weight,
                    event_id: event,
                    track_id,
                    parent_id: Some(parent),
                    primary_id: None,
                    geo_parent: Some(slot),
                    volume: state.geo.volume[i],
                    instances: state.geo.instances[i].clone(),
                });
                state.diag.secondaries_created += 1;
                state.counters.num_generated += 1;
            }
        }

        // Phase 2: finalize the lifecycle and rebuild vacancies.
        let (_killed, errored) = state.rebuild_vacancies();
        state.counters.num_errored = errored;

        // Phase 3: direct placement while vacancies last, buffering
        // the rest. Buffered records already carry their geometry
        // snapshot; the slot back-reference dies with this step.
        for mut record in staged {
            if let Some(slot) = state.init.vacancies.pop() {
                materialize(params, state, slot, &record).map_err(|fault| ActionError::Track {
                    slot,
                    fault,
                    suppressed: 0,
                })?;
            } else {
                record.geo_parent = None;
                let pending = state.init.buffer.len() + 1;
                state
                    .init
                    .buffer
                    .push(record)
                    .map_err(|_| ActionError::InitializerOverflow {
                        capacity: state.init.buffer.capacity(),
                        pending,
                    })?;
            }
        }

        state.counters.num_vacancies = state.init.vacancies.len();
        state.counters.num_initializers = state.init.buffer.len();
        Ok(())
    }
}
