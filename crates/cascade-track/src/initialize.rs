//! Slot initialization: materializing pending records into vacancies.

use cascade_core::{
    ActionError, ActionId, Initializer, StepOrder, TrackFault, TrackSlotId, TrackStatus,
};
use cascade_action::{ErrorAccumulator, StepAction};
use cascade_params::CoreParams;
use cascade_state::CoreState;

/// Write one initializer record into a vacant slot.
///
/// Geometry resolution prefers the record's snapshot (secondaries);
/// records without one (primaries) are located by navigation. The
/// slot's physics state is reset and its RNG engine reseeded from the
/// track identity, then the slot is marked alive with both action
/// selections assigned.
///
/// The caller owns the vacancy bookkeeping: `slot` must already have
/// been removed from the vacancy list.
pub fn materialize(
    params: &CoreParams,
    state: &mut CoreState,
    slot: TrackSlotId,
    record: &Initializer,
) -> Result<(), TrackFault> {
    let i = slot.0 as usize;
    let scalars = *params.scalars();

    let (volume, instances) = match record.volume {
        Some(volume) => {
            let mut chain = record.instances.clone();
            chain.truncate(params.geometry().volume_instance_depth);
            (volume, chain)
        }
        None => match params.geometry().navigator.locate(&record.position) {
            Some(volume) => (volume, params.geometry().truncated_chain(volume)),
            None => {
                return Err(TrackFault::Geometry {
                    what: format!(
                        "no volume contains starting position ({:.3}, {:.3}, {:.3})",
                        record.position[0], record.position[1], record.position[2]
                    ),
                });
            }
        },
    };

    state.sim.status[i] = TrackStatus::Alive;
    state.sim.track_id[i] = Some(record.track_id);
    state.sim.parent_id[i] = record.parent_id;
    state.sim.event_id[i] = Some(record.event_id);
    state.sim.primary_id[i] = record.primary_id;
    state.sim.step_count[i] = 0;
    state.sim.time[i] = record.time;
    state.sim.step_length[i] = 0.0;
    state.sim.weight[i] = record.weight;
    state.sim.num_looping_steps[i] = 0;
    state.sim.along_step_action[i] = if params.particles().is_neutral(record.particle_id) {
        scalars.along_step_neutral_action
    } else {
        scalars.along_step_action
    };
    state.sim.post_step_action[i] = scalars.discrete_select_action;

    state.particle.particle_id[i] = Some(record.particle_id);
    state.particle.energy[i] = record.energy;

    state.geo.pos[i] = record.position;
    state.geo.dir[i] = record.direction;
    state.geo.volume[i] = Some(volume);
    state.geo.instances[i] = instances;
    state.geo.on_boundary[i] = false;

    state.material.mat[i] = Some(params.geo_material().material(volume));

    let num_processes = params.host_ref().num_processes(record.particle_id);
    state.phys.reset_track(slot, num_processes);
    state
        .rng
        .reseed(slot, state.seed(), record.event_id, record.track_id);
    Ok(())
}

/// Pops `min(num_vacancies, num_initializers)` records from the buffer
/// and materializes each into a vacant slot.
///
/// Runs first in the pre-step order so tracks enqueued between steps
/// are transported in the very next step. Vacancies are consumed from
/// the back of the (ascending) vacancy list; records are consumed in
/// insertion order.
pub struct InitializeTracksAction {
    id: ActionId,
}

impl InitializeTracksAction {
    /// Construct with the id the registry is about to assign.
    pub fn new(id: ActionId) -> Self {
        Self { id }
    }
}

impl StepAction for InitializeTracksAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        "initialize-tracks"
    }

    fn description(&self) -> &str {
        "materialize pending initializers into vacant slots"
    }

    fn order(&self) -> StepOrder {
        StepOrder::PreStep
    }

    fn execute(&self, params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError> {
        let count = state.init.vacancies.len().min(state.init.buffer.len());
        let mut errors = ErrorAccumulator::new();
        for _ in 0..count {
            let slot = state.init.vacancies.pop().expect("vacancy available");
            let record = state.init.buffer.pop().expect("initializer available");
            if let Err(fault) = materialize(params, state, slot, &record) {
                // Keep the slot occupied so the accounting invariant
                // holds while the step aborts.
                let i = slot.0 as usize;
                state.sim.status[i] = TrackStatus::Errored;
                state.sim.track_id[i] = Some(record.track_id);
                state.sim.event_id[i] = Some(record.event_id);
                state.diag.errored += 1;
                errors.push(slot, fault);
            }
        }
        state.counters.num_vacancies = state.init.vacancies.len();
        state.counters.num_initializers = state.init.buffer.len();
        errors.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::{EventId, TrackId};
    use cascade_test_utils::{gamma_primary, minimal_params_and_state};

    use crate::primaries::extend_from_primaries;

    #[test]
    fn refill_is_bounded_by_vacancies() {
        let (params, mut state) = minimal_params_and_state(16, 64);
        let primaries: Vec<_> = (0..22).map(|_| gamma_primary(0, 1.0)).collect();
        extend_from_primaries(&mut state, &primaries).unwrap();
        assert_eq!(state.counters.num_initializers, 22);

        let action = InitializeTracksAction::new(ActionId(0));
        action.execute(&params, &mut state).unwrap();
        assert_eq!(state.counters.num_vacancies, 0);
        assert_eq!(state.counters.num_initializers, 6);
        assert_eq!(
            state
                .sim
                .status
                .iter()
                .filter(|&&s| s == TrackStatus::Alive)
                .count(),
            16
        );
        // Remaining records keep insertion order.
        let remaining: Vec<_> = state.init.buffer.iter().map(|r| r.track_id).collect();
        assert_eq!(
            remaining,
            (16..22).map(TrackId).collect::<Vec<_>>()
        );
    }

    #[test]
    fn materialized_track_is_fully_assigned() {
        let (params, mut state) = minimal_params_and_state(4, 16);
        extend_from_primaries(&mut state, &[gamma_primary(3, 2.5)]).unwrap();
        InitializeTracksAction::new(ActionId(0))
            .execute(&params, &mut state)
            .unwrap();
        // Vacancies pop from the back: the record lands in the last slot.
        let i = 3;
        assert_eq!(state.sim.status[i], TrackStatus::Alive);
        assert_eq!(state.sim.event_id[i], Some(EventId(3)));
        assert_eq!(state.sim.track_id[i], Some(TrackId(0)));
        assert!(state.sim.along_step_action[i].is_some());
        assert!(state.sim.post_step_action[i].is_some());
        assert!(state.geo.volume[i].is_some());
        assert!(state.material.mat[i].is_some());
        assert_eq!(state.particle.energy[i], 2.5);
    }
}
