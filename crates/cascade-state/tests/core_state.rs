//! Tests for the assembled per-stream state invariants.

use cascade_core::{EventId, TrackId, TrackSlotId, TrackStatus};
use cascade_state::CoreStateCounters;
use cascade_test_utils::minimal_params_and_state;

#[test]
fn fresh_state_satisfies_invariant() {
    let (_params, state) = minimal_params_and_state(8, 32);
    assert_eq!(state.capacity(), 8);
    assert!(state
        .sim
        .status
        .iter()
        .all(|&s| s == TrackStatus::Inactive));
    assert_eq!(state.init.vacancies.len(), 8);
    assert_eq!(state.counters.num_vacancies, 8);
    assert_eq!(state.track_slots.len(), 8);
    assert!(state.offsets.is_none());
}

#[test]
fn rebuild_vacancies_recycles_dead_slots() {
    let (_params, mut state) = minimal_params_and_state(4, 16);
    state.sim.status[1] = TrackStatus::Alive;
    state.sim.status[2] = TrackStatus::Killed;
    state.sim.status[3] = TrackStatus::Errored;
    let (killed, errored) = state.rebuild_vacancies();
    assert_eq!((killed, errored), (1, 1));
    assert_eq!(
        state.init.vacancies,
        vec![TrackSlotId(0), TrackSlotId(2), TrackSlotId(3)]
    );
    assert_eq!(state.sim.status[2], TrackStatus::Inactive);
    assert_eq!(state.sim.status[3], TrackStatus::Inactive);
    assert_eq!(state.sim.status[1], TrackStatus::Alive);
}

#[test]
fn reset_restores_fresh_invariant() {
    let (_params, mut state) = minimal_params_and_state(4, 16);
    state.sim.status[0] = TrackStatus::Alive;
    state.sim.track_id[0] = Some(TrackId(0));
    state.init.next_track_id(EventId(0));
    state.set_warming_up(true);
    state.reset();
    assert!(state
        .sim
        .status
        .iter()
        .all(|&s| s == TrackStatus::Inactive));
    assert_eq!(state.init.vacancies.len(), 4);
    assert_eq!(state.init.tracks_issued(EventId(0)), 0);
    assert!(!state.warming_up());
    assert_eq!(state.counters, {
        CoreStateCounters {
            num_vacancies: 4,
            ..Default::default()
        }
    });
}
