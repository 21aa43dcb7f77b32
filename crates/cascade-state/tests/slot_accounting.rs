//! Property tests for the slot-accounting invariants.

use proptest::prelude::*;

use cascade_core::{TrackId, TrackSlotId, TrackStatus};
use cascade_test_utils::minimal_state;

fn status_from(code: u8) -> TrackStatus {
    match code % 4 {
        0 => TrackStatus::Inactive,
        1 => TrackStatus::Alive,
        2 => TrackStatus::Killed,
        _ => TrackStatus::Errored,
    }
}

proptest! {
    /// After recycling, statuses partition the bank: every slot is
    /// alive or inactive, inactive slots are exactly the vacancies
    /// (each listed once, ascending), and alive slots keep their ids.
    #[test]
    fn rebuild_restores_the_accounting_invariant(codes in prop::collection::vec(0u8..4, 1..64)) {
        let capacity = codes.len();
        let mut state = minimal_state(capacity, 16);
        for (i, &code) in codes.iter().enumerate() {
            let status = status_from(code);
            state.sim.status[i] = status;
            if status != TrackStatus::Inactive {
                state.sim.track_id[i] = Some(TrackId(i as u32));
            }
        }

        let (killed, errored) = state.rebuild_vacancies();
        let expected_killed = codes.iter().filter(|&&c| c % 4 == 2).count();
        let expected_errored = codes.iter().filter(|&&c| c % 4 == 3).count();
        prop_assert_eq!(killed, expected_killed);
        prop_assert_eq!(errored, expected_errored);

        // Vacancies are ascending and unique.
        let vacancies = &state.init.vacancies;
        prop_assert!(vacancies.windows(2).all(|w| w[0] < w[1]));

        let mut alive = 0;
        for i in 0..capacity {
            match state.sim.status[i] {
                TrackStatus::Alive => {
                    alive += 1;
                    prop_assert!(!vacancies.contains(&TrackSlotId(i as u32)));
                    prop_assert!(state.sim.track_id[i].is_some());
                }
                TrackStatus::Inactive => {
                    prop_assert!(vacancies.contains(&TrackSlotId(i as u32)));
                    prop_assert!(state.sim.track_id[i].is_none());
                }
                other => prop_assert!(false, "slot {} still {:?}", i, other),
            }
        }
        prop_assert_eq!(alive + vacancies.len(), capacity);
        prop_assert_eq!(state.counters.num_vacancies, vacancies.len());
    }
}
