//! Primary ingestion: the only input path into the engine.

use cascade_core::{Initializer, Primary, StepError};
use cascade_state::CoreState;

/// Convert caller-supplied primaries into buffered initializers.
///
/// Callable between steps only: the stepper invokes this before the
/// pipeline runs, never from inside an action. Track ids are issued
/// monotonically per event in submission order, so resubmitting the
/// same primary sequence reproduces the same identities.
pub fn extend_from_primaries(state: &mut CoreState, primaries: &[Primary]) -> Result<(), StepError> {
    for primary in primaries {
        debug_assert!(primary.energy > 0.0, "primary with non-positive energy");
        debug_assert!(
            cascade_core::math::is_unit(&primary.direction, 1e-6),
            "primary direction is not a unit vector"
        );
        let primary_id = state.init.next_primary_id();
        let track_id = state.init.next_track_id(primary.event_id);
        let record = Initializer::from_primary(primary, track_id, primary_id);
        state
            .init
            .buffer
            .push(record)
            .map_err(|_| StepError::InitializerOverflow {
                capacity: state.init.buffer.capacity(),
                pending: state.init.buffer.len() + 1,
            })?;
        state.counters.num_generated += 1;
    }
    state.counters.num_initializers = state.init.buffer.len();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::{EventId, TrackId};
    use cascade_test_utils::{gamma_primary, minimal_state};

    #[test]
    fn primaries_become_initializers_in_order() {
        let mut state = minimal_state(4, 16);
        let primaries = [
            gamma_primary(0, 1.0),
            gamma_primary(0, 1.0),
            gamma_primary(1, 1.0),
        ];
        extend_from_primaries(&mut state, &primaries).unwrap();
        assert_eq!(state.counters.num_initializers, 3);
        assert_eq!(state.counters.num_generated, 3);
        let ids: Vec<_> = state
            .init
            .buffer
            .iter()
            .map(|r| (r.event_id, r.track_id))
            .collect();
        assert_eq!(
            ids,
            vec![
                (EventId(0), TrackId(0)),
                (EventId(0), TrackId(1)),
                (EventId(1), TrackId(0)),
            ]
        );
    }

    #[test]
    fn overflow_is_fatal_and_typed() {
        let mut state = minimal_state(4, 2);
        let primaries = vec![gamma_primary(0, 1.0); 3];
        match extend_from_primaries(&mut state, &primaries) {
            Err(StepError::InitializerOverflow { capacity, pending }) => {
                assert_eq!(capacity, 2);
                assert_eq!(pending, 3);
            }
            other => panic!("expected overflow, got {other:?}"),
        }
    }
}
