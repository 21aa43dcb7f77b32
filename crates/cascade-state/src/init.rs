//! The initializer buffer and track-creation bookkeeping.

use std::collections::VecDeque;

use indexmap::IndexMap;

use cascade_core::{EventId, Initializer, PrimaryId, TrackId, TrackSlotId};

use crate::error::StateError;

/// Bounded FIFO pool of pending track-creation records.
///
/// Producers push primaries and overflow secondaries; the
/// initialize-tracks action pops exactly `min(len, vacancies)` records
/// per step. Records are consumed strictly in insertion order.
#[derive(Clone, Debug)]
pub struct InitializerBuffer {
    queue: VecDeque<Initializer>,
    capacity: usize,
}

impl InitializerBuffer {
    /// Create with a fixed capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of pending records.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Append a record. Overflow is fatal.
    pub fn push(&mut self, init: Initializer) -> Result<(), StateError> {
        if self.queue.len() >= self.capacity {
            return Err(StateError::InitializerOverflow {
                capacity: self.capacity,
            });
        }
        self.queue.push_back(init);
        Ok(())
    }

    /// Pop the oldest record.
    pub fn pop(&mut self) -> Option<Initializer> {
        self.queue.pop_front()
    }

    /// Drop all pending records.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Iterate over pending records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Initializer> {
        self.queue.iter()
    }
}

/// Vacancy list, initializer buffer, and id issuance for one stream.
#[derive(Clone, Debug)]
pub struct InitStates {
    /// Indices of inactive slots, rebuilt ascending once per step and
    /// consumed from the back.
    pub vacancies: Vec<TrackSlotId>,
    /// Pending track-creation records.
    pub buffer: InitializerBuffer,
    /// Slot-bank capacity, kept for `reset()`.
    num_slots: usize,
    /// Next track id per event; ids are monotonic and never reused
    /// within an event.
    track_counters: IndexMap<EventId, u32>,
    /// Next primary id for this stream.
    primary_counter: u32,
}

impl InitStates {
    /// Create for a bank of `capacity` slots.
    ///
    /// The vacancy list starts holding every slot in ascending order.
    pub fn new(capacity: usize, initializer_capacity: usize) -> Self {
        Self {
            vacancies: (0..capacity as u32).map(TrackSlotId).collect(),
            buffer: InitializerBuffer::new(initializer_capacity),
            num_slots: capacity,
            track_counters: IndexMap::new(),
            primary_counter: 0,
        }
    }

    /// Restore the freshly-constructed invariant.
    pub fn reset(&mut self) {
        self.vacancies.clear();
        self.vacancies
            .extend((0..self.num_slots as u32).map(TrackSlotId));
        self.buffer.clear();
        self.track_counters.clear();
        self.primary_counter = 0;
    }

    /// Issue the next track id for `event`.
    pub fn next_track_id(&mut self, event: EventId) -> TrackId {
        let counter = self.track_counters.entry(event).or_insert(0);
        let id = TrackId(*counter);
        *counter += 1;
        id
    }

    /// Issue the next primary id for this stream.
    pub fn next_primary_id(&mut self) -> PrimaryId {
        let id = PrimaryId(self.primary_counter);
        self.primary_counter += 1;
        id
    }

    /// Tracks issued so far for `event`.
    pub fn tracks_issued(&self, event: EventId) -> u32 {
        self.track_counters.get(&event).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::{ParticleId, Primary};

    fn init_record(track: u32) -> Initializer {
        let p = Primary {
            event_id: EventId(0),
            particle_id: ParticleId(0),
            energy: 1.0,
            position: [0.0; 3],
            direction: [0.0, 0.0, 1.0],
            time: 0.0,
        };
        Initializer::from_primary(&p, TrackId(track), PrimaryId(track))
    }

    #[test]
    fn buffer_is_fifo() {
        let mut buf = InitializerBuffer::new(4);
        buf.push(init_record(0)).unwrap();
        buf.push(init_record(1)).unwrap();
        assert_eq!(buf.pop().unwrap().track_id, TrackId(0));
        assert_eq!(buf.pop().unwrap().track_id, TrackId(1));
        assert!(buf.pop().is_none());
    }

    #[test]
    fn buffer_overflow_is_fatal() {
        let mut buf = InitializerBuffer::new(1);
        buf.push(init_record(0)).unwrap();
        assert_eq!(
            buf.push(init_record(1)),
            Err(StateError::InitializerOverflow { capacity: 1 })
        );
    }

    #[test]
    fn track_ids_are_monotonic_per_event() {
        let mut init = InitStates::new(4, 16);
        assert_eq!(init.next_track_id(EventId(0)), TrackId(0));
        assert_eq!(init.next_track_id(EventId(1)), TrackId(0));
        assert_eq!(init.next_track_id(EventId(0)), TrackId(1));
        assert_eq!(init.tracks_issued(EventId(0)), 2);
    }

    #[test]
    fn fresh_vacancies_are_ascending() {
        let init = InitStates::new(3, 16);
        assert_eq!(
            init.vacancies,
            vec![TrackSlotId(0), TrackSlotId(1), TrackSlotId(2)]
        );
    }
}
