//! Auxiliary per-stream state storage.

use std::any::Any;

use cascade_core::AuxId;
use cascade_params::AuxRegistry;

/// The per-stream states created from the aux registry, one per
/// registered factory, addressed by [`AuxId`].
///
/// Entries are type-erased; consumers downcast to the concrete type
/// they registered.
#[derive(Default)]
pub struct AuxStateVec {
    items: Vec<Box<dyn Any + Send>>,
}

impl AuxStateVec {
    /// Create one state per registered factory.
    pub fn from_registry(registry: &AuxRegistry, num_track_slots: usize) -> Self {
        Self {
            items: registry
                .iter()
                .map(|p| p.create_state(num_track_slots))
                .collect(),
        }
    }

    /// Number of aux states.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no aux states.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrow one state, downcast to its concrete type.
    pub fn get<T: 'static>(&self, id: AuxId) -> Option<&T> {
        self.items.get(id.0 as usize)?.downcast_ref()
    }

    /// Mutably borrow one state, downcast to its concrete type.
    pub fn get_mut<T: 'static>(&mut self, id: AuxId) -> Option<&mut T> {
        self.items.get_mut(id.0 as usize)?.downcast_mut()
    }
}

impl std::fmt::Debug for AuxStateVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuxStateVec")
            .field("len", &self.items.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_params::AuxParams;
    use std::sync::Arc;

    struct SlotTallies;
    impl AuxParams for SlotTallies {
        fn label(&self) -> &str {
            "slot-tallies"
        }
        fn create_state(&self, n: usize) -> Box<dyn Any + Send> {
            Box::new(vec![0u32; n])
        }
    }

    #[test]
    fn states_are_sized_to_the_bank() {
        let mut reg = AuxRegistry::new();
        let id = reg.insert(Arc::new(SlotTallies)).unwrap();
        let mut aux = AuxStateVec::from_registry(&reg, 8);
        assert_eq!(aux.get::<Vec<u32>>(id).unwrap().len(), 8);
        aux.get_mut::<Vec<u32>>(id).unwrap()[3] = 7;
        assert_eq!(aux.get::<Vec<u32>>(id).unwrap()[3], 7);
    }

    #[test]
    fn wrong_type_downcast_is_none() {
        let mut reg = AuxRegistry::new();
        let id = reg.insert(Arc::new(SlotTallies)).unwrap();
        let aux = AuxStateVec::from_registry(&reg, 2);
        assert!(aux.get::<Vec<f64>>(id).is_none());
    }
}
