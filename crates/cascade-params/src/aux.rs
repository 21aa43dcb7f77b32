//! Auxiliary params: user-extensible per-stream state factories.
//!
//! Components outside the core (step collection, offload buffers,
//! diagnostics) often need their own per-stream state sized to the
//! slot bank. They register an [`AuxParams`] factory here before the
//! core params are frozen; every state construction then asks each
//! factory to create one state object, addressable by [`AuxId`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use cascade_core::AuxId;

use crate::error::ParamsError;

/// Factory for one kind of auxiliary per-stream state.
pub trait AuxParams: Send + Sync {
    /// Unique label for diagnostics and duplicate detection.
    fn label(&self) -> &str;

    /// Create the per-stream state for a bank of `num_track_slots`.
    fn create_state(&self, num_track_slots: usize) -> Box<dyn Any + Send>;
}

/// Registry of auxiliary params, frozen with the core params.
#[derive(Clone, Default)]
pub struct AuxRegistry {
    entries: Vec<Arc<dyn AuxParams>>,
    labels: IndexMap<String, AuxId>,
}

impl AuxRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next insertion will receive.
    pub fn next_id(&self) -> AuxId {
        AuxId(self.entries.len() as u32)
    }

    /// Register a factory, returning its assigned id.
    pub fn insert(&mut self, params: Arc<dyn AuxParams>) -> Result<AuxId, ParamsError> {
        let label = params.label().to_string();
        if self.labels.contains_key(&label) {
            return Err(ParamsError::Inconsistent {
                reason: format!("duplicate aux params label '{label}'"),
            });
        }
        let id = self.next_id();
        self.labels.insert(label, id);
        self.entries.push(params);
        Ok(id)
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the factories in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn AuxParams>> {
        self.entries.iter()
    }

    /// Look up a factory id by label.
    pub fn find(&self, label: &str) -> Option<AuxId> {
        self.labels.get(label).copied()
    }
}

impl fmt::Debug for AuxRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.labels.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counters;
    impl AuxParams for Counters {
        fn label(&self) -> &str {
            "counters"
        }
        fn create_state(&self, n: usize) -> Box<dyn Any + Send> {
            Box::new(vec![0u64; n])
        }
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let mut reg = AuxRegistry::new();
        assert_eq!(reg.insert(Arc::new(Counters)).unwrap(), AuxId(0));
        assert_eq!(reg.find("counters"), Some(AuxId(0)));
    }

    #[test]
    fn duplicate_label_rejected() {
        let mut reg = AuxRegistry::new();
        reg.insert(Arc::new(Counters)).unwrap();
        assert!(reg.insert(Arc::new(Counters)).is_err());
    }
}
