//! The ordered action catalog.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use cascade_core::ActionId;

use crate::action::StepAction;
use crate::error::RegistryError;

/// Ordered catalog of actions with stable, insertion-assigned ids.
///
/// Construction protocol: query [`next_id()`](ActionRegistry::next_id),
/// build the action carrying that id, then
/// [`insert()`](ActionRegistry::insert) it. The registry verifies the
/// id round-trips and that labels are unique. Once the stepper is
/// built the registry is shared immutably (`Arc`) by every stream.
#[derive(Default)]
pub struct ActionRegistry {
    actions: Vec<Arc<dyn StepAction>>,
    labels: IndexMap<String, ActionId>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next insertion will receive.
    pub fn next_id(&self) -> ActionId {
        ActionId(self.actions.len() as u32)
    }

    /// Register an action, verifying its id and label.
    pub fn insert(&mut self, action: Arc<dyn StepAction>) -> Result<ActionId, RegistryError> {
        let expected = self.next_id();
        if action.id() != expected {
            return Err(RegistryError::IdMismatch {
                expected,
                got: action.id(),
                label: action.label().to_string(),
            });
        }
        let label = action.label().to_string();
        if self.labels.contains_key(&label) {
            return Err(RegistryError::DuplicateLabel { label });
        }
        self.labels.insert(label, expected);
        self.actions.push(action);
        Ok(expected)
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The action registered under `id`.
    pub fn get(&self, id: ActionId) -> Option<&Arc<dyn StepAction>> {
        self.actions.get(id.0 as usize)
    }

    /// Look up an action id by label.
    pub fn find(&self, label: &str) -> Option<ActionId> {
        self.labels.get(label).copied()
    }

    /// The label registered under `id`.
    pub fn label(&self, id: ActionId) -> Option<&str> {
        self.actions.get(id.0 as usize).map(|a| a.label())
    }

    /// Iterate over `(id, action)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ActionId, &Arc<dyn StepAction>)> {
        self.actions
            .iter()
            .enumerate()
            .map(|(i, a)| (ActionId(i as u32), a))
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.labels.keys()).finish()
    }
}
