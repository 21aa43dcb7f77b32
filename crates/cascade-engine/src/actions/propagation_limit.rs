//! Marker for steps limited by propagation rather than physics.

use cascade_core::{ActionError, ActionId, StepOrder};
use cascade_action::StepAction;
use cascade_params::CoreParams;
use cascade_state::CoreState;

/// The no-interaction selection.
///
/// A slot whose step ended without reaching a boundary or exhausting a
/// process MFP (range-limited, MSC-limited, or an incomplete field
/// advance below the looping threshold) selects this action; the track
/// simply continues next step. Registering it keeps the post-step
/// selection a valid action id in every case.
pub struct PropagationLimitAction {
    id: ActionId,
}

impl PropagationLimitAction {
    /// Construct with the id the registry is about to assign.
    pub fn new(id: ActionId) -> Self {
        Self { id }
    }
}

impl StepAction for PropagationLimitAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        "propagation-limit"
    }

    fn description(&self) -> &str {
        "no discrete interaction this step"
    }

    fn order(&self) -> StepOrder {
        StepOrder::Post
    }

    fn execute(&self, _params: &CoreParams, _state: &mut CoreState) -> Result<(), ActionError> {
        Ok(())
    }
}
