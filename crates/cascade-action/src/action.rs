//! The [`StepAction`] trait.

use cascade_core::{ActionError, ActionId, StepOrder};
use cascade_params::CoreParams;
use cascade_state::CoreState;

/// A modular operator in the per-step pipeline.
///
/// # Contract
///
/// - `execute()` is applied to **every** slot of the state; actions
///   that only concern a subset filter per slot (see the launch
///   helpers) rather than assuming a particular traversal.
/// - Within one `execute()` call, per-slot work must not depend on
///   another slot's mutations: the final state is independent of slot
///   visit order. The only cross-slot mutation allowed is appending to
///   the secondary/initializer machinery, which is insertion-ordered.
/// - `&self` — actions hold configuration as plain values; all mutable
///   per-track data goes through the state.
/// - `id()` returns the id assigned at registration; the registry
///   verifies it at insertion.
///
/// # Object safety
///
/// The trait is object-safe; the registry stores actions as
/// `Arc<dyn StepAction>` shared across streams.
pub trait StepAction: Send + Sync {
    /// The id assigned when the action was registered.
    fn id(&self) -> ActionId;

    /// Short unique label for diagnostics and error reporting.
    fn label(&self) -> &str;

    /// Longer description, empty by default.
    fn description(&self) -> &str {
        ""
    }

    /// Where in the step pipeline the action runs.
    fn order(&self) -> StepOrder;

    /// Apply the action to every slot in the state.
    fn execute(&self, params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError>;
}
