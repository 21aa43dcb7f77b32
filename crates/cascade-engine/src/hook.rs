//! End-of-step hooks.

use std::any::Any;

use cascade_core::StepError;
use cascade_params::CoreParams;
use cascade_state::CoreState;

/// A synchronous extension point run after the pipeline, once per
/// step.
///
/// This is the only suspension point in the stepping model: a hook may
/// transfer control to a nested stepping instance (the optical offload
/// does exactly that) before the step call returns. Hooks own mutable
/// state of their own, unlike actions, which is why they are boxed per
/// stepper rather than shared.
pub trait StepHook: Send {
    /// Hook name for error reporting.
    fn label(&self) -> &str;

    /// Run at the end-of-step barrier.
    fn end_step(&mut self, params: &CoreParams, state: &mut CoreState) -> Result<(), StepError>;

    /// Downcasting support for introspection.
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcasting support.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
