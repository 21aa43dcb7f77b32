//! Core-owned pipeline actions.

mod boundary;
mod discrete_select;
mod pre_step;
mod propagation_limit;
mod tracking_cut;

pub use boundary::BoundaryAction;
pub use discrete_select::DiscreteSelectAction;
pub use pre_step::PreStepAction;
pub use propagation_limit::PropagationLimitAction;
pub use tracking_cut::TrackingCutAction;
