//! Memspace-independent core scalars.

use cascade_core::ActionId;

/// Ids of the core-owned actions plus stream limits.
///
/// Assigned while the action registry is being populated; `validate()`
/// runs at params construction, after which the values never change.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoreScalars {
    /// Slot refill and scratch reset, first in the pre-step order.
    pub init_tracks_action: Option<ActionId>,
    /// Step-scratch reset and interaction-length sampling.
    pub pre_step_action: Option<ActionId>,
    /// Along-step action applied to charged tracks.
    pub along_step_action: Option<ActionId>,
    /// Along-step action applied to neutral tracks.
    pub along_step_neutral_action: Option<ActionId>,
    /// Post-step interaction selection.
    pub discrete_select_action: Option<ActionId>,
    /// Surface crossing.
    pub boundary_action: Option<ActionId>,
    /// Deposit a track's remaining energy locally and kill it.
    pub tracking_cut_action: Option<ActionId>,
    /// Marker for steps limited by propagation, not physics.
    pub propagation_limit_action: Option<ActionId>,
    /// Upper bound on concurrent streams.
    pub max_streams: u32,
}

impl CoreScalars {
    /// Whether every required id is assigned and streams are allowed.
    pub fn is_assigned(&self) -> bool {
        self.init_tracks_action.is_some()
            && self.pre_step_action.is_some()
            && self.along_step_action.is_some()
            && self.along_step_neutral_action.is_some()
            && self.discrete_select_action.is_some()
            && self.boundary_action.is_some()
            && self.tracking_cut_action.is_some()
            && self.propagation_limit_action.is_some()
            && self.max_streams > 0
    }

    /// Name of the first unassigned field, for configuration errors.
    pub fn first_unassigned(&self) -> Option<&'static str> {
        if self.init_tracks_action.is_none() {
            Some("init_tracks_action")
        } else if self.pre_step_action.is_none() {
            Some("pre_step_action")
        } else if self.along_step_action.is_none() {
            Some("along_step_action")
        } else if self.along_step_neutral_action.is_none() {
            Some("along_step_neutral_action")
        } else if self.discrete_select_action.is_none() {
            Some("discrete_select_action")
        } else if self.boundary_action.is_none() {
            Some("boundary_action")
        } else if self.tracking_cut_action.is_none() {
            Some("tracking_cut_action")
        } else if self.propagation_limit_action.is_none() {
            Some("propagation_limit_action")
        } else if self.max_streams == 0 {
            Some("max_streams")
        } else {
            None
        }
    }
}
