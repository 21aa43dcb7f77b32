//! End-of-pipeline state consistency check.

use cascade_core::{ActionError, ActionId, StepOrder, TrackStatus};
use cascade_action::StepAction;
use cascade_params::CoreParams;
use cascade_state::CoreState;

/// Verifies the slot-accounting contract after every step.
///
/// Checks, for the whole bank: status counts sum to capacity; every
/// inactive slot appears in the vacancy list exactly once and no
/// occupied slot appears at all; occupied slots have their particle,
/// volume, material, and action selections assigned with in-range
/// action ids. Intended for tests and debugging runs; enabled by the
/// `status_check` sim parameter.
pub struct StatusCheckAction {
    id: ActionId,
}

impl StatusCheckAction {
    /// Construct with the id the registry is about to assign.
    pub fn new(id: ActionId) -> Self {
        Self { id }
    }

    fn fail(what: String) -> ActionError {
        ActionError::InvariantFailure { what }
    }
}

impl StepAction for StatusCheckAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        "status-check"
    }

    fn description(&self) -> &str {
        "verify slot accounting and per-slot assignment invariants"
    }

    fn order(&self) -> StepOrder {
        StepOrder::PostPost
    }

    fn execute(&self, _params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError> {
        let capacity = state.capacity();
        let num_actions = state.num_actions();

        // Vacancy membership counts.
        let mut vacancy_count = vec![0usize; capacity];
        for slot in &state.init.vacancies {
            let i = slot.0 as usize;
            if i >= capacity {
                return Err(Self::fail(format!("vacancy {slot} out of range")));
            }
            vacancy_count[i] += 1;
        }

        let mut occupied = 0usize;
        for i in 0..capacity {
            let status = state.sim.status[i];
            match status {
                TrackStatus::Inactive => {
                    if vacancy_count[i] != 1 {
                        return Err(Self::fail(format!(
                            "inactive slot {i} appears {} times in the vacancy list",
                            vacancy_count[i]
                        )));
                    }
                    if state.sim.track_id[i].is_some() {
                        return Err(Self::fail(format!("inactive slot {i} has a track id")));
                    }
                }
                TrackStatus::Killed | TrackStatus::Errored => {
                    // Dead slots are recycled before this action runs.
                    return Err(Self::fail(format!(
                        "slot {i} still {status:?} at end of step"
                    )));
                }
                TrackStatus::Alive => {
                    occupied += 1;
                    if vacancy_count[i] != 0 {
                        return Err(Self::fail(format!("alive slot {i} is in the vacancy list")));
                    }
                    if state.particle.particle_id[i].is_none() {
                        return Err(Self::fail(format!("alive slot {i} has no particle")));
                    }
                    if state.geo.volume[i].is_none() {
                        return Err(Self::fail(format!("alive slot {i} has no volume")));
                    }
                    if state.material.mat[i].is_none() {
                        return Err(Self::fail(format!("alive slot {i} has no material")));
                    }
                    for (name, action) in [
                        ("along-step", state.sim.along_step_action[i]),
                        ("post-step", state.sim.post_step_action[i]),
                    ] {
                        match action {
                            None => {
                                return Err(Self::fail(format!(
                                    "alive slot {i} has no {name} action"
                                )));
                            }
                            Some(a) if (a.0 as usize) >= num_actions => {
                                return Err(Self::fail(format!(
                                    "alive slot {i} has out-of-range {name} action {a}"
                                )));
                            }
                            Some(_) => {}
                        }
                    }
                }
            }
        }

        if occupied + state.init.vacancies.len() != capacity {
            return Err(Self::fail(format!(
                "{occupied} occupied + {} vacancies != capacity {capacity}",
                state.init.vacancies.len()
            )));
        }
        Ok(())
    }
}
