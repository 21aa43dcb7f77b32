//! The caller-facing stepper.

use std::sync::Arc;
use std::time::Instant;

use cascade_core::{ActionError, Primary, StepError, StepOrder, TrackStatus};
use cascade_action::{ActionRegistry, StepAction};
use cascade_params::CoreParams;
use cascade_state::CoreState;
use cascade_track::extend_from_primaries;

use crate::config::{ConfigError, StepperInput};
use crate::hook::StepHook;
use crate::metrics::StepMetrics;

// ── StepCounters ────────────────────────────────────────────────

/// Slot-bank counters returned from every step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepCounters {
    /// Slots occupied while the step's actions ran.
    pub active: usize,
    /// Slots alive at the end of the step.
    pub alive: usize,
    /// Slots that errored during the step.
    pub errored: usize,
    /// Vacancies at the end of the step.
    pub vacancies: usize,
    /// Records waiting in the initializer buffer.
    pub initializers: usize,
}

// ── RunResult ───────────────────────────────────────────────────

/// Outcome of a [`Stepper::run`] call.
#[derive(Clone, Copy, Debug)]
pub struct RunResult {
    /// Counters after the final step iteration.
    pub counters: StepCounters,
    /// Step iterations executed by this call.
    pub step_iters: u32,
    /// Whether transport finished (no active tracks, empty buffer)
    /// before the substep cap.
    pub drained: bool,
}

// ── Stepper ─────────────────────────────────────────────────────

/// Drives one stream's state through the step pipeline.
///
/// Construction validates the configuration, builds the ordered
/// pipeline, and allocates the stream's state. Each
/// [`step()`](Stepper::step) call pushes primaries and executes
/// exactly one step iteration; [`run()`](Stepper::run) iterates until
/// transport drains or the substep cap is reached.
pub struct Stepper {
    params: Arc<CoreParams>,
    actions: Arc<ActionRegistry>,
    begin_run: Vec<Arc<dyn StepAction>>,
    pipeline: Vec<Arc<dyn StepAction>>,
    end_run: Vec<Arc<dyn StepAction>>,
    /// Pipeline index after the last pre-step-order action, where the
    /// active-slot count is sampled.
    active_checkpoint: usize,
    hooks: Vec<Box<dyn StepHook>>,
    state: CoreState,
    metrics: StepMetrics,
    run_started: bool,
}

impl Stepper {
    /// Validate the input and build a ready-to-step instance.
    pub fn new(input: StepperInput) -> Result<Self, ConfigError> {
        input.validate()?;
        let num_track_slots = input.resolved_track_slots();
        let initializer_capacity = input.resolved_initializer_capacity();
        let StepperInput {
            params,
            actions,
            stream_id,
            hooks,
            ..
        } = input;

        let mut begin_run = Vec::new();
        let mut pipeline = Vec::new();
        let mut end_run = Vec::new();
        for (_, action) in actions.iter() {
            match action.order() {
                StepOrder::BeginRun => begin_run.push(Arc::clone(action)),
                StepOrder::EndRun => end_run.push(Arc::clone(action)),
                _ => pipeline.push(Arc::clone(action)),
            }
        }
        // Stable by order; registration order breaks ties.
        pipeline.sort_by_key(|a| a.order());
        let active_checkpoint = pipeline
            .iter()
            .position(|a| a.order() > StepOrder::PreStep)
            .unwrap_or(pipeline.len());

        let state = CoreState::new(
            &params,
            stream_id,
            num_track_slots,
            initializer_capacity,
            actions.len(),
        );
        Ok(Self {
            params,
            actions,
            begin_run,
            pipeline,
            end_run,
            active_checkpoint,
            hooks,
            state,
            metrics: StepMetrics::default(),
            run_started: false,
        })
    }

    /// Push primaries and execute exactly one step iteration.
    ///
    /// `primaries` may be empty to continue transport. Stepping an
    /// empty state with an empty buffer is a no-op apart from the
    /// warmup flag.
    pub fn step(&mut self, primaries: &[Primary]) -> Result<StepCounters, StepError> {
        let step_start = Instant::now();
        if !self.run_started {
            for action in &self.begin_run {
                Self::execute_action(action, &self.params, &mut self.state)?;
            }
            self.run_started = true;
        }
        extend_from_primaries(&mut self.state, primaries)?;

        self.metrics.action_us.clear();
        for index in 0..self.pipeline.len() {
            if index == self.active_checkpoint {
                self.sample_active();
            }
            let action = Arc::clone(&self.pipeline[index]);
            let action_start = Instant::now();
            Self::execute_action(&action, &self.params, &mut self.state)?;
            self.metrics.action_us.push((
                action.label().to_string(),
                action_start.elapsed().as_micros() as u64,
            ));
        }
        if self.active_checkpoint >= self.pipeline.len() {
            self.sample_active();
        }

        for hook in &mut self.hooks {
            hook.end_step(&self.params, &mut self.state)?;
        }

        self.finalize_counters();
        if self.state.warming_up() {
            self.state.set_warming_up(false);
        }
        self.metrics.total_us = step_start.elapsed().as_micros() as u64;
        self.metrics.step_iters += 1;
        Ok(self.counters())
    }

    /// Step until no active tracks and no initializers remain, capped
    /// at the configured `max_substeps`.
    pub fn run(&mut self, primaries: &[Primary]) -> Result<RunResult, StepError> {
        let max_substeps = self.params.sim().max_substeps;
        let mut counters = self.step(primaries)?;
        let mut step_iters = 1u32;
        while (counters.alive > 0 || counters.initializers > 0) && step_iters < max_substeps {
            counters = self.step(&[])?;
            step_iters += 1;
        }
        Ok(RunResult {
            counters,
            step_iters,
            drained: counters.alive == 0 && counters.initializers == 0,
        })
    }

    /// Execute one step with no active tracks to warm caches.
    pub fn warm_up(&mut self) -> Result<StepCounters, StepError> {
        self.state.set_warming_up(true);
        self.step(&[])
    }

    /// Run the end-of-run actions.
    pub fn end_run(&mut self) -> Result<(), StepError> {
        for action in &self.end_run {
            Self::execute_action(action, &self.params, &mut self.state)?;
        }
        Ok(())
    }

    /// Restore the state to its freshly-constructed invariant.
    pub fn reset(&mut self) {
        self.state.reset();
        self.metrics = StepMetrics::default();
        self.run_started = false;
    }

    /// The stream's state.
    pub fn state(&self) -> &CoreState {
        &self.state
    }

    /// Mutable access for tests and host-side inspection.
    pub fn state_mut(&mut self) -> &mut CoreState {
        &mut self.state
    }

    /// Counters from the most recent step.
    pub fn counters(&self) -> StepCounters {
        let c = &self.state.counters;
        StepCounters {
            active: c.num_active,
            alive: c.num_alive,
            errored: c.num_errored,
            vacancies: c.num_vacancies,
            initializers: c.num_initializers,
        }
    }

    /// Metrics from the most recent step.
    pub fn metrics(&self) -> &StepMetrics {
        &self.metrics
    }

    /// The shared params.
    pub fn params(&self) -> &Arc<CoreParams> {
        &self.params
    }

    /// The frozen action catalog.
    pub fn actions(&self) -> &Arc<ActionRegistry> {
        &self.actions
    }

    /// Downcast one hook for introspection.
    pub fn hook<T: 'static>(&self, index: usize) -> Option<&T> {
        self.hooks.get(index)?.as_any().downcast_ref()
    }

    /// Mutably downcast one hook.
    pub fn hook_mut<T: 'static>(&mut self, index: usize) -> Option<&mut T> {
        self.hooks.get_mut(index)?.as_any_mut().downcast_mut()
    }

    fn execute_action(
        action: &Arc<dyn StepAction>,
        params: &CoreParams,
        state: &mut CoreState,
    ) -> Result<(), StepError> {
        action.execute(params, state).map_err(|reason| {
            log::error!("action '{}' failed: {reason}", action.label());
            match reason {
                ActionError::InitializerOverflow { capacity, pending } => {
                    StepError::InitializerOverflow { capacity, pending }
                }
                reason => StepError::ActionFailed {
                    label: action.label().to_string(),
                    reason,
                },
            }
        })
    }

    fn sample_active(&mut self) {
        self.state.counters.num_active = self
            .state
            .sim
            .status
            .iter()
            .filter(|&&s| s != TrackStatus::Inactive)
            .count();
    }

    fn finalize_counters(&mut self) {
        let state = &mut self.state;
        state.counters.num_alive = state
            .sim
            .status
            .iter()
            .filter(|&&s| s == TrackStatus::Alive)
            .count();
        state.counters.num_vacancies = state.init.vacancies.len();
        state.counters.num_initializers = state.init.buffer.len();
    }
}
