//! The offload pipeline: gather, buffer, flush, nested stepping.

use std::any::Any;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use cascade_core::{
    ActionError, ActionId, AuxId, ParticleId, Primary, StepError, StepOrder, TrackStatus,
};
use cascade_action::{ActionRegistry, StepAction};
use cascade_params::{AuxParams, AuxRegistry, CoreParams};
use cascade_state::CoreState;
use cascade_engine::{StepHook, Stepper};

use crate::actions::isotropic_direction;
use crate::buffer::OffloadBuffer;
use crate::distribution::GeneratorDistribution;
use crate::generator::{ChargedStep, OpticalGenerator};

/// Offload sizing knobs.
#[derive(Clone, Copy, Debug)]
pub struct OffloadOptions {
    /// Distribution-buffer capacity per stream.
    pub buffer_capacity: usize,
    /// Queued-photon count that triggers a nested stepping flush.
    pub auto_flush: usize,
}

impl Default for OffloadOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: 1 << 16,
            auto_flush: 1 << 18,
        }
    }
}

/// Completion counters for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OffloadCounters {
    /// Distributions buffered since construction.
    pub distributions: u64,
    /// Photons queued since construction.
    pub photons: u64,
    /// Flushes of the nested pipeline.
    pub flushes: u64,
    /// Step iterations run by the nested pipeline.
    pub optical_step_iters: u64,
}

/// Factory for the per-stream distribution buffer.
struct OffloadAuxParams {
    options: OffloadOptions,
}

impl AuxParams for OffloadAuxParams {
    fn label(&self) -> &str {
        "optical-offload"
    }
    fn create_state(&self, _num_track_slots: usize) -> Box<dyn Any + Send> {
        Box::new(OffloadBuffer::new(
            self.options.buffer_capacity,
            self.options.auto_flush,
        ))
    }
}

/// End-of-pipeline action sampling generator distributions from the
/// charged steps taken this step.
///
/// Registered before secondary extension so killed tracks' final steps
/// are still visible.
struct OffloadGatherAction {
    id: ActionId,
    aux_id: AuxId,
    generators: Vec<Arc<dyn OpticalGenerator>>,
}

impl StepAction for OffloadGatherAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        "offload-gather"
    }

    fn description(&self) -> &str {
        "sample optical generator distributions from charged steps"
    }

    fn order(&self) -> StepOrder {
        StepOrder::PostPost
    }

    fn execute(&self, params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError> {
        for i in 0..state.capacity() {
            if state.sim.status[i] == TrackStatus::Inactive {
                continue;
            }
            if state.sim.step_length[i] <= 0.0 {
                continue;
            }
            let particle = state.particle.particle_id[i].expect("occupied slot has a particle");
            let charge = params.particles().charge(particle);
            if charge == 0.0 {
                continue;
            }
            let step = ChargedStep {
                particle,
                charge,
                material: state.material.mat[i].expect("occupied slot has a material"),
                event_id: state.sim.event_id[i].expect("occupied slot has an event"),
                pre_pos: state.phys.step_start_pos[i],
                post_pos: state.geo.pos[i],
                pre_time: state.phys.step_start_time[i],
                post_time: state.sim.time[i],
                step_length: state.sim.step_length[i],
                energy_deposition: state.phys.eloss[i],
            };
            for generator in &self.generators {
                let CoreState { aux, rng, .. } = state;
                if let Some(dist) = generator.sample(&step, &mut rng.engine[i]) {
                    let buffer = aux
                        .get_mut::<OffloadBuffer>(self.aux_id)
                        .expect("offload buffer exists");
                    buffer.push(dist);
                }
            }
        }
        Ok(())
    }
}

/// Registers the offload gather machinery during setup.
///
/// Produced before the charged params freeze; converted into the
/// [`OpticalOffload`] hook once the nested optical stepper exists.
pub struct OffloadSetup {
    aux_id: AuxId,
}

impl OffloadSetup {
    /// Register the buffer factory and the gather action.
    pub fn new(
        generators: Vec<Arc<dyn OpticalGenerator>>,
        options: OffloadOptions,
        aux: &mut AuxRegistry,
        actions: &mut ActionRegistry,
    ) -> Self {
        let aux_id = aux
            .insert(Arc::new(OffloadAuxParams { options }))
            .expect("offload aux registered once");
        let gather = Arc::new(OffloadGatherAction {
            id: actions.next_id(),
            aux_id,
            generators,
        });
        actions.insert(gather).expect("offload gather registers cleanly");
        Self { aux_id }
    }

    /// Finish construction with the nested optical stepper.
    ///
    /// `photon` is the optical-photon species in the *optical* params'
    /// particle table.
    pub fn into_hook(self, optical: Stepper, photon: ParticleId) -> OpticalOffload {
        let seed = optical.params().rng().seed;
        let stream = optical.state().stream_id;
        OpticalOffload {
            aux_id: self.aux_id,
            photon,
            rng: ChaCha8Rng::seed_from_u64(seed ^ (0xa11c << 32) ^ stream.0 as u64),
            optical,
            counters: OffloadCounters::default(),
        }
    }
}

/// The end-of-step flush barrier.
///
/// When the per-stream buffer crosses a threshold, the queued
/// distributions are expanded into photon primaries (uniform emission
/// point along the generating step, isotropic direction) and the
/// nested optical stepper runs them to completion before the charged
/// step call returns.
pub struct OpticalOffload {
    aux_id: AuxId,
    photon: ParticleId,
    rng: ChaCha8Rng,
    optical: Stepper,
    counters: OffloadCounters,
}

impl OpticalOffload {
    /// Completion counters.
    pub fn counters(&self) -> &OffloadCounters {
        &self.counters
    }

    /// The per-stream buffer's aux-state id.
    pub fn aux_id(&self) -> AuxId {
        self.aux_id
    }

    /// The nested optical stepper.
    pub fn optical(&self) -> &Stepper {
        &self.optical
    }

    /// Expand distributions into photon primaries.
    fn generate_primaries(&mut self, distributions: &[GeneratorDistribution]) -> Vec<Primary> {
        let mut primaries = Vec::new();
        for dist in distributions {
            for _ in 0..dist.num_photons {
                let u: f64 = self.rng.random();
                let pos = [
                    dist.pre.pos[0] + u * (dist.post.pos[0] - dist.pre.pos[0]),
                    dist.pre.pos[1] + u * (dist.post.pos[1] - dist.pre.pos[1]),
                    dist.pre.pos[2] + u * (dist.post.pos[2] - dist.pre.pos[2]),
                ];
                let time = dist.pre.time + u * (dist.post.time - dist.pre.time);
                primaries.push(Primary {
                    event_id: dist.event_id,
                    particle_id: self.photon,
                    energy: dist.photon_energy,
                    position: pos,
                    direction: isotropic_direction(&mut self.rng),
                    time,
                });
            }
        }
        primaries
    }

    /// Run the nested pipeline over everything currently buffered.
    pub fn flush(&mut self, state: &mut CoreState) -> Result<(), StepError> {
        let buffer = state
            .aux
            .get_mut::<OffloadBuffer>(self.aux_id)
            .expect("offload buffer exists");
        let distributions = buffer.take();
        if distributions.is_empty() {
            return Ok(());
        }
        let primaries = self.generate_primaries(&distributions);
        log::debug!(
            "flushing {} optical distributions into {} photons",
            distributions.len(),
            primaries.len()
        );
        let result = self.optical.run(&primaries)?;
        self.counters.flushes += 1;
        self.counters.optical_step_iters += result.step_iters as u64;
        Ok(())
    }
}

impl StepHook for OpticalOffload {
    fn label(&self) -> &str {
        "optical-offload"
    }

    fn end_step(&mut self, _params: &CoreParams, state: &mut CoreState) -> Result<(), StepError> {
        let buffer = state
            .aux
            .get::<OffloadBuffer>(self.aux_id)
            .expect("offload buffer exists");
        if !buffer.should_flush() {
            return Ok(());
        }
        self.counters.distributions += buffer.len() as u64;
        self.counters.photons += buffer.num_photons() as u64;
        self.flush(state)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
