//! The step collector and its gather actions.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use cascade_core::math::Real3;
use cascade_core::{
    ActionError, ActionId, AuxId, InstanceChain, StepOrder, StepPoint, TrackStatus, VolumeId,
};
use cascade_action::{ActionRegistry, StepAction};
use cascade_params::{AuxParams, AuxRegistry, CoreParams};
use cascade_state::CoreState;

use crate::interface::{DetectorMap, StepInterface};
use crate::selection::StepSelection;
use crate::step_data::{DetectorStep, DetectorStepBatch};

/// Errors from collector construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CollectError {
    /// No interfaces were supplied.
    NoInterfaces,
    /// Two interfaces map one volume to different detectors.
    ConflictingDetectors {
        /// The contested volume.
        volume: VolumeId,
    },
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoInterfaces => write!(f, "step collector needs at least one interface"),
            Self::ConflictingDetectors { volume } => {
                write!(f, "volume {volume} is mapped to two different detectors")
            }
        }
    }
}

impl Error for CollectError {}

/// Pre-point attributes cached per slot between the two gather passes.
#[derive(Clone, Debug, Default)]
struct PrePoint {
    gathered: bool,
    position: Real3,
    direction: Real3,
    time: f64,
    energy: f64,
    volume: Option<VolumeId>,
    instances: InstanceChain,
}

/// Per-stream gather buffers, registered as auxiliary state.
#[derive(Debug, Default)]
pub(crate) struct StepGatherState {
    pre: Vec<PrePoint>,
}

impl StepGatherState {
    fn new(num_track_slots: usize) -> Self {
        Self {
            pre: vec![PrePoint::default(); num_track_slots],
        }
    }
}

struct StepGatherParams;

impl AuxParams for StepGatherParams {
    fn label(&self) -> &str {
        "step-gather"
    }
    fn create_state(&self, num_track_slots: usize) -> Box<dyn Any + Send> {
        Box::new(StepGatherState::new(num_track_slots))
    }
}

/// Configuration shared by the collector and its two gather actions.
struct CollectorShared {
    aux_id: AuxId,
    selection: StepSelection,
    detectors: Option<DetectorMap>,
    nonzero_energy_deposition: bool,
    interfaces: Vec<Arc<dyn StepInterface>>,
}

/// Gathers step attributes and delivers them to callback interfaces.
///
/// Construction merges the interfaces' selections, unions their
/// detector maps, registers the per-stream gather buffers in the aux
/// registry, and installs two actions: a pre-point gather right after
/// the core pre-step and a post-point gather before secondary
/// extension. The collector itself holds no per-stream data.
pub struct StepCollector {
    shared: Arc<CollectorShared>,
}

impl StepCollector {
    /// Build and register everything the collector needs.
    ///
    /// Call during setup, before the params and registry freeze.
    pub fn new(
        interfaces: Vec<Arc<dyn StepInterface>>,
        aux: &mut AuxRegistry,
        actions: &mut ActionRegistry,
    ) -> Result<Self, CollectError> {
        if interfaces.is_empty() {
            return Err(CollectError::NoInterfaces);
        }

        let mut selection = StepSelection::default();
        let mut detectors: Option<DetectorMap> = None;
        let mut nonzero = true;
        for interface in &interfaces {
            selection.merge(&interface.selection());
            nonzero &= interface.nonzero_energy_deposition();
            if let Some(map) = interface.detector_map() {
                let union = detectors.get_or_insert_with(DetectorMap::new);
                for (&volume, &detector) in map {
                    match union.get(&volume) {
                        Some(&existing) if existing != detector => {
                            return Err(CollectError::ConflictingDetectors { volume });
                        }
                        _ => {
                            union.insert(volume, detector);
                        }
                    }
                }
            }
        }

        let aux_id = aux
            .insert(Arc::new(StepGatherParams))
            .expect("step-gather aux registered once");
        let shared = Arc::new(CollectorShared {
            aux_id,
            selection,
            detectors,
            nonzero_energy_deposition: nonzero,
            interfaces,
        });

        let pre = Arc::new(StepGatherAction {
            id: actions.next_id(),
            point: StepPoint::Pre,
            shared: Arc::clone(&shared),
        });
        actions.insert(pre).expect("pre gather registers cleanly");
        let post = Arc::new(StepGatherAction {
            id: actions.next_id(),
            point: StepPoint::Post,
            shared: Arc::clone(&shared),
        });
        actions.insert(post).expect("post gather registers cleanly");

        Ok(Self { shared })
    }

    /// The merged attribute selection.
    pub fn selection(&self) -> &StepSelection {
        &self.shared.selection
    }

    /// The unioned detector map, when any interface declared one.
    pub fn detectors(&self) -> Option<&DetectorMap> {
        self.shared.detectors.as_ref()
    }
}

/// One of the collector's two gather passes.
struct StepGatherAction {
    id: ActionId,
    point: StepPoint,
    shared: Arc<CollectorShared>,
}

impl StepGatherAction {
    fn gather_pre(&self, state: &mut CoreState) {
        let select = *self.shared.selection.point(StepPoint::Pre);
        let capacity = state.capacity();
        let CoreState {
            sim,
            particle,
            geo,
            aux,
            ..
        } = state;
        let gather = aux
            .get_mut::<StepGatherState>(self.shared.aux_id)
            .expect("gather aux state exists");
        for i in 0..capacity {
            let pre = &mut gather.pre[i];
            pre.gathered = sim.status[i] == TrackStatus::Alive;
            if !pre.gathered {
                continue;
            }
            if select.position {
                pre.position = geo.pos[i];
            }
            if select.direction {
                pre.direction = geo.dir[i];
            }
            if select.time {
                pre.time = sim.time[i];
            }
            if select.energy {
                pre.energy = particle.energy[i];
            }
            // Volume is always cached: the detector filter needs it.
            pre.volume = geo.volume[i];
            if select.volume_instances {
                pre.instances = geo.instances[i].clone();
            }
        }
    }

    fn gather_post(&self, state: &CoreState) -> Option<DetectorStepBatch> {
        let shared = &*self.shared;
        let selection = &shared.selection;
        let post_select = *selection.point(StepPoint::Post);
        let pre_select = *selection.point(StepPoint::Pre);
        let mut batch = DetectorStepBatch::default();

        for i in 0..state.capacity() {
            if state.sim.status[i] == TrackStatus::Inactive {
                continue;
            }
            let gather = state
                .aux
                .get::<StepGatherState>(shared.aux_id)
                .expect("gather aux state exists");
            let pre = &gather.pre[i];
            if !pre.gathered {
                // The slot was filled after the pre pass; no step yet.
                continue;
            }
            // Detector assignment uses the volume the step occurred in.
            let detector = match &shared.detectors {
                Some(map) => match pre.volume.and_then(|v| map.get(&v).copied()) {
                    Some(detector) => Some(detector),
                    None => continue,
                },
                None => None,
            };
            if shared.nonzero_energy_deposition && state.phys.eloss[i] == 0.0 {
                continue;
            }

            let mut row = DetectorStep {
                detector,
                ..Default::default()
            };
            if selection.track_id {
                row.track_id = state.sim.track_id[i];
            }
            if selection.event_id {
                row.event_id = state.sim.event_id[i];
            }
            if selection.parent_id {
                row.parent_id = state.sim.parent_id[i];
            }
            if selection.particle {
                row.particle = state.particle.particle_id[i];
            }
            if selection.action {
                row.action = state.sim.post_step_action[i];
            }
            if selection.energy_deposition {
                row.energy_deposition = state.phys.eloss[i];
            }
            if selection.step_length {
                row.step_length = state.sim.step_length[i];
            }

            let pre_point = &mut row.points[StepPoint::Pre.index()];
            if pre_select.position {
                pre_point.position = Some(pre.position);
            }
            if pre_select.direction {
                pre_point.direction = Some(pre.direction);
            }
            if pre_select.time {
                pre_point.time = Some(pre.time);
            }
            if pre_select.energy {
                pre_point.energy = Some(pre.energy);
            }
            if pre_select.volume {
                pre_point.volume = pre.volume;
            }
            if pre_select.volume_instances {
                pre_point.instances = pre.instances.clone();
            }

            let post_point = &mut row.points[StepPoint::Post.index()];
            if post_select.position {
                post_point.position = Some(state.geo.pos[i]);
            }
            if post_select.direction {
                post_point.direction = Some(state.geo.dir[i]);
            }
            if post_select.time {
                post_point.time = Some(state.sim.time[i]);
            }
            if post_select.energy {
                post_point.energy = Some(state.particle.energy[i]);
            }
            if post_select.volume {
                post_point.volume = state.geo.volume[i];
            }
            if post_select.volume_instances {
                post_point.instances = state.geo.instances[i].clone();
            }

            batch.steps.push(row);
        }

        (!batch.is_empty()).then_some(batch)
    }
}

impl StepAction for StepGatherAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        match self.point {
            StepPoint::Pre => "step-gather-pre",
            StepPoint::Post => "step-gather-post",
        }
    }

    fn description(&self) -> &str {
        "record step attributes for detector callbacks"
    }

    fn order(&self) -> StepOrder {
        match self.point {
            StepPoint::Pre => StepOrder::PreStep,
            StepPoint::Post => StepOrder::PostPost,
        }
    }

    fn execute(&self, _params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError> {
        match self.point {
            StepPoint::Pre => self.gather_pre(state),
            StepPoint::Post => {
                if let Some(batch) = self.gather_post(state) {
                    for interface in &self.shared.interfaces {
                        interface.process(&batch);
                    }
                }
            }
        }
        Ok(())
    }
}
