//! Full-pipeline builder for integration tests.

use std::sync::Arc;

use cascade_core::{
    ActionError, ActionId, ParticleId, PhysMatId, Secondary, StepOrder, TrackFault, TrackOrder,
    TrackStatus,
};
use cascade_action::{launch_post, ActionRegistry, StepAction};
use cascade_alongstep::{
    AlongStepFieldMscAction, AlongStepGeneralLinearAction, AlongStepNeutralAction,
};
use cascade_field::{FieldDriverOptions, UniformField};
use cascade_engine::actions::{
    BoundaryAction, DiscreteSelectAction, PreStepAction, PropagationLimitAction,
    TrackingCutAction,
};
use cascade_params::{
    AuxRegistry, CoreParams, CoreParamsData, CoreScalars, CutoffParams, GeoMaterialParams,
    GeometryParams, MaterialParams, ParticleDef, ParticleParams, ParticlePhysics, PhysicsParams,
    ProcessDef, RngParams, SimParams, TrackInitParams,
};
use cascade_state::CoreState;
use cascade_track::{
    ExtendFromSecondariesAction, InitializeTracksAction, SortTracksAction, StatusCheckAction,
};

use crate::navigators::SlabNavigator;

/// Configurable mock interaction kernel.
///
/// Applies to slots that selected it, optionally producing secondaries
/// (half the parent's energy each, parent direction) and optionally
/// killing the parent with its energy deposited.
pub struct MockInteractAction {
    id: ActionId,
    label: String,
    config: MockInteractConfig,
}

/// Behavior knobs for [`MockInteractAction`].
#[derive(Clone, Copy, Debug)]
pub struct MockInteractConfig {
    /// Secondaries produced per interaction.
    pub secondaries: u32,
    /// Species of the produced secondaries.
    pub secondary_particle: ParticleId,
    /// Child energy as a fraction of the parent's pre-interaction
    /// energy.
    pub energy_fraction: f64,
    /// Kill the parent, depositing its remaining energy.
    pub kill: bool,
}

impl Default for MockInteractConfig {
    fn default() -> Self {
        Self {
            secondaries: 0,
            secondary_particle: ParticleId(0),
            energy_fraction: 0.5,
            kill: false,
        }
    }
}

impl MockInteractAction {
    pub fn new(id: ActionId, label: impl Into<String>, config: MockInteractConfig) -> Self {
        Self {
            id,
            label: label.into(),
            config,
        }
    }
}

impl StepAction for MockInteractAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn order(&self) -> StepOrder {
        StepOrder::Post
    }

    fn execute(&self, _params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError> {
        let config = self.config;
        launch_post(state, self.id, |state, slot| {
            let i = slot.0 as usize;
            let energy = state.particle.energy[i];
            for _ in 0..config.secondaries {
                state.phys.secondaries[i].push(Secondary {
                    particle_id: config.secondary_particle,
                    energy: energy * config.energy_fraction,
                    direction: state.geo.dir[i],
                    weight: 1.0,
                });
            }
            if config.kill {
                state.phys.eloss[i] += energy;
                state.particle.energy[i] = 0.0;
                state.sim.status[i] = TrackStatus::Killed;
            }
            Ok(())
        })
    }
}

/// An interaction kernel that faults on every slot it touches.
pub struct FailingInteractAction {
    id: ActionId,
}

impl FailingInteractAction {
    pub fn new(id: ActionId) -> Self {
        Self { id }
    }
}

impl StepAction for FailingInteractAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        "mock-failing"
    }

    fn order(&self) -> StepOrder {
        StepOrder::Post
    }

    fn execute(&self, _params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError> {
        launch_post(state, self.id, |_, _| {
            Err(TrackFault::InvariantFailure {
                what: "mock failure".into(),
            })
        })
    }
}

/// Uniform-field configuration for the charged along-step.
#[derive(Clone, Debug)]
pub struct FieldSetup {
    /// Field strength along +z [T].
    pub tesla: f64,
    /// Per-volume enable mask; empty applies the field everywhere.
    pub has_field: Vec<bool>,
    /// Driver options.
    pub options: FieldDriverOptions,
}

/// Options for [`build_pipeline`].
pub struct PipelineOptions {
    /// Slab axis for the world (three volumes, planes 0, 1, 2, 10).
    pub axis: usize,
    /// Macroscopic cross section of the gamma scatter process, per
    /// material [1/cm].
    pub gamma_xs: Vec<f64>,
    /// Electron stopping power per material [MeV/cm].
    pub electron_dedx: Vec<f64>,
    /// Mock scatter behavior.
    pub interact: MockInteractConfig,
    /// Replace the scatter kernel with one that faults on every slot.
    pub interact_fails: bool,
    /// Install a uniform-field along-step instead of the linear one.
    pub field: Option<FieldSetup>,
    /// Slot traversal order.
    pub track_order: TrackOrder,
    /// Looping watchdog threshold.
    pub looping_threshold: u32,
    /// Substep cap for `run()`.
    pub max_substeps: u32,
    /// Install the end-of-pipeline consistency check.
    pub status_check: bool,
    /// RNG seed.
    pub seed: u64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            axis: 2,
            gamma_xs: vec![1.0, 1.0],
            electron_dedx: vec![2.0, 2.0],
            interact: MockInteractConfig::default(),
            interact_fails: false,
            field: None,
            track_order: TrackOrder::Unsorted,
            looping_threshold: 16,
            max_substeps: 256,
            status_check: true,
            seed: 20240817,
        }
    }
}

/// A complete, validated setup: params plus a frozen registry.
pub struct TestPipeline {
    pub params: Arc<CoreParams>,
    pub actions: Arc<ActionRegistry>,
    /// The mock gamma scatter kernel's id.
    pub scatter_action: ActionId,
}

/// Build a full pipeline over the slab world.
///
/// Registration order: initialize-tracks, pre-step, along-step (linear, neutral),
/// discrete-select, boundary, tracking-cut, propagation-limit, then
/// sort-tracks, the mock gamma scatter, `customize` extras, secondary
/// extension, and optionally the status check.
///
/// `customize` runs before the secondary extension is registered so
/// gather-style actions land at the right place in the post-post
/// order; it may also register aux-state factories.
pub fn build_pipeline(
    options: PipelineOptions,
    customize: impl FnOnce(&mut ActionRegistry, &mut AuxRegistry),
) -> TestPipeline {
    let mut actions = ActionRegistry::new();
    let mut aux = AuxRegistry::new();

    let init_tracks = actions
        .insert(Arc::new(InitializeTracksAction::new(actions.next_id())))
        .unwrap();
    let pre_step = actions
        .insert(Arc::new(PreStepAction::new(actions.next_id())))
        .unwrap();
    let along = match &options.field {
        None => actions
            .insert(Arc::new(AlongStepGeneralLinearAction::new(
                actions.next_id(),
                None,
                None,
            )))
            .unwrap(),
        Some(setup) => actions
            .insert(Arc::new(
                AlongStepFieldMscAction::new(
                    actions.next_id(),
                    UniformField::along_z(setup.tesla),
                    setup.options,
                    setup.has_field.clone(),
                    None,
                    None,
                )
                .expect("field options validate"),
            ))
            .unwrap(),
    };
    let along_neutral = actions
        .insert(Arc::new(AlongStepNeutralAction::new(actions.next_id())))
        .unwrap();
    let discrete_select = actions
        .insert(Arc::new(DiscreteSelectAction::new(actions.next_id())))
        .unwrap();
    let boundary = actions
        .insert(Arc::new(BoundaryAction::new(actions.next_id())))
        .unwrap();
    let tracking_cut = actions
        .insert(Arc::new(TrackingCutAction::new(actions.next_id())))
        .unwrap();
    let propagation_limit = actions
        .insert(Arc::new(PropagationLimitAction::new(actions.next_id())))
        .unwrap();
    actions
        .insert(Arc::new(SortTracksAction::new(actions.next_id())))
        .unwrap();
    let scatter_action = if options.interact_fails {
        actions
            .insert(Arc::new(FailingInteractAction::new(actions.next_id())))
            .unwrap()
    } else {
        actions
            .insert(Arc::new(MockInteractAction::new(
                actions.next_id(),
                "mock-scatter",
                options.interact,
            )))
            .unwrap()
    };

    customize(&mut actions, &mut aux);

    actions
        .insert(Arc::new(ExtendFromSecondariesAction::new(actions.next_id())))
        .unwrap();
    if options.status_check {
        actions
            .insert(Arc::new(StatusCheckAction::new(actions.next_id())))
            .unwrap();
    }

    let scalars = CoreScalars {
        init_tracks_action: Some(init_tracks),
        pre_step_action: Some(pre_step),
        along_step_action: Some(along),
        along_step_neutral_action: Some(along_neutral),
        discrete_select_action: Some(discrete_select),
        boundary_action: Some(boundary),
        tracking_cut_action: Some(tracking_cut),
        propagation_limit_action: Some(propagation_limit),
        max_streams: 4,
    };

    let params = CoreParams::new(CoreParamsData {
        geometry: GeometryParams::new(Arc::new(SlabNavigator::new(
            options.axis,
            vec![0.0, 1.0, 2.0, 10.0],
        ))),
        geo_material: GeoMaterialParams {
            volume_to_material: [PhysMatId(0), PhysMatId(0), PhysMatId(1)]
                .into_iter()
                .collect(),
        },
        materials: MaterialParams::from_labels(["scint", "tail"]),
        particles: ParticleParams::new([
            ParticleDef {
                label: "gamma".into(),
                mass: 0.0,
                charge: 0.0,
            },
            ParticleDef {
                label: "e-".into(),
                mass: 0.511,
                charge: -1.0,
            },
        ]),
        physics: PhysicsParams {
            per_particle: [
                ParticlePhysics {
                    processes: [ProcessDef {
                        label: "mock-scatter-process".into(),
                        action: scatter_action,
                        macro_xs: options.gamma_xs.clone(),
                    }]
                    .into_iter()
                    .collect(),
                    ..Default::default()
                },
                ParticlePhysics {
                    dedx: options.electron_dedx.clone(),
                    ..Default::default()
                },
            ]
            .into_iter()
            .collect(),
        },
        cutoffs: CutoffParams::uniform(2, 2, 0.0),
        rng: RngParams { seed: options.seed },
        sim: SimParams {
            looping_threshold: options.looping_threshold,
            max_substeps: options.max_substeps,
            track_order: options.track_order,
            secondary_stack_factor: 3.0,
            status_check: options.status_check,
        },
        init: TrackInitParams::default(),
        scalars,
        aux,
    })
    .expect("pipeline params validate");

    TestPipeline {
        params: Arc::new(params),
        actions: Arc::new(actions),
        scatter_action,
    }
}
