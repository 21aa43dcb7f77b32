//! Offload flush scenario: charged steps source photons, the nested
//! optical pipeline consumes them.

use std::sync::Arc;

use rand::RngCore;

use cascade_core::{EventId, ParticleId, Primary, StreamId};
use cascade_action::ActionRegistry;
use cascade_alongstep::AlongStepNeutralAction;
use cascade_engine::actions::{
    BoundaryAction, DiscreteSelectAction, PreStepAction, PropagationLimitAction,
    TrackingCutAction,
};
use cascade_engine::{Stepper, StepperInput};
use cascade_optical::{
    ChargedStep, GeneratorDistribution, GeneratorKind, OffloadBuffer, OffloadOptions,
    OffloadSetup, OpticalAbsorptionAction, OpticalGenerator, OpticalOffload,
    OpticalRayleighAction, StepPointRecord,
};
use cascade_params::{
    AuxRegistry, CoreParams, CoreParamsData, CoreScalars, CutoffParams, GeoMaterialParams,
    GeometryParams, MaterialParams, ParticleDef, ParticleParams, ParticlePhysics, PhysicsParams,
    ProcessDef, RngParams, SimParams, TrackInitParams,
};
use cascade_test_utils::{build_pipeline, PipelineOptions, SlabNavigator};
use cascade_track::{ExtendFromSecondariesAction, InitializeTracksAction};

/// Emits a fixed 100-photon scintillation distribution for every
/// charged step that deposited energy.
struct MockScintillation;

impl OpticalGenerator for MockScintillation {
    fn label(&self) -> &str {
        "mock-scintillation"
    }

    fn sample(&self, step: &ChargedStep, _rng: &mut dyn RngCore) -> Option<GeneratorDistribution> {
        (step.energy_deposition > 0.0).then(|| GeneratorDistribution {
            kind: GeneratorKind::Scintillation,
            pre: StepPointRecord {
                pos: step.pre_pos,
                time: step.pre_time,
            },
            post: StepPointRecord {
                pos: step.post_pos,
                time: step.post_time,
            },
            step_length: step.step_length,
            charge: step.charge,
            material: step.material,
            event_id: step.event_id,
            num_photons: 100,
            photon_energy: 3e-6,
        })
    }
}

/// A reduced optical pipeline: one photon species, absorption plus
/// Rayleigh scattering, single-volume world.
fn optical_stepper(seed: u64) -> Stepper {
    let mut actions = ActionRegistry::new();
    let init_tracks = actions
        .insert(Arc::new(InitializeTracksAction::new(actions.next_id())))
        .unwrap();
    let pre_step = actions
        .insert(Arc::new(PreStepAction::new(actions.next_id())))
        .unwrap();
    let along = actions
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
    let absorption = actions
        .insert(Arc::new(OpticalAbsorptionAction::new(actions.next_id())))
        .unwrap();
    let rayleigh = actions
        .insert(Arc::new(OpticalRayleighAction::new(actions.next_id())))
        .unwrap();
    actions
        .insert(Arc::new(ExtendFromSecondariesAction::new(actions.next_id())))
        .unwrap();

    let params = CoreParams::new(CoreParamsData {
        geometry: GeometryParams::new(Arc::new(SlabNavigator::new(
            2,
            vec![-100.0, 100.0],
        ))),
        geo_material: GeoMaterialParams {
            volume_to_material: [cascade_core::PhysMatId(0)].into_iter().collect(),
        },
        materials: MaterialParams::from_labels(["lab"]),
        particles: ParticleParams::new([ParticleDef {
            label: "optical-photon".into(),
            mass: 0.0,
            charge: 0.0,
        }]),
        physics: PhysicsParams {
            per_particle: [ParticlePhysics {
                processes: [
                    ProcessDef {
                        label: "absorption".into(),
                        action: absorption,
                        macro_xs: vec![10.0],
                    },
                    ProcessDef {
                        label: "rayleigh".into(),
                        action: rayleigh,
                        macro_xs: vec![1.0],
                    },
                ]
                .into_iter()
                .collect(),
                ..Default::default()
            }]
            .into_iter()
            .collect(),
        },
        cutoffs: CutoffParams::uniform(1, 1, 0.0),
        rng: RngParams { seed },
        sim: SimParams::default(),
        init: TrackInitParams::default(),
        scalars: CoreScalars {
            init_tracks_action: Some(init_tracks),
            pre_step_action: Some(pre_step),
            along_step_action: Some(along),
            along_step_neutral_action: Some(along),
            discrete_select_action: Some(discrete_select),
            boundary_action: Some(boundary),
            tracking_cut_action: Some(tracking_cut),
            propagation_limit_action: Some(propagation_limit),
            max_streams: 4,
        },
        aux: AuxRegistry::new(),
    })
    .unwrap();

    Stepper::new(StepperInput {
        params: Arc::new(params),
        actions: Arc::new(actions),
        stream_id: StreamId(0),
        num_track_slots: Some(512),
        initializer_capacity: Some(1024),
        hooks: Vec::new(),
    })
    .unwrap()
}

fn electron_along_z(energy: f64) -> Primary {
    Primary {
        event_id: EventId(0),
        particle_id: ParticleId(1),
        energy,
        position: [0.0; 3],
        direction: [0.0, 0.0, 1.0],
        time: 0.0,
    }
}

#[test]
fn photon_threshold_flushes_the_nested_pipeline() {
    let mut setup = None;
    let pipeline = build_pipeline(PipelineOptions::default(), |actions, aux| {
        setup = Some(OffloadSetup::new(
            vec![Arc::new(MockScintillation)],
            OffloadOptions {
                buffer_capacity: 1024,
                auto_flush: 256,
            },
            aux,
            actions,
        ));
    });
    let hook = setup
        .expect("offload registered")
        .into_hook(optical_stepper(12345), ParticleId(0));

    let mut stepper = Stepper::new(StepperInput {
        params: pipeline.params.clone(),
        actions: pipeline.actions.clone(),
        stream_id: StreamId(0),
        num_track_slots: Some(8),
        initializer_capacity: Some(16),
        hooks: vec![Box::new(hook)],
    })
    .unwrap();

    // A 10 MeV electron at 2 MeV/cm: two boundary-limited 1 cm steps,
    // then a range-limited step that exhausts its energy. Three
    // depositing steps x 100 photons crosses the 256-photon threshold
    // at the third step.
    let result = stepper.run(&[electron_along_z(10.0)]).unwrap();
    assert!(result.drained);

    let offload: &OpticalOffload = stepper.hook(0).expect("offload hook present");
    let counters = *offload.counters();
    assert_eq!(counters.distributions, 3);
    assert_eq!(counters.photons, 300);
    assert_eq!(counters.flushes, 1);
    assert!(counters.optical_step_iters >= 1);

    // The nested run drained: every photon was absorbed or escaped.
    assert_eq!(offload.optical().counters().alive, 0);

    // The buffer reset when it flushed.
    let aux_id = offload.aux_id();
    let buffer = stepper.state().aux.get::<OffloadBuffer>(aux_id).unwrap();
    assert!(buffer.is_empty());
    assert_eq!(buffer.num_photons(), 0);
}

#[test]
fn below_threshold_keeps_buffering() {
    let mut setup = None;
    let pipeline = build_pipeline(PipelineOptions::default(), |actions, aux| {
        setup = Some(OffloadSetup::new(
            vec![Arc::new(MockScintillation)],
            OffloadOptions {
                buffer_capacity: 1024,
                auto_flush: 100_000,
            },
            aux,
            actions,
        ));
    });
    let hook = setup
        .unwrap()
        .into_hook(optical_stepper(999), ParticleId(0));

    let mut stepper = Stepper::new(StepperInput {
        params: pipeline.params.clone(),
        actions: pipeline.actions.clone(),
        stream_id: StreamId(0),
        num_track_slots: Some(8),
        initializer_capacity: Some(16),
        hooks: vec![Box::new(hook)],
    })
    .unwrap();

    stepper.run(&[electron_along_z(10.0)]).unwrap();
    let offload: &OpticalOffload = stepper.hook(0).unwrap();
    assert_eq!(offload.counters().flushes, 0);
    let buffer = stepper
        .state()
        .aux
        .get::<OffloadBuffer>(offload.aux_id())
        .unwrap();
    assert_eq!(buffer.num_photons(), 300);
    assert_eq!(buffer.len(), 3);
}
