//! Canned params and state builders.

use std::sync::Arc;

use cascade_core::{
    ActionId, EventId, Initializer, Primary, StreamId, TrackOrder, TrackSlotId,
};
use cascade_params::{
    AuxRegistry, CoreParams, CoreParamsData, CoreScalars, CutoffParams, GeoMaterialParams,
    GeometryParams, MaterialParams, Navigator, ParticleDef, ParticleParams, ParticlePhysics,
    PhysicsParams, RngParams, SimParams, TrackInitParams,
};
use cascade_state::CoreState;

use crate::navigators::{OneBoxNavigator, SlabNavigator};

/// Scalars whose action ids follow the canonical registration order
/// used by [`build_pipeline`](crate::build_pipeline). Unit tests that
/// exercise one action in isolation construct it with the matching id.
pub(crate) fn canned_scalars() -> CoreScalars {
    CoreScalars {
        init_tracks_action: Some(ActionId(0)),
        pre_step_action: Some(ActionId(1)),
        along_step_action: Some(ActionId(2)),
        along_step_neutral_action: Some(ActionId(3)),
        discrete_select_action: Some(ActionId(4)),
        boundary_action: Some(ActionId(5)),
        tracking_cut_action: Some(ActionId(6)),
        propagation_limit_action: Some(ActionId(7)),
        max_streams: 4,
    }
}

fn gamma_def() -> ParticleDef {
    ParticleDef {
        label: "gamma".into(),
        mass: 0.0,
        charge: 0.0,
    }
}

fn electron_def() -> ParticleDef {
    ParticleDef {
        label: "e-".into(),
        mass: 0.511,
        charge: -1.0,
    }
}

/// A gamma primary at the origin moving along +z.
pub fn gamma_primary(event: u32, energy: f64) -> Primary {
    Primary {
        event_id: EventId(event),
        particle_id: cascade_core::ParticleId(0),
        energy,
        position: [0.0; 3],
        direction: [0.0, 0.0, 1.0],
        time: 0.0,
    }
}

/// An electron primary at the origin moving along +z.
pub fn electron_primary(event: u32, energy: f64) -> Primary {
    Primary {
        particle_id: cascade_core::ParticleId(1),
        ..gamma_primary(event, energy)
    }
}

/// An electron primary at the origin moving along +x.
pub fn electron_primary_along_x(event: u32, energy: f64) -> Primary {
    Primary {
        direction: [1.0, 0.0, 0.0],
        ..electron_primary(event, energy)
    }
}

fn params_from(
    navigator: Arc<dyn Navigator>,
    materials: MaterialParams,
    volume_to_material: Vec<cascade_core::PhysMatId>,
    particles: Vec<ParticleDef>,
    physics: Vec<ParticlePhysics>,
    sim: SimParams,
) -> CoreParams {
    let num_particles = particles.len();
    let num_materials = materials.len();
    CoreParams::new(CoreParamsData {
        geometry: GeometryParams::new(navigator),
        geo_material: GeoMaterialParams {
            volume_to_material: volume_to_material.into_iter().collect(),
        },
        materials,
        particles: ParticleParams::new(particles),
        physics: PhysicsParams {
            per_particle: physics.into_iter().collect(),
        },
        cutoffs: CutoffParams::uniform(num_particles, num_materials, 0.0),
        rng: RngParams { seed: 20240817 },
        sim,
        init: TrackInitParams::default(),
        scalars: canned_scalars(),
        aux: AuxRegistry::new(),
    })
    .expect("canned params validate")
}

/// Single-volume world, one neutral species, no physics.
pub fn minimal_params_and_state(
    capacity: usize,
    initializer_capacity: usize,
) -> (CoreParams, CoreState) {
    let params = params_from(
        Arc::new(OneBoxNavigator),
        MaterialParams::from_labels(["vacuum"]),
        vec![cascade_core::PhysMatId(0)],
        vec![gamma_def()],
        vec![ParticlePhysics::default()],
        SimParams::default(),
    );
    let state = CoreState::new(&params, StreamId(0), capacity, initializer_capacity, 8);
    (params, state)
}

/// State-only variant of [`minimal_params_and_state`].
pub fn minimal_state(capacity: usize, initializer_capacity: usize) -> CoreState {
    minimal_params_and_state(capacity, initializer_capacity).1
}

/// Like [`minimal_params_and_state`] but with by-action partitioning
/// over `num_actions` actions.
pub fn minimal_params_and_state_sorted(
    capacity: usize,
    initializer_capacity: usize,
    num_actions: usize,
) -> (CoreParams, CoreState) {
    let params = params_from(
        Arc::new(OneBoxNavigator),
        MaterialParams::from_labels(["vacuum"]),
        vec![cascade_core::PhysMatId(0)],
        vec![gamma_def()],
        vec![ParticlePhysics::default()],
        SimParams {
            track_order: TrackOrder::PartitionByAction,
            ..SimParams::default()
        },
    );
    let state = CoreState::new(
        &params,
        StreamId(0),
        capacity,
        initializer_capacity,
        num_actions,
    );
    (params, state)
}

/// Three slabs along z (planes at 0, 1, 2, 10), gamma + electron,
/// electron stopping power 2 MeV/cm everywhere, no discrete processes.
pub fn slab_params_and_state(
    capacity: usize,
    initializer_capacity: usize,
) -> (CoreParams, CoreState) {
    let params = params_from(
        Arc::new(SlabNavigator::new(2, vec![0.0, 1.0, 2.0, 10.0])),
        MaterialParams::from_labels(["scint", "tail"]),
        vec![
            cascade_core::PhysMatId(0),
            cascade_core::PhysMatId(0),
            cascade_core::PhysMatId(1),
        ],
        vec![gamma_def(), electron_def()],
        vec![
            ParticlePhysics::default(),
            ParticlePhysics {
                dedx: vec![2.0, 2.0],
                ..Default::default()
            },
        ],
        SimParams::default(),
    );
    let state = CoreState::new(&params, StreamId(0), capacity, initializer_capacity, 8);
    (params, state)
}

/// Three slabs along x (planes at 0, 1, 2, 10), gamma + electron, no
/// energy loss, small looping threshold.
pub fn xslab_params_and_state(
    capacity: usize,
    initializer_capacity: usize,
) -> (CoreParams, CoreState) {
    let params = params_from(
        Arc::new(SlabNavigator::new(0, vec![0.0, 1.0, 2.0, 10.0])),
        MaterialParams::from_labels(["scint", "tail"]),
        vec![
            cascade_core::PhysMatId(0),
            cascade_core::PhysMatId(0),
            cascade_core::PhysMatId(1),
        ],
        vec![gamma_def(), electron_def()],
        vec![ParticlePhysics::default(), ParticlePhysics::default()],
        SimParams {
            looping_threshold: 3,
            ..SimParams::default()
        },
    );
    let state = CoreState::new(&params, StreamId(0), capacity, initializer_capacity, 8);
    (params, state)
}

/// Materialize a primary directly into `slot`, issuing real ids and
/// removing the slot from the vacancy list.
pub fn spawn_track(
    params: &CoreParams,
    state: &mut CoreState,
    slot: TrackSlotId,
    primary: &Primary,
) {
    let primary_id = state.init.next_primary_id();
    let track_id = state.init.next_track_id(primary.event_id);
    let record = Initializer::from_primary(primary, track_id, primary_id);
    cascade_track::initialize::materialize(params, state, slot, &record)
        .expect("primary position is inside the world");
    state.init.vacancies.retain(|&v| v != slot);
    state.counters.num_vacancies = state.init.vacancies.len();
}
