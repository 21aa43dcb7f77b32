//! Field-transport scenarios at the stepper level.

use cascade_core::{EventId, ParticleId, Primary, TrackStatus};
use cascade_engine::{Stepper, StepperInput};
use cascade_field::FieldDriverOptions;
use cascade_test_utils::{build_pipeline, FieldSetup, PipelineOptions, TestPipeline};

fn stepper_for(pipeline: &TestPipeline, slots: usize) -> Stepper {
    Stepper::new(StepperInput {
        params: pipeline.params.clone(),
        actions: pipeline.actions.clone(),
        stream_id: cascade_core::StreamId(0),
        num_track_slots: Some(slots),
        initializer_capacity: Some(64),
        hooks: Vec::new(),
    })
    .unwrap()
}

fn electron_at(x: f64, energy: f64) -> Primary {
    Primary {
        event_id: EventId(0),
        particle_id: ParticleId(1),
        energy,
        position: [x, 0.0, 0.0],
        direction: [1.0, 0.0, 0.0],
        time: 0.0,
    }
}

#[test]
fn field_on_subset_curves_then_straightens() {
    // 1 T along z in the innermost x-slab only; no energy loss so the
    // trajectory is purely magnetic.
    let options = PipelineOptions {
        axis: 0,
        electron_dedx: vec![0.0, 0.0],
        field: Some(FieldSetup {
            tesla: 1.0,
            has_field: vec![true, false, false],
            options: FieldDriverOptions::default(),
        }),
        ..Default::default()
    };
    let pipeline = build_pipeline(options, |_, _| {});
    let mut stepper = stepper_for(&pipeline, 4);

    stepper.step(&[electron_at(0.0, 10.0)]).unwrap();
    let state = stepper.state();
    let slot = (0..4)
        .find(|&i| state.sim.status[i] == TrackStatus::Alive)
        .expect("electron survives the first step");
    // Step one curved through the field slab and ended on its surface,
    // already crossed into the field-free neighbor.
    assert!(state.geo.on_boundary[slot]);
    assert!((state.geo.pos[slot][0] - 1.0).abs() < 1e-6);
    assert!(state.geo.pos[slot][1].abs() > 1e-4, "no curvature recorded");
    assert_eq!(state.geo.volume[slot], Some(cascade_core::VolumeId(1)));
    let dir_leaving_field = state.geo.dir[slot];
    assert!(dir_leaving_field[1].abs() > 1e-3);

    // The next step crosses the field-free slab in a straight line:
    // the direction at its far surface is unchanged.
    stepper.step(&[]).unwrap();
    let state = stepper.state();
    assert_eq!(state.sim.status[slot], TrackStatus::Alive);
    assert_eq!(state.geo.volume[slot], Some(cascade_core::VolumeId(2)));
    let dir_now = state.geo.dir[slot];
    for k in 0..3 {
        assert!(
            (dir_now[k] - dir_leaving_field[k]).abs() < 1e-9,
            "direction changed in the field-free slab"
        );
    }
}

#[test]
fn looping_track_is_cut_and_recycled() {
    // A soft electron in a strong everywhere-field with a tiny substep
    // budget makes no progress; the watchdog cuts it after the
    // configured number of zero-progress iterations.
    let options = PipelineOptions {
        axis: 0,
        electron_dedx: vec![0.0, 0.0],
        looping_threshold: 3,
        field: Some(FieldSetup {
            tesla: 50.0,
            has_field: vec![],
            options: FieldDriverOptions {
                max_nsteps: 4,
                ..Default::default()
            },
        }),
        ..Default::default()
    };
    let pipeline = build_pipeline(options, |_, _| {});
    let mut stepper = stepper_for(&pipeline, 4);

    let result = stepper.run(&[electron_at(0.5, 0.01)]).unwrap();
    assert!(result.drained);
    assert_eq!(stepper.state().diag.looping_cuts, 1);
    // The cut deposited the electron's energy and freed its slot.
    assert_eq!(result.counters.vacancies, 4);
    assert_eq!(result.counters.alive, 0);
    // Threshold iterations of propagation limit, then the cut step.
    assert!(result.step_iters >= 4);
}
