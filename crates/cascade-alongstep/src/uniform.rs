//! Along-step through a magnetic field.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cascade_core::{ActionError, ActionId, CutReason, StepOrder, TrackFault};
use cascade_action::{launch_along, StepAction};
use cascade_field::{
    FieldDriverOptions, FieldError, FieldPropagator, FieldSource, RZMapField, UniformField,
};
use cascade_params::CoreParams;
use cascade_state::CoreState;

use crate::common;
use crate::fluct::FluctuationModel;
use crate::msc::MscModel;

/// Along-step for charged tracks in a magnetic field, with optional
/// MSC and energy-loss fluctuation.
///
/// A per-volume mask selects where the field applies; tracks in
/// unmasked volumes move in a straight line. An empty mask means the
/// field is present in every volume. Zero-progress propagation feeds
/// the looping watchdog: after `looping_threshold` consecutive
/// iterations the track is cut with its energy deposited locally.
pub struct AlongStepFieldMscAction<F: FieldSource> {
    id: ActionId,
    field: F,
    options: FieldDriverOptions,
    has_field: Vec<bool>,
    msc: Option<Arc<dyn MscModel>>,
    fluct: Option<Arc<dyn FluctuationModel>>,
    warned_failure: AtomicBool,
}

/// Field along-step over a spatially constant field.
pub type AlongStepUniformFieldAction = AlongStepFieldMscAction<UniformField>;

/// Field along-step over an (r, z)-gridded field.
pub type AlongStepRZMapFieldAction = AlongStepFieldMscAction<RZMapField>;

impl<F: FieldSource> AlongStepFieldMscAction<F> {
    /// Construct with the id the registry is about to assign.
    ///
    /// `has_field` is indexed by volume id; empty enables the field
    /// everywhere. Fails when the driver options are invalid.
    pub fn new(
        id: ActionId,
        field: F,
        options: FieldDriverOptions,
        has_field: Vec<bool>,
        msc: Option<Arc<dyn MscModel>>,
        fluct: Option<Arc<dyn FluctuationModel>>,
    ) -> Result<Self, FieldError> {
        options.validate()?;
        Ok(Self {
            id,
            field,
            options,
            has_field,
            msc,
            fluct,
            warned_failure: AtomicBool::new(false),
        })
    }

    fn field_in(&self, volume: cascade_core::VolumeId) -> bool {
        self.has_field.is_empty()
            || self
                .has_field
                .get(volume.0 as usize)
                .copied()
                .unwrap_or(false)
    }
}

impl<F: FieldSource + 'static> StepAction for AlongStepFieldMscAction<F> {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        "along-step-field-msc"
    }

    fn description(&self) -> &str {
        "field propagation with optional MSC and energy loss"
    }

    fn order(&self) -> StepOrder {
        StepOrder::Along
    }

    fn execute(&self, params: &CoreParams, state: &mut CoreState) -> Result<(), ActionError> {
        let scalars = *params.scalars();
        let looping_threshold = params.sim().looping_threshold;
        launch_along(state, self.id, |state, slot| {
            let i = slot.0 as usize;
            let limit = common::proposed_limit(params, state, slot, self.msc.as_ref());
            let volume = state.geo.volume[i].expect("occupied slot has a volume");
            let particle = state.particle.particle_id[i].expect("occupied slot has a particle");

            if !self.field_in(volume) {
                // Linear motion outside the masked volumes.
                let to_boundary = params.geometry().navigator.distance_to_boundary(
                    &state.geo.pos[i],
                    &state.geo.dir[i],
                    volume,
                );
                let boundary = to_boundary <= limit;
                let moved = limit.min(to_boundary);
                if !moved.is_finite() {
                    return Err(TrackFault::Geometry {
                        what: "unbounded step: no physics limit and no boundary".into(),
                    });
                }
                let dir = state.geo.dir[i];
                state.geo.pos[i] = cascade_core::math::axpy(moved, &dir, &state.geo.pos[i]);
                state.sim.step_length[i] = moved;
                state.geo.on_boundary[i] = boundary;
                if boundary {
                    state.sim.post_step_action[i] = scalars.boundary_action;
                }
                state.sim.num_looping_steps[i] = 0;
            } else {
                let momentum = params
                    .particles()
                    .momentum(particle, state.particle.energy[i]);
                let propagator = FieldPropagator::new(
                    &self.field,
                    self.options,
                    params.particles().charge(particle),
                    params.geometry().navigator.as_ref(),
                );
                let result = propagator.advance(
                    state.geo.pos[i],
                    state.geo.dir[i],
                    momentum,
                    volume,
                    limit,
                );

                state.geo.pos[i] = result.pos;
                state.geo.dir[i] = result.dir;
                state.sim.step_length[i] = result.distance;
                state.geo.on_boundary[i] = result.boundary;

                if result.boundary {
                    state.sim.post_step_action[i] = scalars.boundary_action;
                    state.sim.num_looping_steps[i] = 0;
                } else if result.distance == 0.0 {
                    // The propagator could not move the track at all.
                    if !self.warned_failure.swap(true, Ordering::Relaxed) {
                        log::warn!(
                            "field propagation failed to change position \
                             (slot {slot}, volume {volume}); cutting track"
                        );
                    }
                    state.phys.cut_reason[i] = Some(CutReason::FieldFailure);
                    state.sim.post_step_action[i] = scalars.tracking_cut_action;
                } else if result.looping {
                    state.sim.num_looping_steps[i] += 1;
                    if state.sim.num_looping_steps[i] > looping_threshold {
                        state.phys.cut_reason[i] = Some(CutReason::Looping);
                        state.sim.post_step_action[i] = scalars.tracking_cut_action;
                    } else {
                        state.sim.post_step_action[i] = scalars.propagation_limit_action;
                    }
                } else {
                    state.sim.num_looping_steps[i] = 0;
                }
            }

            if let Some(msc) = &self.msc {
                common::apply_msc(state, slot, msc);
            }
            common::apply_eloss_and_time(params, state, slot, self.fluct.as_ref());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::TrackSlotId;
    use cascade_test_utils::{electron_primary_along_x, xslab_params_and_state, spawn_track};

    fn field_action(
        tesla: f64,
        has_field: Vec<bool>,
        options: FieldDriverOptions,
    ) -> AlongStepUniformFieldAction {
        AlongStepFieldMscAction::new(
            ActionId(2),
            UniformField::along_z(tesla),
            options,
            has_field,
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn field_curves_the_track_inside_masked_volumes() {
        let (params, mut state) = xslab_params_and_state(4, 16);
        spawn_track(
            &params,
            &mut state,
            TrackSlotId(0),
            &electron_primary_along_x(0, 10.0),
        );
        state.phys.step_limit[0] = 0.5;

        // Field enabled in the first two volumes only.
        let action = field_action(1.0, vec![true, true, false], FieldDriverOptions::default());
        action.execute(&params, &mut state).unwrap();

        // The electron bends away from the x axis.
        assert!(state.geo.pos[0][1].abs() > 1e-4);
        assert!((state.sim.step_length[0] - 0.5).abs() < 1e-9);
        assert!(!state.geo.on_boundary[0]);
    }

    #[test]
    fn unmasked_volume_moves_straight() {
        let (params, mut state) = xslab_params_and_state(4, 16);
        spawn_track(
            &params,
            &mut state,
            TrackSlotId(0),
            &electron_primary_along_x(0, 10.0),
        );
        // Start the track in the third (unmasked) volume.
        state.geo.pos[0] = [2.5, 0.0, 0.0];
        state.geo.volume[0] = Some(cascade_core::VolumeId(2));
        state.phys.step_limit[0] = 0.5;

        let action = field_action(1.0, vec![true, true, false], FieldDriverOptions::default());
        action.execute(&params, &mut state).unwrap();

        assert_eq!(state.geo.pos[0][1], 0.0);
        assert_eq!(state.geo.dir[0], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_mask_applies_the_field_everywhere() {
        let (params, mut state) = xslab_params_and_state(4, 16);
        spawn_track(
            &params,
            &mut state,
            TrackSlotId(0),
            &electron_primary_along_x(0, 10.0),
        );
        state.geo.pos[0] = [2.5, 0.0, 0.0];
        state.geo.volume[0] = Some(cascade_core::VolumeId(2));
        state.phys.step_limit[0] = 0.5;

        let action = field_action(1.0, vec![], FieldDriverOptions::default());
        action.execute(&params, &mut state).unwrap();

        assert!(state.geo.pos[0][1].abs() > 1e-4);
    }

    #[test]
    fn looping_track_is_cut_after_the_threshold() {
        let (params, mut state) = xslab_params_and_state(4, 16);
        spawn_track(
            &params,
            &mut state,
            TrackSlotId(0),
            &electron_primary_along_x(0, 0.01),
        );
        // Orbit in the middle of the slab so no surface interferes.
        state.geo.pos[0] = [0.5, 0.0, 0.0];
        state.phys.step_limit[0] = 10.0;

        // A strong field and a tiny substep budget force looping every
        // iteration; the threshold in the slab params is small.
        let options = FieldDriverOptions {
            max_nsteps: 4,
            ..Default::default()
        };
        let action = field_action(50.0, vec![], options);

        let threshold = params.sim().looping_threshold;
        for _ in 0..threshold {
            action.execute(&params, &mut state).unwrap();
            assert_eq!(
                state.sim.post_step_action[0],
                params.scalars().propagation_limit_action
            );
        }
        action.execute(&params, &mut state).unwrap();
        assert_eq!(
            state.sim.post_step_action[0],
            params.scalars().tracking_cut_action
        );
        assert_eq!(state.phys.cut_reason[0], Some(CutReason::Looping));
    }

    #[test]
    fn invalid_driver_options_are_rejected() {
        let options = FieldDriverOptions {
            delta_chord: -1.0,
            ..Default::default()
        };
        assert!(AlongStepFieldMscAction::new(
            ActionId(2),
            UniformField::along_z(1.0),
            options,
            vec![],
            None,
            None,
        )
        .is_err());
    }
}
