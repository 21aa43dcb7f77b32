//! Bookkeeping shared by the along-step variants.

use std::sync::Arc;

use cascade_core::math::C_LIGHT;
use cascade_core::{CutReason, TrackSlotId};
use cascade_params::CoreParams;
use cascade_state::CoreState;

use crate::fluct::FluctuationModel;
use crate::msc::{MscModel, MscSample, MscStep};

/// The physics-proposed step limit for one slot [cm].
///
/// Combines the pre-step interaction limit with the CSDA range (so a
/// charged track cannot out-run its remaining energy) and the MSC
/// model's own limit.
pub(crate) fn proposed_limit(
    params: &CoreParams,
    state: &mut CoreState,
    slot: TrackSlotId,
    msc: Option<&Arc<dyn MscModel>>,
) -> f64 {
    let i = slot.0 as usize;
    let particle = state.particle.particle_id[i].expect("occupied slot has a particle");
    let mat = state.material.mat[i].expect("occupied slot has a material");
    let energy = state.particle.energy[i];

    let mut limit = state.phys.step_limit[i];
    limit = limit.min(params.physics().range(particle, mat, energy));
    if let Some(msc) = msc {
        let CoreState { phys, rng, .. } = state;
        let msc_limit = msc.step_limit(energy, mat, &mut phys.msc_range[i], &mut rng.engine[i]);
        limit = limit.min(msc_limit);
    }
    limit
}

/// Apply the MSC deflection after propagation.
///
/// Skipped on boundary-limited steps: displacing a track off a surface
/// it just reached would desynchronize the boundary crossing.
pub(crate) fn apply_msc(state: &mut CoreState, slot: TrackSlotId, msc: &Arc<dyn MscModel>) {
    let i = slot.0 as usize;
    let moved = state.sim.step_length[i];
    if moved <= 0.0 || state.geo.on_boundary[i] {
        return;
    }
    let step = MscStep {
        energy: state.particle.energy[i],
        material: state.material.mat[i].expect("occupied slot has a material"),
        step_length: moved,
        direction: state.geo.dir[i],
    };
    let CoreState { geo, rng, .. } = state;
    let MscSample {
        direction,
        displacement,
    } = msc.apply(&step, &mut rng.engine[i]);
    geo.dir[i] = direction;
    geo.pos[i] = cascade_core::math::add(&geo.pos[i], &displacement);
}

/// Apply continuous energy loss over the recorded step and update time.
///
/// A track whose energy falls to the tracking cutoff is marked for the
/// tracking-cut action rather than killed here, so the cut shows up in
/// the pipeline like any other post-step selection.
pub(crate) fn apply_eloss_and_time(
    params: &CoreParams,
    state: &mut CoreState,
    slot: TrackSlotId,
    fluct: Option<&Arc<dyn FluctuationModel>>,
) {
    let i = slot.0 as usize;
    let moved = state.sim.step_length[i];
    let particle = state.particle.particle_id[i].expect("occupied slot has a particle");
    let mat = state.material.mat[i].expect("occupied slot has a material");
    let energy = state.particle.energy[i];

    // Time advances with the pre-step speed.
    let beta = params.particles().beta(particle, energy);
    if beta > 0.0 {
        state.sim.time[i] += moved / (beta * C_LIGHT);
    }

    let dedx = params.physics().dedx(particle, mat);
    if dedx <= 0.0 || moved <= 0.0 {
        return;
    }
    let mean = dedx * moved;
    let mut loss = match fluct {
        Some(fluct) => {
            let CoreState { rng, .. } = state;
            fluct.sample(mean, energy, mat, &mut rng.engine[i])
        }
        None => mean,
    };
    loss = loss.clamp(0.0, energy);

    let remaining = energy - loss;
    let cutoff = params.cutoffs().energy_cutoff(particle, mat);
    if remaining <= cutoff {
        // Deposit everything; the tracking-cut action kills the slot.
        state.phys.eloss[i] += energy;
        state.particle.energy[i] = 0.0;
        state.phys.cut_reason[i] = Some(CutReason::EnergyCutoff);
        state.sim.post_step_action[i] = params.scalars().tracking_cut_action;
    } else {
        state.phys.eloss[i] += loss;
        state.particle.energy[i] = remaining;
    }
}
