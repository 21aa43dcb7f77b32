//! Physics slot arrays: interaction MFPs and step-local scratch.

use smallvec::SmallVec;

use cascade_core::math::Real3;
use cascade_core::{CutReason, ProcessId, Secondary, TrackSlotId};

/// Inline capacity of the per-slot MFP array.
pub const MFP_INLINE: usize = 4;

/// Inline capacity of the per-slot secondary list.
pub const SECONDARY_INLINE: usize = 2;

/// Per-slot physics arrays.
///
/// The MFP counters persist across steps (and across boundaries) until
/// the owning process interacts; everything else is step-local scratch
/// zeroed by the pre-step action.
#[derive(Clone, Debug)]
pub struct PhysicsStates {
    /// Residual mean free paths per discrete process of the occupying
    /// track's species. `None` means "not yet sampled".
    pub mfp: Vec<SmallVec<[Option<f64>; MFP_INLINE]>>,
    /// Cached MSC range, invalidated on initialization.
    pub msc_range: Vec<Option<f64>>,
    /// Physics-limited step length proposed by pre-step [cm].
    pub step_limit: Vec<f64>,
    /// Process whose MFP produced the step limit.
    pub limit_process: Vec<Option<ProcessId>>,
    /// Energy deposited locally this step [MeV].
    pub eloss: Vec<f64>,
    /// Why the track was cut this step, if it was.
    pub cut_reason: Vec<Option<CutReason>>,
    /// Secondaries produced this step, in production order.
    pub secondaries: Vec<SmallVec<[Secondary; SECONDARY_INLINE]>>,
    /// Position at the start of the step [cm].
    pub step_start_pos: Vec<Real3>,
    /// Time at the start of the step [ns].
    pub step_start_time: Vec<f64>,
}

impl PhysicsStates {
    /// Allocate for a bank of `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            mfp: vec![SmallVec::new(); capacity],
            msc_range: vec![None; capacity],
            step_limit: vec![0.0; capacity],
            limit_process: vec![None; capacity],
            eloss: vec![0.0; capacity],
            cut_reason: vec![None; capacity],
            secondaries: vec![SmallVec::new(); capacity],
            step_start_pos: vec![[0.0; 3]; capacity],
            step_start_time: vec![0.0; capacity],
        }
    }

    /// Reset the per-track physics state when a slot is (re)initialized.
    ///
    /// MFPs are cleared to "unsampled" and sized for `num_processes`
    /// discrete processes of the new track's species.
    pub fn reset_track(&mut self, slot: TrackSlotId, num_processes: usize) {
        let i = slot.0 as usize;
        self.mfp[i].clear();
        self.mfp[i].resize(num_processes, None);
        self.msc_range[i] = None;
        self.step_limit[i] = 0.0;
        self.limit_process[i] = None;
        self.eloss[i] = 0.0;
        self.cut_reason[i] = None;
        self.secondaries[i].clear();
    }

    /// Clear one slot entirely.
    pub fn clear_slot(&mut self, slot: TrackSlotId) {
        let i = slot.0 as usize;
        self.mfp[i].clear();
        self.msc_range[i] = None;
        self.step_limit[i] = 0.0;
        self.limit_process[i] = None;
        self.eloss[i] = 0.0;
        self.cut_reason[i] = None;
        self.secondaries[i].clear();
        self.step_start_pos[i] = [0.0; 3];
        self.step_start_time[i] = 0.0;
    }
}
