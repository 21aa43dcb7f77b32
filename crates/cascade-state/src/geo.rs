//! Geometry and material slot arrays.

use smallvec::SmallVec;

use cascade_core::math::Real3;
use cascade_core::{InstanceChain, PhysMatId, TrackSlotId, VolumeId};

/// Per-slot geometry arrays.
#[derive(Clone, Debug)]
pub struct GeoStates {
    /// Position [cm].
    pub pos: Vec<Real3>,
    /// Unit direction.
    pub dir: Vec<Real3>,
    /// Current volume, `None` on inactive slots.
    pub volume: Vec<Option<VolumeId>>,
    /// Volume-instance chain, bounded by the configured depth.
    pub instances: Vec<InstanceChain>,
    /// Whether the track sits on a volume surface.
    pub on_boundary: Vec<bool>,
}

impl GeoStates {
    /// Allocate for a bank of `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            pos: vec![[0.0; 3]; capacity],
            dir: vec![[0.0; 3]; capacity],
            volume: vec![None; capacity],
            instances: vec![SmallVec::new(); capacity],
            on_boundary: vec![false; capacity],
        }
    }

    /// Clear one slot.
    pub fn clear_slot(&mut self, slot: TrackSlotId) {
        let i = slot.0 as usize;
        self.pos[i] = [0.0; 3];
        self.dir[i] = [0.0; 3];
        self.volume[i] = None;
        self.instances[i].clear();
        self.on_boundary[i] = false;
    }

    /// Copy the geometry of `src` into `dst` (secondary placement).
    pub fn copy_slot(&mut self, src: TrackSlotId, dst: TrackSlotId) {
        let (s, d) = (src.0 as usize, dst.0 as usize);
        self.pos[d] = self.pos[s];
        self.volume[d] = self.volume[s];
        self.instances[d] = self.instances[s].clone();
        self.on_boundary[d] = self.on_boundary[s];
    }
}

/// Per-slot material array, derived from the current volume.
#[derive(Clone, Debug)]
pub struct MaterialStates {
    /// Material of the current volume, `None` on inactive slots.
    pub mat: Vec<Option<PhysMatId>>,
}

impl MaterialStates {
    /// Allocate for a bank of `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            mat: vec![None; capacity],
        }
    }

    /// Clear one slot.
    pub fn clear_slot(&mut self, slot: TrackSlotId) {
        self.mat[slot.0 as usize] = None;
    }
}
