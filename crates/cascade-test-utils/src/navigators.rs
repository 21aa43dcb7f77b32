//! Mock geometry navigators.

use smallvec::smallvec;

use cascade_core::{InstanceChain, Real3, VolumeId, VolumeInstanceId};
use cascade_params::Navigator;

/// A single volume covering all of space.
///
/// Useful for state bookkeeping tests where no track ever moves; the
/// volume is unbounded, so any real step must be physics-limited.
pub struct OneBoxNavigator;

impl Navigator for OneBoxNavigator {
    fn num_volumes(&self) -> usize {
        1
    }

    fn locate(&self, _pos: &Real3) -> Option<VolumeId> {
        Some(VolumeId(0))
    }

    fn distance_to_boundary(&self, _pos: &Real3, _dir: &Real3, _volume: VolumeId) -> f64 {
        f64::INFINITY
    }

    fn cross_boundary(&self, _pos: &Real3, _dir: &Real3, _volume: VolumeId) -> Option<VolumeId> {
        None
    }

    fn instance_chain(&self, _volume: VolumeId) -> InstanceChain {
        smallvec![VolumeInstanceId(0)]
    }

    fn volume_label(&self, _volume: VolumeId) -> &str {
        "world"
    }
}

/// Parallel slabs along one axis.
///
/// `planes` are the n+1 surfaces bounding n volumes; positions beyond
/// the outermost planes are outside the world. The other two axes are
/// unbounded, so only motion along `axis` sees surfaces.
pub struct SlabNavigator {
    axis: usize,
    planes: Vec<f64>,
    labels: Vec<String>,
}

impl SlabNavigator {
    pub fn new(axis: usize, planes: Vec<f64>) -> Self {
        assert!(axis < 3);
        assert!(planes.len() >= 2);
        assert!(planes.windows(2).all(|w| w[0] < w[1]));
        let labels = (0..planes.len() - 1).map(|i| format!("slab{i}")).collect();
        Self {
            axis,
            planes,
            labels,
        }
    }

    fn num_slabs(&self) -> usize {
        self.planes.len() - 1
    }
}

impl Navigator for SlabNavigator {
    fn num_volumes(&self) -> usize {
        self.num_slabs()
    }

    fn locate(&self, pos: &Real3) -> Option<VolumeId> {
        let x = pos[self.axis];
        (0..self.num_slabs())
            .find(|&i| self.planes[i] <= x && x < self.planes[i + 1])
            .map(|i| VolumeId(i as u32))
    }

    fn distance_to_boundary(&self, pos: &Real3, dir: &Real3, volume: VolumeId) -> f64 {
        let x = pos[self.axis];
        let d = dir[self.axis];
        if d == 0.0 {
            return f64::INFINITY;
        }
        let target = if d > 0.0 {
            self.planes[volume.0 as usize + 1]
        } else {
            self.planes[volume.0 as usize]
        };
        ((target - x) / d).max(0.0)
    }

    fn cross_boundary(&self, _pos: &Real3, dir: &Real3, volume: VolumeId) -> Option<VolumeId> {
        let v = volume.0 as usize;
        if dir[self.axis] > 0.0 {
            (v + 1 < self.num_slabs()).then(|| VolumeId(volume.0 + 1))
        } else if dir[self.axis] < 0.0 {
            (v > 0).then(|| VolumeId(volume.0 - 1))
        } else {
            Some(volume)
        }
    }

    fn instance_chain(&self, volume: VolumeId) -> InstanceChain {
        smallvec![VolumeInstanceId(0), VolumeInstanceId(volume.0 + 1)]
    }

    fn volume_label(&self, volume: VolumeId) -> &str {
        &self.labels[volume.0 as usize]
    }
}
