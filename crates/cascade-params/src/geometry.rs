//! The geometry interface consumed by the core.
//!
//! Navigation itself (solid modeling, surface crossing, hierarchy
//! bookkeeping) lives outside the engine; the core only needs the
//! operations below. Implementations wrap whatever navigator the host
//! framework provides.

use std::fmt;
use std::sync::Arc;

use cascade_core::math::Real3;
use cascade_core::{InstanceChain, VolumeId};

/// Abstract geometry navigator.
///
/// Distances are in cm. Directions passed in are unit vectors. A
/// navigator is immutable and shared by every stream; all per-track
/// navigation state (current volume, instance chain) lives in the
/// track-slot state, not in the navigator.
pub trait Navigator: Send + Sync {
    /// Number of logical volumes, bounding every `VolumeId`.
    fn num_volumes(&self) -> usize;

    /// Find the volume containing a point, or `None` outside the world.
    fn locate(&self, pos: &Real3) -> Option<VolumeId>;

    /// Distance from `pos` along `dir` to the exit of `volume`.
    ///
    /// Returns `f64::INFINITY` when the volume is unbounded in that
    /// direction.
    fn distance_to_boundary(&self, pos: &Real3, dir: &Real3, volume: VolumeId) -> f64;

    /// Cross the boundary at `pos` (already on the surface of
    /// `volume`), entering the next volume along `dir`.
    ///
    /// Returns `None` when the track exits the outermost volume.
    fn cross_boundary(&self, pos: &Real3, dir: &Real3, volume: VolumeId) -> Option<VolumeId>;

    /// The volume-instance chain from the world down to `volume`.
    fn instance_chain(&self, volume: VolumeId) -> InstanceChain;

    /// Human-readable volume name for diagnostics.
    fn volume_label(&self, volume: VolumeId) -> &str;
}

/// Geometry parameters: the shared navigator plus recording limits.
#[derive(Clone)]
pub struct GeometryParams {
    /// The shared navigator.
    pub navigator: Arc<dyn Navigator>,
    /// Maximum depth of the volume-instance chain recorded per slot.
    pub volume_instance_depth: usize,
}

impl GeometryParams {
    /// Construct with the default recording depth.
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            navigator,
            volume_instance_depth: cascade_core::INSTANCE_CHAIN_INLINE,
        }
    }

    /// Number of logical volumes.
    pub fn num_volumes(&self) -> usize {
        self.navigator.num_volumes()
    }

    /// The instance chain for `volume`, truncated to the recording depth.
    pub fn truncated_chain(&self, volume: VolumeId) -> InstanceChain {
        let mut chain = self.navigator.instance_chain(volume);
        chain.truncate(self.volume_instance_depth);
        chain
    }
}

impl fmt::Debug for GeometryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeometryParams")
            .field("num_volumes", &self.navigator.num_volumes())
            .field("volume_instance_depth", &self.volume_instance_depth)
            .finish()
    }
}
