//! The per-stream distribution buffer.

use crate::distribution::GeneratorDistribution;

/// Buffers generator distributions until a flush is due.
///
/// A flush is due when the queued photon count reaches `auto_flush` or
/// the distribution count reaches `capacity`; the offload hook checks
/// at the end of every step, so the buffer never overflows.
#[derive(Clone, Debug)]
pub struct OffloadBuffer {
    distributions: Vec<GeneratorDistribution>,
    capacity: usize,
    auto_flush: usize,
    num_photons: usize,
}

impl OffloadBuffer {
    /// Create with a distribution capacity and photon threshold.
    pub fn new(capacity: usize, auto_flush: usize) -> Self {
        Self {
            distributions: Vec::with_capacity(capacity),
            capacity,
            auto_flush,
            num_photons: 0,
        }
    }

    /// Append one distribution.
    pub fn push(&mut self, dist: GeneratorDistribution) {
        self.num_photons += dist.num_photons as usize;
        self.distributions.push(dist);
    }

    /// Buffered distributions in insertion order.
    pub fn distributions(&self) -> &[GeneratorDistribution] {
        &self.distributions
    }

    /// Number of buffered distributions.
    pub fn len(&self) -> usize {
        self.distributions.len()
    }

    /// Whether nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.distributions.is_empty()
    }

    /// Photons queued across all buffered distributions.
    pub fn num_photons(&self) -> usize {
        self.num_photons
    }

    /// Whether a flush threshold has been reached.
    pub fn should_flush(&self) -> bool {
        self.num_photons >= self.auto_flush || self.distributions.len() >= self.capacity
    }

    /// Drain the buffer, resetting the photon count.
    pub fn take(&mut self) -> Vec<GeneratorDistribution> {
        self.num_photons = 0;
        std::mem::take(&mut self.distributions)
    }
}
