//! Per-step performance metrics.

/// Timing data for the most recent step plus cumulative counts.
///
/// Durations are in microseconds. Per-action timings are keyed by the
/// action label in pipeline order.
#[derive(Clone, Debug, Default)]
pub struct StepMetrics {
    /// Wall-clock time of the last step.
    pub total_us: u64,
    /// Per-action execution times of the last step: `(label, us)`.
    pub action_us: Vec<(String, u64)>,
    /// Step iterations executed since construction or reset.
    pub step_iters: u64,
}
