//! Slot-accounting and diagnostics counters.

/// Counters describing one stream's slot bank, refreshed every step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoreStateCounters {
    /// Inactive slots listed as vacancies at the end of the step.
    pub num_vacancies: usize,
    /// Records waiting in the initializer buffer.
    pub num_initializers: usize,
    /// Slots occupied while the step's actions ran.
    pub num_active: usize,
    /// Slots alive at the end of the step.
    pub num_alive: usize,
    /// Slots that errored during the step.
    pub num_errored: usize,
    /// Cumulative initializers created (primaries plus secondaries).
    pub num_generated: usize,
}

/// Cumulative per-stream diagnostics.
///
/// Soft per-track failures are transitions, not errors; these counts
/// are their only lasting record besides the one-time log lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiagCounters {
    /// Tracks cut because energy fell below the tracking cutoff.
    pub energy_cutoff_cuts: u64,
    /// Tracks cut by the looping watchdog.
    pub looping_cuts: u64,
    /// Tracks cut after field propagation failed to advance.
    pub field_failure_cuts: u64,
    /// Tracks cut by a user-configured cut.
    pub user_cuts: u64,
    /// Tracks that left the outermost volume.
    pub escaped: u64,
    /// Slots that transitioned to the errored status.
    pub errored: u64,
    /// Secondaries produced by interactions.
    pub secondaries_created: u64,
}

impl DiagCounters {
    /// Total tracking cuts of any kind.
    pub fn total_cuts(&self) -> u64 {
        self.energy_cutoff_cuts + self.looping_cuts + self.field_failure_cuts + self.user_cuts
    }
}
