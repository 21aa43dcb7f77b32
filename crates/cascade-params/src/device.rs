//! Process-wide device context.
//!
//! The device handle is deliberately global: whether params get a
//! device mirror is a process-level decision made before any params
//! are built. The lifecycle is `initialize → create_streams →
//! teardown`, driven explicitly by the host; nothing here runs from a
//! static destructor.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

static ACTIVE: AtomicBool = AtomicBool::new(false);
static NUM_STREAMS: AtomicU32 = AtomicU32::new(0);

/// Activate the device for this process.
///
/// Must run before any [`ParamsStore`](crate::ParamsStore) is built
/// for the mirror to be created.
pub fn initialize() {
    ACTIVE.store(true, Ordering::SeqCst);
}

/// Declare the number of device queues/streams in use.
pub fn create_streams(num_streams: u32) {
    NUM_STREAMS.store(num_streams, Ordering::SeqCst);
}

/// Release the device. Safe to call when never initialized.
pub fn teardown() {
    NUM_STREAMS.store(0, Ordering::SeqCst);
    ACTIVE.store(false, Ordering::SeqCst);
}

/// Whether the device context is active.
pub fn is_initialized() -> bool {
    ACTIVE.load(Ordering::SeqCst)
}

/// Number of declared device streams (zero when not created).
pub fn num_streams() -> u32 {
    NUM_STREAMS.load(Ordering::SeqCst)
}
