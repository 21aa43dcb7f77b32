//! Host/device mirrored storage for params.

use std::sync::Arc;

use crate::device;
use crate::error::ParamsError;

/// Captures a host value and, when the device context is active at
/// construction, an immediately-made device mirror.
///
/// References returned by [`host_ref`](ParamsStore::host_ref) and
/// [`device_ref`](ParamsStore::device_ref) stay valid for the lifetime
/// of the store; the mirror is bitwise-equivalent to the host copy by
/// construction and neither side is ever mutated afterwards.
#[derive(Clone, Debug)]
pub struct ParamsStore<T> {
    host: Arc<T>,
    device: Option<Arc<T>>,
}

impl<T: Clone> ParamsStore<T> {
    /// Capture `value`, mirroring to the device when one is active.
    pub fn new(value: T) -> Self {
        let device = device::is_initialized().then(|| Arc::new(value.clone()));
        Self {
            host: Arc::new(value),
            device,
        }
    }

    /// The host-space view.
    pub fn host_ref(&self) -> &T {
        &self.host
    }

    /// The device-space view.
    ///
    /// Fails with [`ParamsError::NotConfigured`] when the store was
    /// built without an active device context.
    pub fn device_ref(&self) -> Result<&T, ParamsError> {
        self.device
            .as_deref()
            .ok_or(ParamsError::NotConfigured { what: "device" })
    }

    /// Whether a device mirror exists.
    pub fn has_device(&self) -> bool {
        self.device.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_only_without_device() {
        // The device context is process-global; this test assumes the
        // suite never leaves it initialized.
        let store = ParamsStore::new(vec![1, 2, 3]);
        assert_eq!(store.host_ref(), &vec![1, 2, 3]);
        if !device::is_initialized() {
            assert!(!store.has_device());
            assert!(matches!(
                store.device_ref(),
                Err(ParamsError::NotConfigured { .. })
            ));
        }
    }

    #[test]
    fn mirror_matches_host_when_active() {
        device::initialize();
        let store = ParamsStore::new(vec![7u8, 8]);
        assert_eq!(store.device_ref().unwrap(), store.host_ref());
        device::teardown();
    }
}
