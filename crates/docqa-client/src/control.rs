use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared enabled/disabled flag of a user action (submit, upload)
///
/// Cloning yields another handle to the same flag. A session disables the
/// control by acquiring it; the returned guard re-enables it when dropped,
/// so every exit path releases it.
#[derive(Debug, Clone)]
pub struct ActionControl {
    enabled: Arc<AtomicBool>,
}

impl ActionControl {
    pub fn new() -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Disable the control for the lifetime of the guard.
    /// Returns `None` when it is already held.
    pub fn try_acquire(&self) -> Option<ControlGuard> {
        self.enabled
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ControlGuard {
                enabled: Arc::clone(&self.enabled),
            })
    }
}

impl Default for ActionControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds an `ActionControl` disabled until dropped
#[derive(Debug)]
pub struct ControlGuard {
    enabled: Arc<AtomicBool>,
}

impl Drop for ControlGuard {
    fn drop(&mut self) {
        self.enabled.store(true, Ordering::Release);
    }
}
