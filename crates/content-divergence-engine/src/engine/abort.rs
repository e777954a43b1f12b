//! Caller-controlled cancellation of a whole run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared abort flag. Clones observe the same flag.
///
/// ```
/// use content_divergence_engine::engine::AbortHandle;
///
/// let handle = AbortHandle::new();
/// let remote = handle.clone();
/// remote.abort();
/// assert!(handle.is_aborted());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    flag: Arc<AtomicBool>,
}

impl AbortHandle {
    /// Create a handle that is not raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Runs observing it stop and return `Aborted`.
    pub fn abort(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check if the flag has been raised.
    pub fn is_aborted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
