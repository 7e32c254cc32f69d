//! Write failure latch
//!
//! Records the first background write failure. Never cleared.

use std::io;
use std::sync::{Arc, OnceLock};

/// First-failure-wins cell shared by writers and callers
#[derive(Debug, Default)]
pub struct FailureLatch {
    failure: OnceLock<Arc<io::Error>>,
}

impl FailureLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch `error` unless a failure is already recorded
    ///
    /// Returns true if this call latched it.
    pub fn latch(&self, error: io::Error) -> bool {
        let mut latched = false;
        self.failure.get_or_init(|| {
            latched = true;
            Arc::new(error)
        });
        latched
    }

    /// The latched failure, if any
    pub fn get(&self) -> Option<Arc<io::Error>> {
        self.failure.get().cloned()
    }

    pub fn is_latched(&self) -> bool {
        self.failure.get().is_some()
    }
}
