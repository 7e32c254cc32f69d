//! Outstanding write counter
//!
//! Tracks accepted-but-unfinished writes so callers can wait for quiescence.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// Counts writes between acceptance and completion
#[derive(Debug, Default)]
pub struct PendingWrites {
    count: Mutex<usize>,
    drained: Condvar,
}

impl PendingWrites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one accepted write
    pub fn begin(&self) {
        *self.count.lock() += 1;
    }

    /// Mark one write complete, waking waiters when none remain
    pub fn finish(&self) {
        let mut count = self.count.lock();
        debug_assert!(*count > 0, "finish() without matching begin()");
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.drained.notify_all();
        }
    }

    /// Number of writes still outstanding
    pub fn outstanding(&self) -> usize {
        *self.count.lock()
    }

    /// Block until no writes are outstanding
    pub fn wait(&self) {
        let mut count = self.count.lock();
        self.drained.wait_while(&mut count, |count| *count > 0);
    }

    /// Block until no writes are outstanding or `timeout` elapses
    ///
    /// Returns true if drained.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        let mut count = self.count.lock();
        let result = self
            .drained
            .wait_while_for(&mut count, |count| *count > 0, timeout);
        !result.timed_out() || *count == 0
    }
}
