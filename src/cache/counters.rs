//! Read counters
//!
//! Per-id read counts shared by every resident and non-resident element.

use std::collections::HashMap;

/// Saturating read counts keyed by element id
#[derive(Debug, Default)]
pub struct ReadCounters {
    counts: HashMap<u64, u64>,
}

impl ReadCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one read of `id` and return the new count
    ///
    /// Clamps at `u64::MAX` instead of wrapping.
    pub fn increment(&mut self, id: u64) -> u64 {
        let count = self.counts.entry(id).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Current count for `id` (0 if never read)
    pub fn get(&self, id: u64) -> u64 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    /// Number of distinct ids ever read
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, id: u64, count: u64) {
        self.counts.insert(id, count);
    }
}
