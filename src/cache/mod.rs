//! Cache Module
//!
//! Bounded in-memory table of the most-read elements.
//!
//! ## Responsibilities
//! - Count reads per element id (saturating, never persisted)
//! - Keep at most `capacity` elements resident
//! - Admit a freshly read element only if it out-reads the weakest resident
//!
//! ## Ranking
//! Residents are ranked by their read count. A min-heap holds one
//! `(count snapshot, id)` pair per resident; snapshots go stale as counts
//! grow and are refreshed lazily when they reach the top of the heap.
//! Since counts never decrease, a top whose snapshot is current is the
//! true minimum.

mod counters;
mod frequency;

use bytes::Bytes;

pub use counters::ReadCounters;
pub use frequency::FrequencyCache;

/// A resident element
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Bytes,
    pub id: u64,
    /// Read count copied from `ReadCounters` at admission or last ranking
    pub access_count: u64,
}

/// Outcome of an admission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Capacity is zero
    Disabled,

    /// Already resident (a concurrent cold read admitted it first)
    AlreadyResident,

    /// Inserted without eviction
    Inserted,

    /// Inserted after evicting `evicted`
    Replaced { evicted: u64 },

    /// Candidate did not out-read the weakest resident
    Rejected,
}
