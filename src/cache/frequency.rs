//! Frequency-ranked cache
//!
//! HashMap of residents plus a lazily refreshed min-heap for eviction.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use bytes::Bytes;

use super::{Admission, CacheEntry, ReadCounters};

/// Bounded cache keeping the most-read elements resident
///
/// ## Invariants
/// - `entries.len() <= capacity`
/// - `ranking` holds exactly one `(access_count, id)` per resident, matching
///   that resident's `access_count`
#[derive(Debug)]
pub struct FrequencyCache {
    capacity: usize,
    entries: HashMap<u64, CacheEntry>,
    ranking: BinaryHeap<Reverse<(u64, u64)>>,
}

impl FrequencyCache {
    /// Create a cache holding at most `capacity` elements (0 disables it)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            ranking: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Resident value for `id`
    pub fn get(&self, id: u64) -> Option<&Bytes> {
        self.entries.get(&id).map(|entry| &entry.value)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Ids currently resident, in no particular order
    pub fn resident_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.keys().copied()
    }

    /// Offer a freshly read element for residency
    ///
    /// The candidate's count must already include the read that produced
    /// `value`. When full, the weakest resident is replaced only if the
    /// candidate's count is strictly greater; ties keep the incumbent.
    pub fn admit(&mut self, id: u64, value: Bytes, counters: &ReadCounters) -> Admission {
        if self.capacity == 0 {
            return Admission::Disabled;
        }
        if self.entries.contains_key(&id) {
            return Admission::AlreadyResident;
        }

        let access_count = counters.get(id);

        if self.entries.len() < self.capacity {
            self.insert(CacheEntry { value, id, access_count });
            return Admission::Inserted;
        }

        let Some((min_count, victim)) = self.weakest(counters) else {
            return Admission::Rejected;
        };
        if access_count <= min_count {
            return Admission::Rejected;
        }

        self.ranking.pop();
        self.entries.remove(&victim);
        self.insert(CacheEntry { value, id, access_count });
        Admission::Replaced { evicted: victim }
    }

    fn insert(&mut self, entry: CacheEntry) {
        self.ranking.push(Reverse((entry.access_count, entry.id)));
        self.entries.insert(entry.id, entry);
    }

    /// Refresh stale heap tops until the top reflects the current count
    ///
    /// Leaves the weakest resident on top of the heap and returns it.
    fn weakest(&mut self, counters: &ReadCounters) -> Option<(u64, u64)> {
        loop {
            let Reverse((snapshot, id)) = *self.ranking.peek()?;
            let current = counters.get(id);
            if current == snapshot {
                return Some((snapshot, id));
            }

            self.ranking.pop();
            if let Some(entry) = self.entries.get_mut(&id) {
                entry.access_count = current;
            }
            self.ranking.push(Reverse((current, id)));
        }
    }
}
