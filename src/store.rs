//! Store Module
//!
//! The element store facade coordinating all components.
//!
//! ## Responsibilities
//! - Rebuild the durable set from disk on open
//! - Accept new elements and hand them to the write pipeline
//! - Serve reads from cache, in-flight table or disk
//! - Feed disk reads into the frequency-ranked cache

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::cache::{Admission, FrequencyCache, ReadCounters};
use crate::config::{Config, WriteSyncStrategy};
use crate::error::{Result, StoreError};
use crate::pipeline::{FailureLatch, PendingWrites, WriteHandler, WriteJob, WriterPool};
use crate::storage::{create_dir_private, read_element, write_element, ElementLayout, RecoveryScanner};

/// Persistent, append-only store of immutable byte values keyed by `u64`
///
/// ## Concurrency Model
///
/// - **Index**: durable set, in-flight table, cache and read counters sit
///   behind one `RwLock`. Membership checks take the read lock; every
///   mutation takes the write lock. Critical sections never include disk I/O.
///
/// - **Writes**: `put` only registers the element and queues a job. A writer
///   thread performs the I/O and then publishes the id as durable, or latches
///   the failure.
///
/// - **Quiescence**: `PendingWrites` is separate from the index lock and is
///   only used by `sync`, `sync_for`, `remove` and `close`.
///
/// All operations take `&self` except `remove` and `close`, so the store can
/// be shared across threads by reference or `Arc`.
pub struct ElementStore {
    /// Store configuration
    config: Config,

    /// State shared with writer threads
    inner: Arc<StoreInner>,

    /// Background writer threads
    writers: WriterPool,
}

/// Everything the writer threads need
struct StoreInner {
    layout: ElementLayout,
    write_sync_strategy: WriteSyncStrategy,
    index: RwLock<StoreIndex>,
    pending: PendingWrites,
    failure: FailureLatch,
}

/// Membership structures guarded by the store lock
struct StoreIndex {
    /// Ids whose files are completely written
    durable: HashSet<u64>,

    /// Accepted values whose write has not completed
    in_flight: HashMap<u64, Bytes>,

    /// Bounded subset of durable values held in memory
    cache: FrequencyCache,

    /// Read counts for every id ever read
    reads: ReadCounters,
}

/// Where a `get` finds an element
enum Lookup {
    Memory(Bytes),
    Disk,
    Missing,
}

impl StoreIndex {
    /// Known ids reject duplicate puts
    fn contains(&self, id: u64) -> bool {
        self.cache.contains(id) || self.in_flight.contains_key(&id) || self.durable.contains(&id)
    }

    /// Cache first, then in-flight, then durable
    fn lookup(&self, id: u64) -> Lookup {
        if let Some(value) = self.cache.get(id) {
            Lookup::Memory(value.clone())
        } else if let Some(value) = self.in_flight.get(&id) {
            Lookup::Memory(value.clone())
        } else if self.durable.contains(&id) {
            Lookup::Disk
        } else {
            Lookup::Missing
        }
    }
}

/// Completes an in-flight write's bookkeeping exactly once, even on panic
struct Completion<'a> {
    inner: &'a StoreInner,
    id: u64,
}

impl Drop for Completion<'_> {
    fn drop(&mut self) {
        self.inner.index.write().in_flight.remove(&self.id);
        self.inner.pending.finish();
    }
}

impl WriteHandler for StoreInner {
    fn handle(&self, job: WriteJob) {
        let _completion = Completion { inner: self, id: job.id };

        match write_element(&self.layout, job.id, &job.value, self.write_sync_strategy) {
            Ok(()) => {
                self.index.write().durable.insert(job.id);
                tracing::trace!("Element {:#x} durable ({} bytes)", job.id, job.value.len());
            }
            Err(e) => {
                let reason = e.to_string();
                if self.failure.latch(e) {
                    tracing::warn!(
                        "Write of element {:#x} failed, store is now read-only: {}",
                        job.id,
                        reason
                    );
                } else {
                    tracing::debug!("Write of element {:#x} failed after latch", job.id);
                }
            }
        }
    }
}

impl ElementStore {
    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Create the data directory if it doesn't exist
    /// 2. Scan it for element files to rebuild the durable set
    /// 3. Start the writer threads
    ///
    /// The cache starts empty even when reopening an existing store.
    pub fn open(config: Config) -> Result<Self> {
        // Step 1: Create data directory (owner-only)
        create_dir_private(&config.data_dir)?;

        // Step 2: Recover durable ids
        let (durable, report) = RecoveryScanner::scan(&config.data_dir)?;
        tracing::debug!(
            "Recovered {} elements from {} ({} stray files skipped)",
            report.elements_recovered,
            config.data_dir.display(),
            report.entries_skipped
        );
        if report.partial_writes > 0 {
            tracing::warn!(
                "{} unfinished element writes found under {}",
                report.partial_writes,
                config.data_dir.display()
            );
        }

        let inner = Arc::new(StoreInner {
            layout: ElementLayout::new(&config.data_dir),
            write_sync_strategy: config.write_sync_strategy,
            index: RwLock::new(StoreIndex {
                durable,
                in_flight: HashMap::new(),
                cache: FrequencyCache::new(config.cache_capacity),
                reads: ReadCounters::new(),
            }),
            pending: PendingWrites::new(),
            failure: FailureLatch::new(),
        });

        // Step 3: Start writers
        let writers = WriterPool::spawn(config.writer_threads, Arc::clone(&inner))?;

        Ok(Self {
            config,
            inner,
            writers,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// Insert an element
    ///
    /// Returning `Ok` means the element was accepted, not that it is on disk.
    /// Use `sync`/`sync_for` and `write_error` to confirm durability.
    ///
    /// Errors:
    /// - `WriteFailed` if an earlier write failed (no I/O is attempted)
    /// - `AlreadyExists` if `id` is durable or in flight
    pub fn put(&self, id: u64, value: impl Into<Bytes>) -> Result<()> {
        if let Some(failure) = self.inner.failure.get() {
            return Err(StoreError::WriteFailed(failure));
        }

        let value = value.into();
        {
            let mut index = self.inner.index.write();
            if index.contains(id) {
                return Err(StoreError::AlreadyExists(id));
            }
            index.in_flight.insert(id, value.clone());
            self.inner.pending.begin();
        }

        if let Err(job) = self.writers.submit(WriteJob { id, value }) {
            self.inner.index.write().in_flight.remove(&job.id);
            self.inner.pending.finish();
            return Err(StoreError::PipelineClosed);
        }

        Ok(())
    }

    /// Get an element
    ///
    /// Search order:
    /// 1. Cache
    /// 2. In-flight table
    /// 3. Durable set (reads the file, then offers it to the cache)
    ///
    /// Every successful get counts as one read for cache ranking.
    pub fn get(&self, id: u64) -> Result<Bytes> {
        let lookup = self.inner.index.read().lookup(id);

        match lookup {
            Lookup::Memory(value) => {
                self.inner.index.write().reads.increment(id);
                Ok(value)
            }
            Lookup::Disk => {
                // Disk read happens without the lock
                let value = read_element(&self.inner.layout, id)?;

                let mut index = self.inner.index.write();
                let index = &mut *index;
                let count = index.reads.increment(id);
                match index.cache.admit(id, value.clone(), &index.reads) {
                    Admission::Replaced { evicted } => tracing::trace!(
                        "Cached element {:#x} (reads={}), evicted {:#x}",
                        id,
                        count,
                        evicted
                    ),
                    Admission::Inserted => {
                        tracing::trace!("Cached element {:#x} (reads={})", id, count)
                    }
                    _ => {}
                }

                Ok(value)
            }
            Lookup::Missing => Err(StoreError::DoesNotExist(id)),
        }
    }

    /// True if the element is durable or in flight
    ///
    /// No disk access and no effect on read counts.
    pub fn has(&self, id: u64) -> bool {
        self.inner.index.read().contains(id)
    }

    /// Block until every accepted write has completed
    ///
    /// Never fails; check `write_error` for the outcome of the writes.
    pub fn sync(&self) {
        self.inner.pending.wait();
    }

    /// Like `sync`, but give up after `timeout`
    ///
    /// Writes keep running after a timeout.
    pub fn sync_for(&self, timeout: Duration) -> Result<()> {
        if self.inner.pending.wait_for(timeout) {
            Ok(())
        } else {
            Err(StoreError::SyncTimeout(timeout))
        }
    }

    /// The latched write failure, if any write has failed
    ///
    /// Once set it is never cleared for this instance.
    pub fn write_error(&self) -> Option<StoreError> {
        self.inner.failure.get().map(StoreError::WriteFailed)
    }

    /// Permanently delete the store
    ///
    /// Waits for outstanding writes, then removes the data directory and
    /// everything under it.
    pub fn remove(self) -> Result<()> {
        self.sync();
        fs::remove_dir_all(&self.config.data_dir)?;
        tracing::debug!("Removed element store at {}", self.config.data_dir.display());
        Ok(())
    }

    /// Close the store gracefully
    ///
    /// Drains outstanding writes and stops the writer threads. Returns the
    /// latched write failure if any write failed during this instance's life.
    pub fn close(self) -> Result<()> {
        self.sync();
        self.writers.shutdown()?;

        match self.write_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of known elements (durable or in flight)
    pub fn len(&self) -> usize {
        let index = self.inner.index.read();
        let unpublished = index
            .in_flight
            .keys()
            .filter(|id| !index.durable.contains(id))
            .count();
        index.durable.len() + unpublished
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements known to be on disk
    pub fn durable_count(&self) -> usize {
        self.inner.index.read().durable.len()
    }

    /// Number of elements whose write has not completed
    pub fn in_flight_count(&self) -> usize {
        self.inner.index.read().in_flight.len()
    }

    /// Number of writes accepted but not yet finished
    pub fn outstanding_writes(&self) -> usize {
        self.inner.pending.outstanding()
    }

    /// Number of elements resident in the cache
    pub fn cached_count(&self) -> usize {
        self.inner.index.read().cache.len()
    }

    /// Maximum number of resident elements
    pub fn cache_capacity(&self) -> usize {
        self.inner.index.read().cache.capacity()
    }

    /// True if the element is resident in the cache
    pub fn is_cached(&self, id: u64) -> bool {
        self.inner.index.read().cache.contains(id)
    }

    /// Number of successful gets of `id` during this instance's life
    pub fn read_count(&self, id: u64) -> u64 {
        self.inner.index.read().reads.get(id)
    }
}
