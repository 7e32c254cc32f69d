//! Write Pipeline Module
//!
//! Asynchronous persistence of accepted elements.
//!
//! ## Responsibilities
//! - Run element writes on background threads, off the caller's path
//! - Count outstanding writes so `sync` can wait for quiescence
//! - Latch the first write failure and refuse further writes
//!
//! ## Flow
//! ```text
//!   put ──► in-flight table ──► WriterPool channel ──► writer thread
//!                                                          │
//!                         ┌────────────────────────────────┤
//!                         ▼ ok                             ▼ err
//!                   durable set                      FailureLatch
//!                         └──────────┬─────────────────────┘
//!                                    ▼
//!                  leave in-flight table, PendingWrites::finish
//! ```

mod latch;
mod pending;
mod writer;

use bytes::Bytes;

pub use latch::FailureLatch;
pub use pending::PendingWrites;
pub use writer::WriterPool;

/// One accepted element waiting to be written
#[derive(Debug, Clone)]
pub struct WriteJob {
    pub id: u64,
    pub value: Bytes,
}

/// Executes write jobs on a writer thread
///
/// Implementations must complete the job's bookkeeping (in-flight removal,
/// pending count) whether the write succeeds or fails.
pub trait WriteHandler: Send + Sync + 'static {
    fn handle(&self, job: WriteJob);
}
