//! # elstore
//!
//! A persistent, append-only element store with:
//! - Immutable byte values addressed by caller-chosen `u64` ids
//! - Asynchronous writes with a latched, best-effort failure report
//! - A frequency-ranked in-memory cache for hot elements
//! - Startup recovery by scanning the data directory
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ElementStore                            │
//! │      put / get / has / sync / sync_for / write_error         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                StoreIndex (one RwLock)                       │
//! │   durable set · in-flight table · cache · read counters      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Pipeline   │          │   Cache     │
//!   │ (writers)   │          │ (min-heap)  │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │   Storage   │
//!   │<root>/<shard>/<id>
//!   └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use elstore::{Config, ElementStore};
//!
//! let store = ElementStore::open(Config::builder().data_dir("/tmp/elements").build())?;
//! store.put(0x29a, "hello")?;
//! assert_eq!(&store.get(0x29a)?[..], b"hello");
//!
//! store.sync();
//! if let Some(err) = store.write_error() {
//!     eprintln!("a write failed: {}", err);
//! }
//! # Ok::<(), elstore::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod storage;
pub mod cache;
pub mod pipeline;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::{Config, WriteSyncStrategy};
pub use store::ElementStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of elstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
