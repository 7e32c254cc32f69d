//! Error types for elstore
//!
//! Provides a unified error type for all store operations.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for elstore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Element {0:#x} already exists in store")]
    AlreadyExists(u64),

    #[error("Element {0:#x} does not exist in store")]
    DoesNotExist(u64),

    // -------------------------------------------------------------------------
    // Write Pipeline Errors
    // -------------------------------------------------------------------------
    /// A background write failed. Once latched, every later `put` returns
    /// this same failure.
    #[error("Write failed: {0}")]
    WriteFailed(#[source] Arc<std::io::Error>),

    #[error("Synchronization timeout after {0:?}")]
    SyncTimeout(Duration),

    #[error("Write pipeline is closed")]
    PipelineClosed,

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// True if this is the latched write failure
    pub fn is_write_failure(&self) -> bool {
        matches!(self, StoreError::WriteFailed(_))
    }
}
