//! Configuration for elstore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for an ElementStore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory reserved for the store's element files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── 0/          (shard: id & 0x3f in hex)
    ///     │   ├── 40      (element 0x40)
    ///     │   └── 80
    ///     └── 3f/
    ///         └── 3f
    pub data_dir: PathBuf,

    /// How hard each element write pushes its bytes to stable storage
    pub write_sync_strategy: WriteSyncStrategy,

    // -------------------------------------------------------------------------
    // Cache Configuration
    // -------------------------------------------------------------------------
    /// Maximum number of elements kept resident in memory (0 disables caching)
    pub cache_capacity: usize,

    // -------------------------------------------------------------------------
    // Write Pipeline Configuration
    // -------------------------------------------------------------------------
    /// Number of background writer threads
    pub writer_threads: usize,
}

/// Element file sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteSyncStrategy {
    /// fsync every element file before publishing it (safest, slowest)
    EveryWrite,

    /// Leave flushing to the OS page cache
    OsBuffered,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./elstore_data"),
            write_sync_strategy: WriteSyncStrategy::EveryWrite,
            cache_capacity: 1024,
            writer_threads: 4,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all element files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the element write sync strategy
    pub fn write_sync_strategy(mut self, strategy: WriteSyncStrategy) -> Self {
        self.config.write_sync_strategy = strategy;
        self
    }

    /// Set the cache capacity (in elements)
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    /// Set the number of writer threads (clamped to at least 1)
    pub fn writer_threads(mut self, count: usize) -> Self {
        self.config.writer_threads = count.max(1);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
