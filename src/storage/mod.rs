//! Storage Module
//!
//! On-disk layout for element files.
//!
//! ## Responsibilities
//! - Map element ids to file paths (sharded to bound directory fanout)
//! - Persist element values, once, with owner-only permissions
//! - Rediscover durable elements on startup
//!
//! ## Directory Layout
//! ```text
//! <root>/
//! ├── 0/                  shard = id & 0x3f, lowercase hex
//! │   ├── 40              file  = full id, lowercase hex
//! │   └── 1c0
//! ├── 1a/
//! │   ├── 29a
//! │   └── 5a.tmp          unpublished write, ignored on recovery
//! └── 3f/
//!     └── ffffffffffffffff
//! ```
//!
//! File content is the raw value bytes. No header, no checksum.

mod element_file;
mod path;
mod recovery;

pub use element_file::{create_dir_private, read_element, write_element};
pub use path::{file_name, parse_element_id, shard_name, ElementLayout, SHARD_MASK};
pub use recovery::{RecoveryReport, RecoveryScanner};
