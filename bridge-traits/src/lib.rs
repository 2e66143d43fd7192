//! # Host Bridge Traits
//!
//! Collaborator contracts that the library update core consumes but does not
//! implement itself.
//!
//! ## Overview
//!
//! The update walk needs three kinds of outside capability: a storage
//! backend that maps library URIs to local paths and reports modification
//! times, archive plugins able to list the entries of container files, and a
//! sink for forwarding structured logs to the host. Each is a trait here so
//! hosts (and tests) can supply their own implementation.
//!
//! ## Traits
//!
//! ### Storage & Archives
//! - [`Storage`](storage::Storage) - URI mapping and file metadata
//! - [`ArchivePlugin`](archive::ArchivePlugin) - Opens one archive format
//! - [`ArchiveFile`](archive::ArchiveFile) - An opened archive
//! - [`ArchiveVisitor`](archive::ArchiveVisitor) - Per-entry callback sink
//! - [`ArchivePluginRegistry`](archive::ArchivePluginRegistry) - Suffix to plugin lookup
//!
//! ### Utilities
//! - [`LoggerSink`](log::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate |
//! |----------|---------------------|
//! | Desktop  | `bridge-desktop`    |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Archive
//! plugins report unreadable or corrupt files as
//! [`BridgeError::Archive`](error::BridgeError::Archive) carrying the path.
//!
//! ## Thread Safety
//!
//! Storage, plugins and registries are `Send + Sync` so one instance can be
//! shared between the update walker and query threads.

pub mod archive;
pub mod error;
pub mod log;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use archive::{ArchiveFile, ArchivePlugin, ArchivePluginRegistry, ArchiveVisitor};
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use storage::{FileMetadata, Storage};
