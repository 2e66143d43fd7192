//! # Repository Pattern Implementation
//!
//! Repository traits give the update subsystem a narrow, lock-aware view of
//! the database.
//!
//! ## Architecture
//!
//! - Traits define the interface the update walk is written against
//! - `Locked*` implementations acquire the database lock per call
//! - All operations return `Result<T>` for error handling
//!
//! ## Available Repositories
//!
//! - `DirectoryRepository` - Directory nodes and the songs they own

pub mod directory;

pub use directory::{DirectoryRepository, LockedDirectoryRepository};
