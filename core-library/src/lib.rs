//! # Library Management Module
//!
//! Owns the in-memory music database and provides repository patterns for
//! data access.
//!
//! ## Overview
//!
//! This module manages:
//! - The directory tree, including synthetic directories for archive contents
//! - Songs attached to directories
//! - The single exclusive database lock
//! - Repository access that holds the lock for one operation at a time

pub mod db;
pub mod error;
pub mod models;
pub mod repositories;

pub use db::{Database, DatabaseLock, DirectoryTree, RemovedSubtree};
pub use error::{LibraryError, Result};
pub use models::{Device, Directory, DirectoryId, Song};
pub use repositories::{DirectoryRepository, LockedDirectoryRepository};
