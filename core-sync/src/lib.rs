//! # Library Update Module
//!
//! Keeps the music database in step with the music directory.
//!
//! ## Overview
//!
//! This module covers the archive side of a database update:
//! - Choosing an archive plugin by filename suffix
//! - Skipping archives whose modification time is unchanged
//! - Expanding archive entries into synthetic directories and songs
//! - Pruning archives that can no longer be opened
//! - Announcing changes on the event bus
//!
//! ## Components
//!
//! - **Entry Paths** (`entry_path`): Splits `/`-delimited archive entry paths
//! - **Archive Sync** (`archive`): Tree builder, archive visitor and synchronizer
//! - **Update Walk** (`walk`): Per-pass state, the "modified" flag and statistics
//! - **Database Editor** (`editor`): Subtree deletion with removal events
//! - **Song Loader** (`song_loader`): Decides which entries are playable

pub mod archive;
pub mod editor;
pub mod entry_path;
pub mod error;
pub mod song_loader;
pub mod stats;
pub mod walk;

pub use archive::UpdateArchiveVisitor;
pub use editor::DatabaseEditor;
pub use entry_path::{split_entry_path, EntryPath};
pub use error::{Result, SyncError};
pub use song_loader::{ArchiveEntry, SongLoader, SuffixSongLoader, DECODER_SUFFIXES};
pub use stats::UpdateStats;
pub use walk::UpdateWalk;
