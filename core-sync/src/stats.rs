//! Counters collected by an update walk

use serde::{Deserialize, Serialize};

/// Outcome counters of one update walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStats {
    /// Archives opened and visited
    pub archives_scanned: u64,
    /// Archives skipped because their mtime was unchanged
    pub archives_skipped: u64,
    /// Archives that could not be opened
    pub archives_failed: u64,
    /// Songs added to the database
    pub songs_added: u64,
    /// Entries dropped as directory-only or malformed
    pub entries_malformed: u64,
    /// Directory subtrees deleted
    pub directories_removed: u64,
}
