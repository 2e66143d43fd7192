//! Domain models for the music database
//!
//! Directories form a strict tree addressed by [`DirectoryId`]. Each node owns
//! its songs; child nodes are owned by the [`DirectoryTree`](crate::db::DirectoryTree)
//! arena and referenced from the parent by name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// ID Types
// =============================================================================

/// Stable identifier of a directory node
///
/// Ids are allocated monotonically and never reused, so an id that outlived
/// its node resolves to nothing instead of to an unrelated directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DirectoryId(pub u64);

impl DirectoryId {
    /// Id of the music directory root
    pub const ROOT: DirectoryId = DirectoryId(0);
}

impl fmt::Display for DirectoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Domain Models
// =============================================================================

/// What backs the contents of a directory node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Device {
    /// A real directory of the music directory
    #[default]
    Filesystem,
    /// A synthetic directory mirroring the namespace inside an archive file
    InArchive,
}

/// Directory node of the music database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    /// Unique identifier
    pub id: DirectoryId,
    /// Parent directory (`None` only for the root)
    pub parent: Option<DirectoryId>,
    /// Name within the parent (empty for the root)
    pub name: String,
    /// Path relative to the music directory (empty for the root)
    pub path: String,
    /// Backing of this node; fixed at creation
    pub device: Device,
    /// Modification time (Unix seconds) of the file this node was built from
    pub mtime: i64,
    /// Child directories by name
    pub children: BTreeMap<String, DirectoryId>,
    /// Songs by name
    pub songs: BTreeMap<String, Song>,
}

impl Directory {
    pub(crate) fn new(
        id: DirectoryId,
        parent: Option<DirectoryId>,
        name: String,
        path: String,
        device: Device,
    ) -> Self {
        Self {
            id,
            parent,
            name,
            path,
            device,
            mtime: 0,
            children: BTreeMap::new(),
            songs: BTreeMap::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_in_archive(&self) -> bool {
        self.device == Device::InArchive
    }

    /// URI of a child named `name`
    pub fn child_uri(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.path, name)
        }
    }
}

/// Playable media entry owned by a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Name within the containing directory
    pub name: String,
    /// URI relative to the music directory
    pub uri: String,
    /// Path of the entry inside its archive, for songs read from archives
    pub archive_entry: Option<String>,
}

impl Song {
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            archive_entry: None,
        }
    }

    /// Mark this song as read from `entry` inside an archive
    pub fn with_archive_entry(mut self, entry: impl Into<String>) -> Self {
        self.archive_entry = Some(entry.into());
        self
    }

    pub fn is_in_archive(&self) -> bool {
        self.archive_entry.is_some()
    }

    /// Validate song data
    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.name).map_err(|msg| format!("Song {}", msg))?;

        if self.uri.trim().is_empty() {
            return Err("Song URI cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Checks the naming rule shared by directories and songs
pub(crate) fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name cannot be empty".to_string());
    }

    if name.contains('/') {
        return Err(format!("name '{}' cannot contain '/'", name));
    }

    if name == "." || name == ".." {
        return Err(format!("name '{}' is reserved", name));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_validation() {
        let song = Song::new("song.mod", "pack.zip/dir1/song.mod").with_archive_entry("dir1/song.mod");
        assert!(song.validate().is_ok());
        assert!(song.is_in_archive());

        assert!(Song::new("", "pack.zip/x").validate().is_err());
        assert!(Song::new("a/b", "pack.zip/a/b").validate().is_err());
        assert!(Song::new("..", "pack.zip/..").validate().is_err());
        assert!(Song::new("song.mod", " ").validate().is_err());
    }

    #[test]
    fn test_child_uri() {
        let root = Directory::new(DirectoryId::ROOT, None, String::new(), String::new(), Device::Filesystem);
        assert!(root.is_root());
        assert_eq!(root.child_uri("pack.zip"), "pack.zip");

        let archive = Directory::new(
            DirectoryId(1),
            Some(DirectoryId::ROOT),
            "pack.zip".to_string(),
            "mods/pack.zip".to_string(),
            Device::InArchive,
        );
        assert!(archive.is_in_archive());
        assert_eq!(archive.child_uri("dir1"), "mods/pack.zip/dir1");
    }

    #[test]
    fn test_directory_id_display() {
        assert_eq!(DirectoryId(42).to_string(), "42");
        assert_eq!(Device::default(), Device::Filesystem);
    }
}
