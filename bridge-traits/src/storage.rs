//! Storage Abstractions
//!
//! Maps logical library URIs onto the storage backend holding the music
//! collection and exposes the file metadata the update walk compares against.

use std::path::PathBuf;

use crate::error::Result;

/// File metadata information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileMetadata {
    pub size: u64,
    /// Modification time in seconds since the Unix epoch
    pub mtime: i64,
    pub is_directory: bool,
}

impl FileMetadata {
    /// Metadata for a regular file of the given size and modification time
    pub fn file(size: u64, mtime: i64) -> Self {
        Self {
            size,
            mtime,
            is_directory: false,
        }
    }
}

/// Storage backend trait
///
/// URIs are UTF-8, `/`-delimited and relative to the root of the music
/// collection. The empty string names the root itself.
///
/// Some backends (e.g. a remote share) have no local filesystem
/// representation; they return `None` from [`Storage::map_fs`], and callers
/// needing random access to local files must skip such entries.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::Storage;
///
/// fn archive_path(storage: &dyn Storage) -> Option<std::path::PathBuf> {
///     storage.map_child_fs("albums", "pack.zip")
/// }
/// ```
pub trait Storage: Send + Sync {
    /// Get metadata for the file or directory at `uri`
    fn get_info(&self, uri: &str) -> Result<FileMetadata>;

    /// Map a URI to a local filesystem path
    ///
    /// Returns `None` if the backend is not backed by a local filesystem.
    fn map_fs(&self, uri: &str) -> Option<PathBuf>;

    /// Map a child of the directory at `uri` to a local filesystem path
    fn map_child_fs(&self, uri: &str, child: &str) -> Option<PathBuf> {
        if uri.is_empty() {
            self.map_fs(child)
        } else {
            self.map_fs(&format!("{}/{}", uri, child))
        }
    }
}
