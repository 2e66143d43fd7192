//! Local music directory storage using `std::fs`

use bridge_traits::{
    error::{BridgeError, Result},
    storage::{FileMetadata, Storage},
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::trace;

/// Storage backed by a directory on the local filesystem
///
/// Library URIs are resolved relative to `music_directory`. Every URI maps
/// to a local path, so archive plugins can always open files found here.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    music_directory: PathBuf,
}

impl LocalStorage {
    /// Create a storage rooted at `music_directory`
    pub fn new(music_directory: impl Into<PathBuf>) -> Self {
        Self {
            music_directory: music_directory.into(),
        }
    }

    /// Root directory all URIs are resolved against
    pub fn music_directory(&self) -> &Path {
        &self.music_directory
    }

    fn resolve(&self, uri: &str) -> PathBuf {
        if uri.is_empty() {
            self.music_directory.clone()
        } else {
            self.music_directory.join(uri)
        }
    }

    fn map_io_error(uri: &str, e: std::io::Error) -> BridgeError {
        if e.kind() == std::io::ErrorKind::NotFound {
            BridgeError::OperationFailed(format!("No such file: {}", uri))
        } else {
            BridgeError::Io(e)
        }
    }
}

impl Storage for LocalStorage {
    fn get_info(&self, uri: &str) -> Result<FileMetadata> {
        let path = self.resolve(uri);
        let metadata = fs::metadata(&path).map_err(|e| Self::map_io_error(uri, e))?;

        let mtime = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();

        trace!(path = ?path, mtime, "Read file info");

        Ok(FileMetadata {
            size: metadata.len(),
            mtime,
            is_directory: metadata.is_dir(),
        })
    }

    fn map_fs(&self, uri: &str) -> Option<PathBuf> {
        Some(self.resolve(uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_map_fs_resolves_relative_to_root() {
        let storage = LocalStorage::new("/srv/music");

        assert_eq!(storage.map_fs(""), Some(PathBuf::from("/srv/music")));
        assert_eq!(
            storage.map_child_fs("albums", "pack.zip"),
            Some(PathBuf::from("/srv/music/albums/pack.zip"))
        );
    }

    #[test]
    fn test_get_info_reports_size_and_mtime() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("song.mod"), b"M.K.").unwrap();
        let storage = LocalStorage::new(dir.path());

        let info = storage.get_info("song.mod").unwrap();

        assert_eq!(info.size, 4);
        assert!(info.mtime > 0);
        assert!(!info.is_directory);
        assert!(storage.get_info("").unwrap().is_directory);
    }

    #[test]
    fn test_get_info_missing_file() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        let err = storage.get_info("missing.zip").unwrap_err();
        assert!(matches!(err, BridgeError::OperationFailed(_)));
    }
}
