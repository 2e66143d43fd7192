use core_library::error::LibraryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    /// `path` is the archive's URI relative to the music directory
    #[error("Unable to open archive {path}: {message}")]
    ArchiveOpen { path: String, message: String },

    #[error("Not a local file: {uri}")]
    NotLocal { uri: String },
}

pub type Result<T> = std::result::Result<T, SyncError>;
