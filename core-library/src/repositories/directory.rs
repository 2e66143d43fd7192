//! Directory repository trait and implementation

use crate::db::{Database, RemovedSubtree};
use crate::error::Result;
use crate::models::{Device, DirectoryId, Song};
use std::sync::Arc;

/// Directory repository interface for the update walk
///
/// Every method is one structural step. Implementations must make each step
/// atomic with respect to other readers and writers, but a sequence of calls
/// is not atomic as a whole.
pub trait DirectoryRepository: Send + Sync {
    /// Find a child directory by name
    ///
    /// # Returns
    /// - `Ok(Some(id))` if found
    /// - `Ok(None)` if `parent` has no child of that name
    /// - `Err` if `parent` does not exist
    fn find_child(&self, parent: DirectoryId, name: &str) -> Result<Option<DirectoryId>>;

    /// Return the child named `name`, creating it with `device` if absent
    fn make_child(&self, parent: DirectoryId, name: &str, device: Device) -> Result<DirectoryId>;

    /// Create a child directory that must not exist yet
    fn create_child(&self, parent: DirectoryId, name: &str, device: Device)
        -> Result<DirectoryId>;

    /// Find a song by name in `directory`
    fn find_song(&self, directory: DirectoryId, name: &str) -> Result<Option<Song>>;

    /// Attach a song to `directory`
    ///
    /// # Errors
    /// Returns error if a song of the same name already exists or the song
    /// fails validation.
    fn add_song(&self, directory: DirectoryId, song: Song) -> Result<()>;

    /// Recorded modification time of `directory`
    fn mtime(&self, directory: DirectoryId) -> Result<i64>;

    fn set_mtime(&self, directory: DirectoryId, mtime: i64) -> Result<()>;

    /// Path of `directory` relative to the music directory
    fn path(&self, directory: DirectoryId) -> Result<String>;

    /// Remove `directory` and all its descendants
    fn delete(&self, directory: DirectoryId) -> Result<RemovedSubtree>;
}

/// Repository that takes the database lock for the duration of each call
#[derive(Debug, Clone)]
pub struct LockedDirectoryRepository {
    db: Arc<Database>,
}

impl LockedDirectoryRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }
}

impl DirectoryRepository for LockedDirectoryRepository {
    fn find_child(&self, parent: DirectoryId, name: &str) -> Result<Option<DirectoryId>> {
        self.db.lock().find_child(parent, name)
    }

    fn make_child(&self, parent: DirectoryId, name: &str, device: Device) -> Result<DirectoryId> {
        self.db.lock().make_child(parent, name, device)
    }

    fn create_child(
        &self,
        parent: DirectoryId,
        name: &str,
        device: Device,
    ) -> Result<DirectoryId> {
        self.db.lock().create_child(parent, name, device)
    }

    fn find_song(&self, directory: DirectoryId, name: &str) -> Result<Option<Song>> {
        Ok(self.db.lock().find_song(directory, name)?.cloned())
    }

    fn add_song(&self, directory: DirectoryId, song: Song) -> Result<()> {
        self.db.lock().add_song(directory, song)
    }

    fn mtime(&self, directory: DirectoryId) -> Result<i64> {
        Ok(self.db.lock().directory(directory)?.mtime)
    }

    fn set_mtime(&self, directory: DirectoryId, mtime: i64) -> Result<()> {
        self.db.lock().set_mtime(directory, mtime)
    }

    fn path(&self, directory: DirectoryId) -> Result<String> {
        Ok(self.db.lock().path(directory)?.to_string())
    }

    fn delete(&self, directory: DirectoryId) -> Result<RemovedSubtree> {
        self.db.lock().delete(directory)
    }
}
