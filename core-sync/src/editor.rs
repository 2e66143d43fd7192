//! Removal of database subtrees with change notification

use crate::error::Result;
use core_library::db::RemovedSubtree;
use core_library::models::DirectoryId;
use core_library::repositories::DirectoryRepository;
use core_runtime::events::{CoreEvent, EventBus, LibraryEvent};
use std::sync::Arc;
use tracing::debug;

/// Deletes directories and announces every song that goes with them
#[derive(Clone)]
pub struct DatabaseEditor {
    repository: Arc<dyn DirectoryRepository>,
    events: Option<EventBus>,
}

impl DatabaseEditor {
    pub fn new(repository: Arc<dyn DirectoryRepository>, events: Option<EventBus>) -> Self {
        Self { repository, events }
    }

    /// Delete `directory` and its descendants under one lock acquisition
    ///
    /// Emits `SongRemoved` for each removed song, then `DirectoryRemoved`.
    pub fn lock_delete_directory(&self, directory: DirectoryId) -> Result<RemovedSubtree> {
        let removed = self.repository.delete(directory)?;

        debug!(
            path = %removed.path,
            directories = removed.directories,
            songs = removed.songs.len(),
            "removed directory"
        );

        if let Some(events) = &self.events {
            // Nobody listening is fine
            for song in &removed.songs {
                let _ = events.emit(CoreEvent::Library(LibraryEvent::SongRemoved {
                    uri: song.uri.clone(),
                }));
            }
            let _ = events.emit(CoreEvent::Library(LibraryEvent::DirectoryRemoved {
                path: removed.path.clone(),
            }));
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_library::db::Database;
    use core_library::models::{Device, Song};
    use core_library::repositories::LockedDirectoryRepository;

    #[test]
    fn test_delete_announces_songs_and_directory() {
        let repository = Arc::new(LockedDirectoryRepository::new(Arc::new(Database::new())));
        let archive = repository
            .make_child(DirectoryId::ROOT, "pack.zip", Device::InArchive)
            .unwrap();
        let dir1 = repository
            .make_child(archive, "dir1", Device::InArchive)
            .unwrap();
        repository
            .add_song(dir1, Song::new("song.mod", "pack.zip/dir1/song.mod"))
            .unwrap();

        let bus = EventBus::new(16);
        let mut receiver = bus.subscribe();
        let editor = DatabaseEditor::new(repository.clone(), Some(bus));

        let removed = editor.lock_delete_directory(archive).unwrap();

        assert_eq!(removed.directories, 2);
        assert_eq!(
            receiver.try_recv().unwrap(),
            CoreEvent::Library(LibraryEvent::SongRemoved {
                uri: "pack.zip/dir1/song.mod".to_string()
            })
        );
        assert_eq!(
            receiver.try_recv().unwrap(),
            CoreEvent::Library(LibraryEvent::DirectoryRemoved {
                path: "pack.zip".to_string()
            })
        );
        assert!(repository
            .find_child(DirectoryId::ROOT, "pack.zip")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_delete_missing_directory_fails() {
        let repository = Arc::new(LockedDirectoryRepository::new(Arc::new(Database::new())));
        let editor = DatabaseEditor::new(repository, None);

        assert!(editor.lock_delete_directory(DirectoryId(7)).is_err());
    }
}
