//! # Update Walk
//!
//! State of one database update pass over the music directory.
//!
//! A filesystem walker calls [`UpdateWalk::update_file`] for each regular
//! file it meets. Files whose suffix an archive plugin claims are expanded
//! into synthetic directories (see the `archive` module); everything else is
//! reported back as unhandled. After the pass, [`UpdateWalk::finish`]
//! announces whether the database changed.
//!
//! The walk runs on a single thread and blocks on archive I/O. Each database
//! mutation takes the database lock for one step only, so readers on other
//! threads may see an archive directory while it is still being filled.

use crate::editor::DatabaseEditor;
use crate::song_loader::{file_suffix, SongLoader, SuffixSongLoader};
use crate::stats::UpdateStats;
use bridge_traits::archive::ArchivePluginRegistry;
use bridge_traits::storage::{FileMetadata, Storage};
use core_library::models::DirectoryId;
use core_library::repositories::DirectoryRepository;
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, EventBus, LibraryEvent, UpdateEvent};
use std::sync::Arc;
use tracing::info;

/// One update pass over the music database
pub struct UpdateWalk {
    pub(crate) storage: Arc<dyn Storage>,
    pub(crate) archive_plugins: Arc<dyn ArchivePluginRegistry>,
    pub(crate) repository: Arc<dyn DirectoryRepository>,
    pub(crate) song_loader: Arc<dyn SongLoader>,
    pub(crate) editor: DatabaseEditor,
    pub(crate) events: Option<EventBus>,
    /// Rescan archives even when their mtime is unchanged
    pub(crate) discard: bool,
    pub(crate) enable_archive: bool,
    pub(crate) modified: bool,
    pub(crate) stats: UpdateStats,
}

impl UpdateWalk {
    /// Create a walk with the default song loader and no event bus
    pub fn new(
        storage: Arc<dyn Storage>,
        archive_plugins: Arc<dyn ArchivePluginRegistry>,
        repository: Arc<dyn DirectoryRepository>,
    ) -> Self {
        Self {
            storage,
            archive_plugins,
            editor: DatabaseEditor::new(Arc::clone(&repository), None),
            repository,
            song_loader: Arc::new(SuffixSongLoader::new()),
            events: None,
            discard: false,
            enable_archive: true,
            modified: false,
            stats: UpdateStats::default(),
        }
    }

    /// Create a walk from the runtime configuration
    pub fn from_config(
        config: &CoreConfig,
        repository: Arc<dyn DirectoryRepository>,
        events: Option<EventBus>,
    ) -> Self {
        let walk = Self::new(
            Arc::clone(&config.storage),
            Arc::clone(&config.archive_plugins),
            repository,
        )
        .with_discard(config.discard)
        .with_archive_enabled(config.features.enable_archive);

        match events {
            Some(events) => walk.with_event_bus(events),
            None => walk,
        }
    }

    pub fn with_song_loader(mut self, song_loader: Arc<dyn SongLoader>) -> Self {
        self.song_loader = song_loader;
        self
    }

    /// Announce database changes on `events`
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.editor = DatabaseEditor::new(Arc::clone(&self.repository), Some(events.clone()));
        self.events = Some(events);
        self
    }

    pub fn with_discard(mut self, discard: bool) -> Self {
        self.discard = discard;
        self
    }

    pub fn with_archive_enabled(mut self, enabled: bool) -> Self {
        self.enable_archive = enabled;
        self
    }

    /// Handle one regular file named `name` found in `parent`
    ///
    /// Returns `true` if the file was an archive and has been dealt with,
    /// `false` if the caller should treat it as an ordinary file.
    pub fn update_file(&mut self, parent: DirectoryId, name: &str, info: &FileMetadata) -> bool {
        match file_suffix(name) {
            Some(suffix) => self.try_sync_archive(parent, name, suffix, info),
            None => false,
        }
    }

    /// Whether this walk changed the database so far
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn stats(&self) -> UpdateStats {
        self.stats
    }

    pub(crate) fn emit(&self, event: CoreEvent) {
        if let Some(events) = &self.events {
            // No subscriber is not an error
            let _ = events.emit(event);
        }
    }

    /// End the walk, announcing the result
    ///
    /// Emits `DatabaseModified` when the database changed, then `Completed`.
    pub fn finish(self) -> UpdateStats {
        info!(
            modified = self.modified,
            scanned = self.stats.archives_scanned,
            skipped = self.stats.archives_skipped,
            failed = self.stats.archives_failed,
            songs_added = self.stats.songs_added,
            "update finished"
        );

        if self.modified {
            self.emit(CoreEvent::Library(LibraryEvent::DatabaseModified));
        }
        self.emit(CoreEvent::Update(UpdateEvent::Completed {
            modified: self.modified,
            songs_added: self.stats.songs_added,
            directories_removed: self.stats.directories_removed,
        }));

        self.stats
    }
}

impl std::fmt::Debug for UpdateWalk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateWalk")
            .field("discard", &self.discard)
            .field("enable_archive", &self.enable_archive)
            .field("modified", &self.modified)
            .field("stats", &self.stats)
            .finish()
    }
}
