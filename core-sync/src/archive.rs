//! # Archive Synchronization
//!
//! Mirrors the contents of archive files (ZIP and friends) into the database
//! as synthetic directories marked [`Device::InArchive`].
//!
//! ## Flow
//!
//! 1. [`UpdateWalk::try_sync_archive`] picks a plugin by filename suffix.
//! 2. [`UpdateWalk::update_archive_file`] skips archives whose recorded mtime
//!    is current, prunes archives that no longer open, and otherwise opens the
//!    archive and stamps its directory with the new mtime.
//! 3. The plugin enumerates entries through [`UpdateArchiveVisitor`], which
//!    feeds each entry path to [`UpdateWalk::update_archive_tree`].
//!
//! Staleness is decided on mtime equality alone. An archive rewritten
//! without an mtime change (coarse filesystem clocks, restored backups) is
//! not rescanned until the mtime moves or the walk runs with `discard`.

use crate::entry_path::{split_entry_path, EntryPath};
use crate::error::{Result, SyncError};
use crate::song_loader::ArchiveEntry;
use crate::walk::UpdateWalk;
use bridge_traits::archive::{ArchiveFile, ArchivePlugin, ArchiveVisitor};
use bridge_traits::error::BridgeError;
use bridge_traits::storage::FileMetadata;
use core_library::models::{Device, DirectoryId};
use core_runtime::events::{CoreEvent, LibraryEvent, UpdateEvent};
use tracing::{debug, error, info, trace, warn};

impl UpdateWalk {
    /// Insert one archive entry path below `directory`
    ///
    /// Intermediate directories are created on demand. The leaf becomes a song
    /// if the song loader accepts it; otherwise it is skipped silently.
    /// Directory-only and malformed entries are logged and leave the tree
    /// untouched.
    pub fn update_archive_tree(&mut self, directory: DirectoryId, name: &str) {
        let leaf = name.rsplit('/').next().unwrap_or(name);
        if leaf.is_empty() || leaf == "." {
            warn!(entry = %name, "archive returned directory only");
            self.stats.entries_malformed += 1;
            return;
        }

        if name.split('/').any(|segment| segment == "..") {
            warn!(entry = %name, "archive entry leaves its archive");
            self.stats.entries_malformed += 1;
            return;
        }

        if let Err(e) = self.build_archive_subtree(directory, name, name) {
            warn!(entry = %name, error = %e, "failed to add archive entry");
        }
    }

    fn build_archive_subtree(
        &mut self,
        directory: DirectoryId,
        entry: &str,
        relative: &str,
    ) -> Result<()> {
        match split_entry_path(relative) {
            // Empty and "." segments do not descend
            EntryPath::Nested { segment, rest } if segment.is_empty() || segment == "." => {
                self.build_archive_subtree(directory, entry, rest)
            }
            EntryPath::Nested { segment, rest } => {
                let child = self
                    .repository
                    .make_child(directory, segment, Device::InArchive)?;
                self.build_archive_subtree(child, entry, rest)
            }
            EntryPath::Leaf(name) => self.add_archive_song(directory, entry, name),
            EntryPath::Empty => Ok(()),
        }
    }

    fn add_archive_song(&mut self, directory: DirectoryId, entry: &str, name: &str) -> Result<()> {
        if self.repository.find_song(directory, name)?.is_some() {
            return Ok(());
        }

        let directory_uri = self.repository.path(directory)?;
        let archive_entry = ArchiveEntry {
            directory_uri: &directory_uri,
            entry_path: entry,
            name,
        };
        let Some(song) = self.song_loader.load_song(&archive_entry) else {
            return Ok(());
        };

        let uri = song.uri.clone();
        self.repository.add_song(directory, song)?;

        self.modified = true;
        self.stats.songs_added += 1;
        info!("added {}/{}", directory_uri, name);
        self.emit(CoreEvent::Library(LibraryEvent::SongAdded { uri }));

        Ok(())
    }

    /// Bring the database copy of archive `name` in `parent` up to date
    ///
    /// Never fails: open errors prune the archive's directory (which counts
    /// as a modification) and are logged, non-local archives are skipped.
    pub fn update_archive_file(
        &mut self,
        parent: DirectoryId,
        name: &str,
        info: &FileMetadata,
        plugin: &dyn ArchivePlugin,
    ) {
        match self.sync_archive(parent, name, info, plugin) {
            Ok(()) => {}
            Err(SyncError::NotLocal { uri }) => {
                trace!(uri = %uri, "skipping non-local archive");
            }
            Err(SyncError::ArchiveOpen { path, message }) => {
                self.stats.archives_failed += 1;
                self.emit(CoreEvent::Update(UpdateEvent::ArchiveFailed { path, message }));
            }
            Err(e) => {
                error!(archive = %name, error = %e, "archive update failed");
            }
        }
    }

    fn sync_archive(
        &mut self,
        parent: DirectoryId,
        name: &str,
        info: &FileMetadata,
        plugin: &dyn ArchivePlugin,
    ) -> Result<()> {
        let existing = self.repository.find_child(parent, name)?;

        if let Some(directory) = existing {
            if !self.discard && self.repository.mtime(directory)? == info.mtime {
                // Already scanned and unchanged since
                trace!(archive = %name, mtime = info.mtime, "archive unchanged");
                self.stats.archives_skipped += 1;
                return Ok(());
            }
        }

        let parent_uri = self.repository.path(parent)?;
        let Some(path_fs) = self.storage.map_child_fs(&parent_uri, name) else {
            return Err(SyncError::NotLocal {
                uri: child_uri(&parent_uri, name),
            });
        };

        let mut file = match plugin.open(&path_fs) {
            Ok(file) => file,
            Err(e) => {
                error!(path = %path_fs.display(), error = %e, "unable to open archive");

                if let Some(directory) = existing {
                    match self.editor.lock_delete_directory(directory) {
                        Ok(_) => {
                            self.stats.directories_removed += 1;
                            self.modified = true;
                        }
                        Err(prune) => {
                            warn!(
                                archive = %name,
                                error = %prune,
                                "failed to prune archive directory"
                            );
                        }
                    }
                }

                let message = match e {
                    BridgeError::Archive { message, .. } => message,
                    other => other.to_string(),
                };
                return Err(SyncError::ArchiveOpen {
                    path: child_uri(&parent_uri, name),
                    message,
                });
            }
        };

        debug!("archive {} opened", path_fs.display());

        let result = self.visit_archive(parent, name, existing, info, &mut *file);
        file.close();
        result
    }

    fn visit_archive(
        &mut self,
        parent: DirectoryId,
        name: &str,
        existing: Option<DirectoryId>,
        info: &FileMetadata,
        file: &mut dyn ArchiveFile,
    ) -> Result<()> {
        let directory = match existing {
            Some(directory) => directory,
            None => {
                debug!("creating archive directory: {}", name);
                self.repository
                    .create_child(parent, name, Device::InArchive)?
            }
        };

        // Stamp before visiting so readers see which version is being loaded
        self.repository.set_mtime(directory, info.mtime)?;

        let mut visitor = UpdateArchiveVisitor {
            walk: self,
            directory,
        };
        file.visit(&mut visitor);

        self.stats.archives_scanned += 1;
        Ok(())
    }

    /// Sync `name` if an archive plugin claims `suffix`
    ///
    /// Returns `false` without side effects when no plugin matches or archive
    /// support is disabled, `true` otherwise, whether or not the scan worked.
    pub fn try_sync_archive(
        &mut self,
        parent: DirectoryId,
        name: &str,
        suffix: &str,
        info: &FileMetadata,
    ) -> bool {
        if !self.enable_archive {
            return false;
        }

        let Some(plugin) = self.archive_plugins.plugin_from_suffix(suffix) else {
            return false;
        };

        self.update_archive_file(parent, name, info, plugin.as_ref());
        true
    }
}

fn child_uri(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Feeds the entries of one archive into the tree builder
pub struct UpdateArchiveVisitor<'a> {
    walk: &'a mut UpdateWalk,
    directory: DirectoryId,
}

impl<'a> UpdateArchiveVisitor<'a> {
    pub fn new(walk: &'a mut UpdateWalk, directory: DirectoryId) -> Self {
        Self { walk, directory }
    }
}

impl ArchiveVisitor for UpdateArchiveVisitor<'_> {
    fn visit_archive_entry(&mut self, path_utf8: &str) {
        debug!("adding archive file: {}", path_utf8);
        self.walk.update_archive_tree(self.directory, path_utf8);
    }
}
