//! # In-Memory Music Database
//!
//! Holds the directory hierarchy of the music directory, including the
//! synthetic directories that mirror archive contents.
//!
//! ## Structure
//!
//! - [`DirectoryTree`] is an arena of [`Directory`] nodes keyed by
//!   [`DirectoryId`]. Parents own children by name; the `parent` back-link is
//!   only used to rebuild paths.
//! - [`Database`] wraps the tree in a single exclusive lock. Every structural
//!   change happens under that lock, so readers never observe a half-linked
//!   node.
//!
//! ## Usage
//!
//! ```rust
//! use core_library::db::Database;
//! use core_library::models::{Device, DirectoryId, Song};
//!
//! let db = Database::new();
//! {
//!     let mut tree = db.lock();
//!     let archive = tree.make_child(DirectoryId::ROOT, "pack.zip", Device::InArchive).unwrap();
//!     tree.add_song(archive, Song::new("song.mod", "pack.zip/song.mod")).unwrap();
//! }
//!
//! assert_eq!(db.lock().dump(), vec!["D pack.zip", "S pack.zip/song.mod"]);
//! ```

use crate::error::{LibraryError, Result};
use crate::models::{validate_name, Device, Directory, DirectoryId, Song};
use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use tracing::trace;

/// What a subtree deletion removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedSubtree {
    /// Path of the deleted subtree root
    pub path: String,
    /// Number of directories removed, the subtree root included
    pub directories: usize,
    /// Songs removed from every level of the subtree
    pub songs: Vec<Song>,
}

/// Arena of directory nodes rooted at [`DirectoryId::ROOT`]
#[derive(Debug, Clone)]
pub struct DirectoryTree {
    nodes: HashMap<DirectoryId, Directory>,
    next_id: u64,
}

impl Default for DirectoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryTree {
    /// Create a tree holding only the root directory
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            DirectoryId::ROOT,
            Directory::new(
                DirectoryId::ROOT,
                None,
                String::new(),
                String::new(),
                Device::Filesystem,
            ),
        );

        Self { nodes, next_id: 1 }
    }

    pub fn root(&self) -> DirectoryId {
        DirectoryId::ROOT
    }

    pub fn get(&self, id: DirectoryId) -> Option<&Directory> {
        self.nodes.get(&id)
    }

    /// Get a directory or fail with `NotFound`
    pub fn directory(&self, id: DirectoryId) -> Result<&Directory> {
        self.nodes
            .get(&id)
            .ok_or_else(|| LibraryError::directory_not_found(id))
    }

    fn directory_mut(&mut self, id: DirectoryId) -> Result<&mut Directory> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| LibraryError::directory_not_found(id))
    }

    pub fn find_child(&self, parent: DirectoryId, name: &str) -> Result<Option<DirectoryId>> {
        Ok(self.directory(parent)?.children.get(name).copied())
    }

    /// Create a new child directory
    ///
    /// # Errors
    /// - `InvalidInput` if `name` is empty, `.`, `..` or contains `/`
    /// - `AlreadyExists` if `parent` already has a child named `name`
    /// - `NotFound` if `parent` does not exist
    pub fn create_child(
        &mut self,
        parent: DirectoryId,
        name: &str,
        device: Device,
    ) -> Result<DirectoryId> {
        validate_name(name).map_err(|message| LibraryError::InvalidInput {
            field: "Directory".to_string(),
            message,
        })?;

        let parent_dir = self.directory(parent)?;
        if parent_dir.children.contains_key(name) {
            return Err(LibraryError::AlreadyExists {
                entity_type: "Directory".to_string(),
                id: parent_dir.child_uri(name),
            });
        }
        let path = parent_dir.child_uri(name);

        let id = DirectoryId(self.next_id);
        self.next_id += 1;

        trace!(%id, path = %path, ?device, "Creating directory");

        self.nodes.insert(
            id,
            Directory::new(id, Some(parent), name.to_string(), path, device),
        );
        self.directory_mut(parent)?
            .children
            .insert(name.to_string(), id);

        Ok(id)
    }

    /// Return the child named `name`, creating it with `device` if absent
    ///
    /// An existing child keeps its device.
    pub fn make_child(
        &mut self,
        parent: DirectoryId,
        name: &str,
        device: Device,
    ) -> Result<DirectoryId> {
        match self.find_child(parent, name)? {
            Some(id) => Ok(id),
            None => self.create_child(parent, name, device),
        }
    }

    pub fn find_song(&self, directory: DirectoryId, name: &str) -> Result<Option<&Song>> {
        Ok(self.directory(directory)?.songs.get(name))
    }

    /// Attach a song to `directory`
    ///
    /// # Errors
    /// - `InvalidInput` if the song fails validation
    /// - `AlreadyExists` if the directory already holds a song of that name
    pub fn add_song(&mut self, directory: DirectoryId, song: Song) -> Result<()> {
        song.validate().map_err(|message| LibraryError::InvalidInput {
            field: "Song".to_string(),
            message,
        })?;

        let dir = self.directory_mut(directory)?;
        if dir.songs.contains_key(&song.name) {
            return Err(LibraryError::AlreadyExists {
                entity_type: "Song".to_string(),
                id: song.uri,
            });
        }

        trace!(uri = %song.uri, "Adding song");
        dir.songs.insert(song.name.clone(), song);
        Ok(())
    }

    pub fn set_mtime(&mut self, directory: DirectoryId, mtime: i64) -> Result<()> {
        self.directory_mut(directory)?.mtime = mtime;
        Ok(())
    }

    /// Remove `directory` and all its descendants
    ///
    /// The root cannot be deleted.
    pub fn delete(&mut self, directory: DirectoryId) -> Result<RemovedSubtree> {
        let dir = self.directory(directory)?;
        let Some(parent) = dir.parent else {
            return Err(LibraryError::InvalidInput {
                field: "Directory".to_string(),
                message: "the root directory cannot be deleted".to_string(),
            });
        };
        let name = dir.name.clone();
        let path = dir.path.clone();

        // Unlink first so the subtree disappears from lookups in one step
        self.directory_mut(parent)?.children.remove(&name);

        let mut removed = RemovedSubtree {
            path,
            ..RemovedSubtree::default()
        };
        let mut pending = vec![directory];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes.remove(&id) {
                removed.directories += 1;
                pending.extend(node.children.into_values());
                removed.songs.extend(node.songs.into_values());
            }
        }

        trace!(path = %removed.path, directories = removed.directories, "Deleted directory");
        Ok(removed)
    }

    /// Resolve a `/`-delimited URI to a directory
    ///
    /// The empty URI names the root.
    pub fn lookup(&self, uri: &str) -> Option<DirectoryId> {
        uri.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(DirectoryId::ROOT, |current, segment| {
                self.nodes.get(&current)?.children.get(segment).copied()
            })
    }

    pub fn path(&self, directory: DirectoryId) -> Result<&str> {
        Ok(self.directory(directory)?.path.as_str())
    }

    /// Depth-first listing of the tree in name order
    ///
    /// Directories print as `D <path>` before their songs (`S <uri>`) and
    /// children. The root itself is not listed.
    pub fn dump(&self) -> Vec<String> {
        let mut lines = Vec::new();
        self.dump_into(DirectoryId::ROOT, &mut lines);
        lines
    }

    fn dump_into(&self, id: DirectoryId, lines: &mut Vec<String>) {
        let Some(dir) = self.nodes.get(&id) else {
            return;
        };

        if !dir.is_root() {
            lines.push(format!("D {}", dir.path));
        }
        lines.extend(dir.songs.values().map(|song| format!("S {}", song.uri)));
        for child in dir.children.values() {
            self.dump_into(*child, lines);
        }
    }

    /// Number of directories, the root included
    pub fn directory_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn song_count(&self) -> usize {
        self.nodes.values().map(|dir| dir.songs.len()).sum()
    }
}

/// Exclusive lock guard over the directory tree
pub type DatabaseLock<'a> = MutexGuard<'a, DirectoryTree>;

/// The shared music database
///
/// One lock guards the whole tree. Callers should hold it for a single
/// structural operation at a time so readers can interleave with a running
/// update.
#[derive(Debug, Default)]
pub struct Database {
    tree: Mutex<DirectoryTree>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the database lock
    pub fn lock(&self) -> DatabaseLock<'_> {
        self.tree.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> (DirectoryTree, DirectoryId, DirectoryId) {
        let mut tree = DirectoryTree::new();
        let archive = tree
            .create_child(DirectoryId::ROOT, "pack.zip", Device::InArchive)
            .unwrap();
        let dir1 = tree.make_child(archive, "dir1", Device::InArchive).unwrap();
        let sub = tree.make_child(dir1, "sub", Device::InArchive).unwrap();
        tree.add_song(dir1, Song::new("song.mod", "pack.zip/dir1/song.mod"))
            .unwrap();
        tree.add_song(sub, Song::new("song2.it", "pack.zip/dir1/sub/song2.it"))
            .unwrap();
        (tree, archive, dir1)
    }

    #[test]
    fn test_new_tree_has_root_only() {
        let tree = DirectoryTree::new();

        assert_eq!(tree.directory_count(), 1);
        assert_eq!(tree.song_count(), 0);
        assert!(tree.directory(tree.root()).unwrap().is_root());
        assert!(tree.dump().is_empty());
    }

    #[test]
    fn test_make_child_is_idempotent_and_keeps_device() {
        let mut tree = DirectoryTree::new();
        let first = tree
            .make_child(DirectoryId::ROOT, "mods", Device::Filesystem)
            .unwrap();
        let second = tree
            .make_child(DirectoryId::ROOT, "mods", Device::InArchive)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(tree.directory(first).unwrap().device, Device::Filesystem);
        assert_eq!(tree.directory_count(), 2);
    }

    #[test]
    fn test_create_child_rejects_duplicates_and_bad_names() {
        let mut tree = DirectoryTree::new();
        tree.create_child(DirectoryId::ROOT, "a", Device::Filesystem)
            .unwrap();

        assert!(matches!(
            tree.create_child(DirectoryId::ROOT, "a", Device::Filesystem),
            Err(LibraryError::AlreadyExists { .. })
        ));
        for bad in ["", "a/b", ".", ".."] {
            assert!(matches!(
                tree.create_child(DirectoryId::ROOT, bad, Device::Filesystem),
                Err(LibraryError::InvalidInput { .. })
            ));
        }
        assert!(matches!(
            tree.create_child(DirectoryId(99), "x", Device::Filesystem),
            Err(LibraryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_child_paths() {
        let (tree, archive, dir1) = sample_tree();

        assert_eq!(tree.path(archive).unwrap(), "pack.zip");
        assert_eq!(tree.path(dir1).unwrap(), "pack.zip/dir1");
        assert_eq!(tree.directory(dir1).unwrap().parent, Some(archive));
    }

    #[test]
    fn test_add_song_rejects_duplicate_names() {
        let (mut tree, _, dir1) = sample_tree();

        let err = tree
            .add_song(dir1, Song::new("song.mod", "pack.zip/dir1/song.mod"))
            .unwrap_err();
        assert!(matches!(err, LibraryError::AlreadyExists { .. }));
        assert_eq!(tree.song_count(), 2);
        assert!(tree.find_song(dir1, "song.mod").unwrap().is_some());
        assert!(tree.find_song(dir1, "missing.mod").unwrap().is_none());
    }

    #[test]
    fn test_delete_removes_whole_subtree() {
        let (mut tree, archive, dir1) = sample_tree();

        let removed = tree.delete(archive).unwrap();

        assert_eq!(removed.path, "pack.zip");
        assert_eq!(removed.directories, 3);
        assert_eq!(removed.songs.len(), 2);
        assert_eq!(tree.directory_count(), 1);
        assert_eq!(tree.song_count(), 0);
        assert!(tree.find_child(DirectoryId::ROOT, "pack.zip").unwrap().is_none());
        assert!(tree.lookup("pack.zip/dir1/sub").is_none());
        assert!(matches!(
            tree.find_song(dir1, "song.mod"),
            Err(LibraryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_delete_root_is_rejected() {
        let mut tree = DirectoryTree::new();
        assert!(matches!(
            tree.delete(DirectoryId::ROOT),
            Err(LibraryError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mut tree = DirectoryTree::new();
        let old = tree
            .create_child(DirectoryId::ROOT, "pack.zip", Device::InArchive)
            .unwrap();
        tree.delete(old).unwrap();

        let new = tree
            .create_child(DirectoryId::ROOT, "pack.zip", Device::InArchive)
            .unwrap();

        assert_ne!(old, new);
        assert!(tree.get(old).is_none());
    }

    #[test]
    fn test_lookup() {
        let (tree, archive, dir1) = sample_tree();

        assert_eq!(tree.lookup(""), Some(DirectoryId::ROOT));
        assert_eq!(tree.lookup("pack.zip"), Some(archive));
        assert_eq!(tree.lookup("pack.zip/dir1"), Some(dir1));
        assert_eq!(tree.lookup("/pack.zip/dir1/"), Some(dir1));
        assert_eq!(tree.lookup("pack.zip/nope"), None);
    }

    #[test]
    fn test_dump_is_depth_first_in_name_order() {
        let (mut tree, archive, _) = sample_tree();
        tree.make_child(archive, "a_first", Device::InArchive)
            .unwrap();
        tree.set_mtime(archive, 1000).unwrap();

        assert_eq!(
            tree.dump(),
            vec![
                "D pack.zip",
                "D pack.zip/a_first",
                "D pack.zip/dir1",
                "S pack.zip/dir1/song.mod",
                "D pack.zip/dir1/sub",
                "S pack.zip/dir1/sub/song2.it",
            ]
        );
        assert_eq!(tree.directory(archive).unwrap().mtime, 1000);
    }

    #[test]
    fn test_database_lock_shares_tree() {
        let db = Database::new();
        let id = db
            .lock()
            .make_child(DirectoryId::ROOT, "pack.zip", Device::InArchive)
            .unwrap();

        assert_eq!(db.lock().lookup("pack.zip"), Some(id));
    }
}
