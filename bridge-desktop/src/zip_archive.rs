//! ZIP archive plugin using the `zip` crate

use bridge_traits::{
    archive::{ArchiveFile, ArchivePlugin, ArchiveVisitor},
    error::{BridgeError, Result},
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zip::ZipArchive;

const ZIP_SUFFIXES: &[&str] = &["zip"];

/// Lists the entries of ZIP archives
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchivePlugin;

impl ArchivePlugin for ZipArchivePlugin {
    fn name(&self) -> &str {
        "zip"
    }

    fn suffixes(&self) -> &[&'static str] {
        ZIP_SUFFIXES
    }

    fn open(&self, path: &Path) -> Result<Box<dyn ArchiveFile>> {
        let file = File::open(path)?;
        let archive = ZipArchive::new(BufReader::new(file)).map_err(|e| BridgeError::Archive {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        debug!(path = ?path, entries = archive.len(), "Opened zip archive");

        Ok(Box::new(ZipArchiveFile {
            path: path.to_path_buf(),
            archive,
        }))
    }
}

struct ZipArchiveFile {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
}

impl ArchiveFile for ZipArchiveFile {
    fn visit(&mut self, visitor: &mut dyn ArchiveVisitor) {
        for index in 0..self.archive.len() {
            // Raw access reads only the header; entry contents are never decompressed here.
            let name = match self.archive.by_index_raw(index) {
                Ok(entry) => entry.name().to_string(),
                Err(e) => {
                    warn!(path = ?self.path, index, error = %e, "Skipping unreadable zip entry");
                    continue;
                }
            };

            visitor.visit_archive_entry(&name);
        }
    }

    fn close(self: Box<Self>) {
        debug!(path = ?self.path, "Closed zip archive");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    #[derive(Default)]
    struct CollectingVisitor {
        entries: Vec<String>,
    }

    impl ArchiveVisitor for CollectingVisitor {
        fn visit_archive_entry(&mut self, path_utf8: &str) {
            self.entries.push(path_utf8.to_string());
        }
    }

    fn write_zip(path: &Path, entries: &[&str]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for entry in entries {
            if let Some(dir) = entry.strip_suffix('/') {
                writer
                    .add_directory(dir, SimpleFileOptions::default())
                    .unwrap();
            } else {
                writer
                    .start_file(*entry, SimpleFileOptions::default())
                    .unwrap();
                writer.write_all(b"module data").unwrap();
            }
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_visit_lists_entries_in_archive_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pack.zip");
        write_zip(&path, &["dir1/song.mod", "dir1/sub/song2.it", "readme/"]);

        let mut archive = ZipArchivePlugin.open(&path).unwrap();
        let mut visitor = CollectingVisitor::default();
        archive.visit(&mut visitor);
        archive.close();

        assert_eq!(
            visitor.entries,
            vec!["dir1/song.mod", "dir1/sub/song2.it", "readme/"]
        );
    }

    #[test]
    fn test_open_corrupt_archive_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pack.zip");
        std::fs::write(&path, b"this is not a zip file").unwrap();

        let err = ZipArchivePlugin.open(&path).err().unwrap();
        assert!(matches!(err, BridgeError::Archive { .. }));
    }

    #[test]
    fn test_open_missing_archive_fails() {
        let dir = TempDir::new().unwrap();

        let err = ZipArchivePlugin
            .open(&dir.path().join("missing.zip"))
            .err()
            .unwrap();
        assert!(matches!(err, BridgeError::Io(_)));
    }

    #[test]
    fn test_plugin_identity() {
        assert_eq!(ZipArchivePlugin.name(), "zip");
        assert_eq!(ZipArchivePlugin.suffixes(), &["zip"]);
    }
}
