//! Archive Plugin Abstractions
//!
//! Archive plugins expose the entry list of container files (ZIP bundles,
//! ISO images, ...) so the update walk can browse them like directories.
//! Plugins are selected by filename suffix through an
//! [`ArchivePluginRegistry`].
//!
//! ## Lifecycle
//!
//! ```text
//! registry.plugin_from_suffix("zip") ──> plugin.open(path) ──> file.visit(visitor)
//!                                                          └──> file.close()
//! ```
//!
//! Archive access requires a local path with random access; the caller is
//! responsible for mapping library URIs to local paths first.

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;

/// Receives one callback per entry found inside an open archive.
///
/// Entry paths are UTF-8, relative to the archive root and use `/` as the
/// hierarchy delimiter. Directory-only entries end with `/`.
pub trait ArchiveVisitor {
    fn visit_archive_entry(&mut self, path_utf8: &str);
}

/// An opened archive instance.
pub trait ArchiveFile: Send {
    /// Enumerate every entry, calling `visitor` once per entry.
    fn visit(&mut self, visitor: &mut dyn ArchiveVisitor);

    /// Release the archive.
    ///
    /// Dropping the handle also releases it; `close` makes the release point
    /// explicit for callers that want it logged.
    fn close(self: Box<Self>);
}

/// A capability able to open one archive format.
pub trait ArchivePlugin: Send + Sync {
    /// Plugin name used in logs and configuration
    fn name(&self) -> &str;

    /// Filename suffixes (without the dot) handled by this plugin
    fn suffixes(&self) -> &[&'static str];

    /// Open the archive located at `path`
    fn open(&self, path: &Path) -> Result<Box<dyn ArchiveFile>>;
}

/// Resolves a filename suffix to the plugin claiming it.
pub trait ArchivePluginRegistry: Send + Sync {
    fn plugin_from_suffix(&self, suffix: &str) -> Option<Arc<dyn ArchivePlugin>>;
}
