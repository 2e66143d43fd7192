//! Registry of the archive plugins available on desktop

use bridge_traits::archive::{ArchivePlugin, ArchivePluginRegistry};
use std::fmt;
use std::sync::Arc;

use crate::zip_archive::ZipArchivePlugin;

/// Ordered list of archive plugins, searched by filename suffix
///
/// The first plugin claiming a suffix wins. Suffix comparison ignores ASCII
/// case, so `PACK.ZIP` is handled like `pack.zip`.
#[derive(Clone, Default)]
pub struct ArchivePluginList {
    plugins: Vec<Arc<dyn ArchivePlugin>>,
}

impl ArchivePluginList {
    /// Create an empty list (no archive support)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list with every plugin compiled into this crate
    pub fn with_defaults() -> Self {
        Self::new().with_plugin(Arc::new(ZipArchivePlugin))
    }

    /// Append a plugin
    pub fn with_plugin(mut self, plugin: Arc<dyn ArchivePlugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Find a plugin by name
    pub fn plugin_from_name(&self, name: &str) -> Option<Arc<dyn ArchivePlugin>> {
        self.plugins.iter().find(|p| p.name() == name).cloned()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl ArchivePluginRegistry for ArchivePluginList {
    fn plugin_from_suffix(&self, suffix: &str) -> Option<Arc<dyn ArchivePlugin>> {
        if suffix.is_empty() {
            return None;
        }

        self.plugins
            .iter()
            .find(|p| p.suffixes().iter().any(|s| s.eq_ignore_ascii_case(suffix)))
            .cloned()
    }
}

impl fmt::Debug for ArchivePluginList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("ArchivePluginList")
            .field("plugins", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_list_handles_zip() {
        let list = ArchivePluginList::with_defaults();

        assert_eq!(list.len(), 1);
        assert_eq!(list.plugin_from_suffix("zip").unwrap().name(), "zip");
        assert_eq!(list.plugin_from_suffix("ZIP").unwrap().name(), "zip");
        assert!(list.plugin_from_name("zip").is_some());
    }

    #[test]
    fn test_unknown_suffix_has_no_plugin() {
        let list = ArchivePluginList::with_defaults();

        assert!(list.plugin_from_suffix("mod").is_none());
        assert!(list.plugin_from_suffix("").is_none());
    }

    #[test]
    fn test_empty_list() {
        let list = ArchivePluginList::new();

        assert!(list.is_empty());
        assert!(list.plugin_from_suffix("zip").is_none());
    }
}
