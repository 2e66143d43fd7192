//! # Core Configuration Module
//!
//! Provides configuration management for the library update core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds the collaborators and settings the update walk needs.
//! It enforces fail-fast validation so a missing bridge is reported when the
//! configuration is built, not in the middle of a database update.
//!
//! ## Required Settings
//!
//! - `music_directory` - Root of the music collection
//!
//! ## Bridges (with platform defaults)
//!
//! - `Storage` - URI mapping and file metadata (desktop default: `LocalStorage`)
//! - `ArchivePluginRegistry` - Archive plugins by suffix (desktop default:
//!   `ArchivePluginList::with_defaults()`)
//!
//! When the `desktop-shims` feature is enabled, desktop-ready defaults are
//! injected automatically if not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .music_directory("/srv/music")
//!     .discard(true)
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Staleness Detection
//!
//! Archives are rescanned only when their modification time differs from the
//! one recorded in the database. Content changes that keep the modification
//! time (coarse filesystem clocks, tools restoring timestamps) go unnoticed
//! until `discard` forces a full rescan.

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{ArchivePluginRegistry, Storage};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Upper bound for the event bus capacity.
pub const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

/// Core configuration for the library update core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Root of the music collection
    pub music_directory: PathBuf,

    /// Storage backend for the music collection
    pub storage: Arc<dyn Storage>,

    /// Archive plugins selectable by filename suffix
    pub archive_plugins: Arc<dyn ArchivePluginRegistry>,

    /// Ignore recorded modification times and rescan everything
    pub discard: bool,

    /// Capacity of the event bus channel
    pub event_buffer_size: usize,

    /// Features flags
    pub features: FeatureFlags,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("music_directory", &self.music_directory)
            .field("storage", &"Storage { ... }")
            .field("archive_plugins", &"ArchivePluginRegistry { ... }")
            .field("discard", &self.discard)
            .field("event_buffer_size", &self.event_buffer_size)
            .field("features", &self.features)
            .finish()
    }
}

/// Feature flags control optional functionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Browse archive files as directories
    pub enable_archive: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_archive: true,
        }
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Music directory is not empty
    /// - Event buffer size is within 1..=10,000
    pub fn validate(&self) -> Result<()> {
        if self.music_directory.as_os_str().is_empty() {
            return Err(Error::Config(
                "Music directory cannot be empty".to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn storage_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "Storage".to_string(),
        message: "Storage implementation is required to map library URIs. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default LocalStorage. \
                 Other hosts: inject a Storage implementation."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn archive_plugins_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "ArchivePluginRegistry".to_string(),
        message: "ArchivePluginRegistry implementation is required to browse archives. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default ArchivePluginList. \
                 Other hosts: inject a registry, or disable the 'enable_archive' feature flag."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_storage(music_directory: &Path) -> Result<Arc<dyn Storage>> {
    use bridge_desktop::LocalStorage;

    let storage: Arc<dyn Storage> = Arc::new(LocalStorage::new(music_directory));
    Ok(storage)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_storage(_music_directory: &Path) -> Result<Arc<dyn Storage>> {
    Err(storage_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_archive_plugins() -> Result<Arc<dyn ArchivePluginRegistry>> {
    use bridge_desktop::ArchivePluginList;

    let plugins: Arc<dyn ArchivePluginRegistry> = Arc::new(ArchivePluginList::with_defaults());
    Ok(plugins)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_archive_plugins() -> Result<Arc<dyn ArchivePluginRegistry>> {
    Err(archive_plugins_missing_error())
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Use this builder to incrementally set configuration options and then
/// call [`build()`](CoreConfigBuilder::build) to create the final config.
#[derive(Default)]
pub struct CoreConfigBuilder {
    music_directory: Option<PathBuf>,
    storage: Option<Arc<dyn Storage>>,
    archive_plugins: Option<Arc<dyn ArchivePluginRegistry>>,
    discard: bool,
    event_buffer_size: Option<usize>,
    features: FeatureFlags,
}

impl CoreConfigBuilder {
    /// Sets the root of the music collection.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    ///
    /// let builder = CoreConfig::builder()
    ///     .music_directory("/srv/music");
    /// ```
    pub fn music_directory<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.music_directory = Some(path.into());
        self
    }

    /// Sets the storage backend.
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Sets the archive plugin registry.
    pub fn archive_plugins(mut self, plugins: Arc<dyn ArchivePluginRegistry>) -> Self {
        self.archive_plugins = Some(plugins);
        self
    }

    /// Forces a rescan of archives whose modification time is unchanged.
    pub fn discard(mut self, discard: bool) -> Self {
        self.discard = discard;
        self
    }

    /// Sets the event bus capacity.
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Enables or disables archive browsing.
    pub fn enable_archive(mut self, enabled: bool) -> Self {
        self.features.enable_archive = enabled;
        self
    }

    /// Sets all feature flags at once.
    pub fn features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(CoreConfig)` on success, or an error if:
    /// - The music directory is missing
    /// - A bridge is missing and no platform default is available
    /// - Configuration values are invalid
    pub fn build(self) -> Result<CoreConfig> {
        let music_directory = self.music_directory.ok_or_else(|| {
            Error::Config(
                "Music directory is required. Use .music_directory() to set it.".to_string(),
            )
        })?;

        let storage = match self.storage {
            Some(storage) => storage,
            None => provide_default_storage(&music_directory)?,
        };

        let archive_plugins = match self.archive_plugins {
            Some(plugins) => plugins,
            None => provide_default_archive_plugins()?,
        };

        let config = CoreConfig {
            music_directory,
            storage,
            archive_plugins,
            discard: self.discard,
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            features: self.features,
        };

        config.validate()?;

        Ok(config)
    }
}
