//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides production-ready implementations of the bridge traits
//! the library update core consumes:
//! - `Storage` using `std::fs` over a local music directory
//! - `ArchivePlugin` for ZIP files using the `zip` crate
//! - `ArchivePluginRegistry` as an ordered plugin list matched by suffix
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ArchivePluginList, LocalStorage};
//! use bridge_traits::{ArchivePluginRegistry, Storage};
//!
//! let storage = LocalStorage::new("/srv/music");
//! let plugins = ArchivePluginList::with_defaults();
//! let zip = plugins.plugin_from_suffix("zip");
//! ```

mod archive_list;
mod filesystem;
mod zip_archive;

pub use archive_list::ArchivePluginList;
pub use filesystem::LocalStorage;
pub use zip_archive::ZipArchivePlugin;
