//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (e.g., `core-sync`, `core-runtime`, `bridge-desktop`).
//! Host applications can depend on `library-update-workspace` and enable the
//! documented features without needing to wire each crate individually.

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop;
#[cfg(any(feature = "archive", feature = "desktop-shims"))]
pub use core_library;
#[cfg(any(feature = "archive", feature = "desktop-shims"))]
pub use core_runtime;
#[cfg(any(feature = "archive", feature = "desktop-shims"))]
pub use core_sync;
