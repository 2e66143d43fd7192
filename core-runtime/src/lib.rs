//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the library update core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the library and sync crates
//! depend on. It establishes the logging conventions, the capability-based
//! configuration and the event broadcasting used to announce database changes.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder, FeatureFlags};
pub use error::{Error, Result};
pub use events::{CoreEvent, EventBus, EventStream, LibraryEvent, UpdateEvent};
