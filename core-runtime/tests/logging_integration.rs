//! Integration tests for logging system

use bridge_traits::log::{LogEntry, LogLevel, LoggerSink};
use core_runtime::logging::{init_logging, strip_path, LogFormat, LoggingConfig};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl LoggerSink for RecordingSink {
    fn log(&self, entry: LogEntry) -> bridge_traits::error::Result<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Info
    }
}

#[test]
fn test_global_init_forwards_to_sink_and_rejects_second_init() {
    // Only one global subscriber per process, so both checks live in one test
    let sink = Arc::new(RecordingSink::default());
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_logger_sink(sink.clone());

    init_logging(config).unwrap();

    tracing::warn!(target: "core_sync::archive", path = "pack.zip", "archive returned directory only");
    tracing::debug!(target: "core_sync::archive", "below sink level");

    {
        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Warn);
        assert_eq!(entries[0].message, "archive returned directory only");
        assert_eq!(entries[0].fields.get("path"), Some(&"pack.zip".to_string()));
    }

    assert!(init_logging(LoggingConfig::default()).is_err());
}

#[test]
fn test_path_stripping() {
    assert_eq!(strip_path("/srv/music/mods/pack.zip"), "pack.zip");
    assert_eq!(strip_path("D:\\music\\pack.zip"), "pack.zip");
    assert_eq!(strip_path("pack.zip"), "pack.zip");
    assert_eq!(strip_path(""), "");
}

#[test]
fn test_format_selection() {
    #[cfg(debug_assertions)]
    assert_eq!(LoggingConfig::default().format, LogFormat::Pretty);

    #[cfg(not(debug_assertions))]
    assert_eq!(LoggingConfig::default().format, LogFormat::Json);
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Json)
        .with_level(LogLevel::Warn)
        .with_filter("core_sync=trace")
        .with_spans(true)
        .with_target(false)
        .with_thread_info(true);

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, LogLevel::Warn);
    assert_eq!(config.filter.as_deref(), Some("core_sync=trace"));
    assert!(config.enable_spans);
    assert!(!config.display_target);
    assert!(config.display_thread_info);
}
