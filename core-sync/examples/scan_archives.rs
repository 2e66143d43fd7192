//! Archive scanning demonstration
//!
//! Walks a music directory, expands every archive a plugin understands into
//! the in-memory database and prints the resulting listing.
//!
//! Run with:
//! ```bash
//! cargo run -p core-sync --example scan_archives -- /path/to/music
//!
//! # Ignore recorded mtimes
//! cargo run -p core-sync --example scan_archives -- /path/to/music discard
//! ```

use bridge_traits::log::LogLevel;
use core_library::db::Database;
use core_library::models::{Device, DirectoryId};
use core_library::repositories::{DirectoryRepository, LockedDirectoryRepository};
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, EventBus};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_sync::UpdateWalk;
use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    let Some(music_directory) = args.get(1) else {
        eprintln!("usage: scan_archives <music directory> [discard]");
        std::process::exit(2);
    };
    let discard = args.get(2).is_some_and(|arg| arg == "discard");

    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(LogLevel::Debug),
    )?;

    let config = CoreConfig::builder()
        .music_directory(music_directory)
        .discard(discard)
        .build()?;

    let database = Arc::new(Database::new());
    let repository = Arc::new(LockedDirectoryRepository::new(Arc::clone(&database)));
    let events = EventBus::new(config.event_buffer_size);
    let mut receiver = events.subscribe();

    let mut walk = UpdateWalk::from_config(&config, repository.clone(), Some(events));
    scan_directory(
        &mut walk,
        repository.as_ref(),
        &config,
        &config.music_directory,
        DirectoryId::ROOT,
    )?;
    let stats = walk.finish();

    while let Ok(event) = receiver.try_recv() {
        if let CoreEvent::Update(update) = event {
            info!(?update, "update event");
        }
    }

    for line in database.lock().dump() {
        println!("{}", line);
    }
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}

fn scan_directory(
    walk: &mut UpdateWalk,
    repository: &dyn DirectoryRepository,
    config: &CoreConfig,
    path: &Path,
    directory: DirectoryId,
) -> Result<(), Box<dyn Error>> {
    let mut entries: Vec<_> = fs::read_dir(path)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            warn!(path = ?entry.path(), "skipping non UTF-8 file name");
            continue;
        };

        let uri = match repository.path(directory)?.as_str() {
            "" => name.clone(),
            parent => format!("{}/{}", parent, name),
        };
        let info = config.storage.get_info(&uri)?;

        if info.is_directory {
            let child = repository.make_child(directory, &name, Device::Filesystem)?;
            scan_directory(walk, repository, config, &entry.path(), child)?;
        } else if !walk.update_file(directory, &name, &info) {
            info!(uri = %uri, "not an archive");
        }
    }

    Ok(())
}
