#![forbid(unsafe_code)]

//! Logger setup shared by the binaries.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::Target;
use log::LevelFilter;

use crate::config::CuratorSettings;

/// Maps the configured level name onto a filter; unknown names mean `Info`.
pub fn level_filter(settings: &CuratorSettings) -> LevelFilter {
    if settings.debug {
        return LevelFilter::Debug;
    }
    settings.log_level.parse().unwrap_or(LevelFilter::Info)
}

/// Installs `env_logger` at the configured level. `RUST_LOG`, when present,
/// still refines per-module filters. With a log file configured, records are
/// appended there instead of going to stderr. Calling it twice is harmless.
pub fn init_logger(settings: &CuratorSettings) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level_filter(settings))
        .parse_default_env()
        .format_target(false);
    if let Some(path) = &settings.log_file {
        builder.target(Target::Pipe(Box::new(open_log_file(path)?)));
    }
    let _ = builder.try_init();
    Ok(())
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}
