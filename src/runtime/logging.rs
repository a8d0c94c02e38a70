use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{LogSettings, default_log_path};

/// Where log lines go: the configured file, else the user state directory.
pub fn log_path(settings: &LogSettings) -> Option<PathBuf> {
    settings.file.clone().or_else(default_log_path)
}

/// `RUST_LOG` wins over the configured level; a bad directive falls back to `info`.
pub fn env_filter(settings: &LogSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a file-backed `tracing` subscriber.
///
/// The terminal belongs to the TUI, so nothing is ever written to stdout or
/// stderr. When the file cannot be opened logging stays off.
pub fn init(settings: &LogSettings) -> Option<PathBuf> {
    let path = log_path(settings)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(settings))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .ok()?;
    Some(path)
}
