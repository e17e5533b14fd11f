//! Tracing setup for the server process.
//!
//! Events are filtered by `RUST_LOG` (default `info`) and written twice: compactly to stdout,
//! and without ANSI colors to the log file named by [`Config::log_path`]. The file writer is
//! non-blocking; an unwritable log path only disables the file layer.
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::Config;

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber using the log settings in `config`.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = open_log_file(&config.log_path()).map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .with(file_layer)
        .init();
}

/// Open `path` for appending, creating missing parent directories, and wrap it in a
/// non-blocking writer whose guard lives for the rest of the process.
fn open_log_file(path: &Path) -> Option<NonBlocking> {
    // The subscriber is not installed yet, so failures go to stderr.
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty())
        && let Err(err) = fs::create_dir_all(parent)
    {
        eprintln!("Failed to create log directory {}: {err}", parent.display());
        return None;
    }

    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let _ = FILE_GUARD.set(guard);
            Some(writer)
        }
        Err(err) => {
            eprintln!("Failed to open log file {}: {err}", path.display());
            None
        }
    }
}
