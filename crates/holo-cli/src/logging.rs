//! Tracing subscriber setup.
//!
//! Headless commands log to stderr. `play` owns the terminal, so it only
//! logs when a file is given.

use std::fs::File;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const FILTER_ENV: &str = "HOLO_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr, filtered by `HOLO_LOG`.
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to `path` if given. The returned guard flushes the writer on drop.
pub fn init_file(path: Option<&Path>) -> Result<Option<WorkerGuard>, String> {
    let Some(path) = path else {
        return Ok(None);
    };
    let file = File::create(path)
        .map_err(|e| format!("cannot open log file '{}': {e}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_ansi(false)
        .with_writer(writer)
        .try_init();
    Ok(Some(guard))
}
