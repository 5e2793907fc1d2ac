//! Tracing setup for the REPL binary.
//!
//! Events go to stdout and, when the platform config dir is writable, to
//! `spawnwatch/spawnwatch.log` there with 10 MB rotation. `DEBUG_LOGGING=1`
//! turns on debug output for the spawnwatch crates.

use std::path::PathBuf;

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE: &str = "spawnwatch.log";
const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;
const DEBUG_DIRECTIVE: &str = "info,spawnwatch=debug,spawnwatch_core=debug";

/// Install the global subscriber.
///
/// Hold the returned guard for the life of the process so buffered file
/// output is flushed on exit. `None` means stdout-only logging.
pub fn init() -> Option<WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let (file_writer, guard, log_path) = match open_log_file() {
        Ok((writer, guard, path)) => (Some(writer), Some(guard), Some(path)),
        Err(reason) => {
            // No subscriber yet
            eprintln!("{reason}, logging to stdout only");
            (None, None, None)
        }
    };

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(fmt::layer().with_writer(std::io::stdout).with_target(true))
        .with(filter(debug_logging))
        .init();

    match log_path {
        Some(path) => tracing::info!(log_file = %path.display(), debug_logging, "Logging initialized"),
        None => tracing::info!(debug_logging, "Logging initialized (stdout only)"),
    }

    guard
}

fn open_log_file() -> Result<(NonBlocking, WorkerGuard, PathBuf), String> {
    let dir = dirs::config_dir()
        .map(|d| d.join("spawnwatch"))
        .ok_or("No platform config directory")?;

    std::fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create log directory {}: {e}", dir.display()))?;

    let path = dir.join(LOG_FILE);
    // Keeps spawnwatch.log and one rotated spawnwatch.log.1
    let appender = BasicRollingFileAppender::new(
        &path,
        RollingConditionBasic::new().max_size(MAX_LOG_BYTES),
        1,
    )
    .map_err(|e| format!("Failed to open log file {}: {e}", path.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    Ok((writer, guard, path))
}

fn filter(debug_logging: bool) -> EnvFilter {
    if debug_logging {
        EnvFilter::new(DEBUG_DIRECTIVE)
    } else {
        EnvFilter::new("info")
    }
}
