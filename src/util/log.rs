// src/util/log.rs

//! Logger Utility - file-based tracing output for the TUI
use std::fs::create_dir_all;
use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

pub const LOG_FILE_NAME: &str = "flapboard.log";

/// Create the log directory and return a writer for the log file.
pub fn file_writer(log_dir: &Path) -> std::io::Result<tracing_appender::rolling::RollingFileAppender> {
    create_dir_all(log_dir)?;
    Ok(tracing_appender::rolling::never(log_dir, LOG_FILE_NAME))
}

/// Install the global subscriber. The returned guard must outlive the app,
/// dropping it flushes pending lines.
pub fn init(log_dir: &Path) -> std::io::Result<WorkerGuard> {
    DEBUG_ENABLED.get_or_init(|| {
        std::env::var("DEBUG").unwrap_or_default() == "true"
    });

    let (writer, guard) = tracing_appender::non_blocking(file_writer(log_dir)?);
    let default_level = if debug_enabled() { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    Ok(guard)
}

pub fn debug_enabled() -> bool {
    *DEBUG_ENABLED.get().unwrap_or(&false)
}

/// Convenience macro for error logging with formatting
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        tracing::error!($($arg)*);
    }};
}

/// Convenience macro for warning logging with formatting
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        tracing::warn!($($arg)*);
    }};
}

/// Convenience macro for info logging with formatting
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        tracing::info!($($arg)*);
    }};
}

/// Convenience macro for debug logging with formatting
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        if $crate::util::log::debug_enabled() {
            tracing::debug!($($arg)*);
        }
    }};
}
