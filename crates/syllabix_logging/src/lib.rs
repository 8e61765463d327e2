#![deny(missing_docs)]
//! Shared logging utilities for the Syllabix workspace.
//!
//! This crate provides the `syllabix_*` logging macros used across the
//! codebase, a frame counter that animation code stamps onto its log lines,
//! and the global logger initializers for the binary and for tests.

use std::cell::Cell;
use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Default log file written by [`LogDestination::File`] and [`LogDestination::Both`].
pub const DEFAULT_LOG_FILE: &str = "./syllabix.log";

thread_local! {
    /// Animation frame counter for the current thread.
    static FRAME: Cell<u64> = const { Cell::new(0) };
}

/// Advances the animation frame counter for the current thread and returns
/// the new value. The render loop calls this once per frame.
pub fn next_frame() -> u64 {
    FRAME.with(|v| {
        let next = v.get().wrapping_add(1);
        v.set(next);
        next
    })
}

/// Retrieves the animation frame counter for the current thread.
/// Returns 0 before the first frame.
pub fn current_frame() -> u64 {
    FRAME.with(|v| v.get())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! syllabix_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! syllabix_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! syllabix_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! syllabix_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! syllabix_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to a log file.
    File(PathBuf),
    /// Write to the terminal (stderr for warnings, stdout otherwise).
    Terminal,
    /// Write to both a log file and the terminal.
    Both(PathBuf),
}

/// Initialize the global logger with the specified destination and level.
///
/// A file that cannot be created is reported on stderr and skipped; any
/// remaining loggers are still installed. Calling this twice is harmless.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let loggers = build_loggers(&destination, level);
    if loggers.is_empty() {
        return;
    }
    let _ = CombinedLogger::init(loggers);
}

fn build_loggers(destination: &LogDestination, level: LevelFilter) -> Vec<Box<dyn SharedLogger>> {
    let config = build_config();
    match destination {
        LogDestination::File(path) => create_file_logger(path, level, config)
            .map(|logger| vec![logger as Box<dyn SharedLogger>])
            .unwrap_or_default(),
        LogDestination::Terminal => vec![TermLogger::new(
            level,
            config,
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )],
        LogDestination::Both(path) => {
            let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
                level,
                config.clone(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            )];
            if let Some(file_logger) = create_file_logger(path, level, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    }
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_counter_is_per_thread() {
        let before = current_frame();
        assert_eq!(next_frame(), before + 1);
        assert_eq!(current_frame(), before + 1);

        let other = std::thread::spawn(current_frame).join().unwrap();
        assert_eq!(other, 0);
    }

    #[test]
    fn both_destination_builds_terminal_and_file_loggers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watch.log");

        let loggers = build_loggers(&LogDestination::Both(path.clone()), LevelFilter::Info);

        assert_eq!(loggers.len(), 2);
        assert!(path.exists());
    }

    #[test]
    fn unwritable_file_destination_yields_no_logger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("watch.log");

        let loggers = build_loggers(&LogDestination::File(path), LevelFilter::Info);

        assert!(loggers.is_empty());
    }

    #[test]
    fn initialize_for_tests_is_idempotent() {
        initialize_for_tests();
        initialize_for_tests();
        syllabix_info!("logger ready");
    }
}
