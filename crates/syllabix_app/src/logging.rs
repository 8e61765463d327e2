//! Logging setup for the `syllabix` binary.
//!
//! Defaults to `./syllabix.log` so log lines do not tear the progress bars.

use std::path::Path;

use clap::ValueEnum;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use syllabix_logging::LogDestination;

/// Where log output goes, as named on the command line and in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum LogTarget {
    Terminal,
    #[default]
    File,
    Both,
}

pub fn initialize(target: LogTarget, log_file: &Path, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    syllabix_logging::initialize(destination(target, log_file), level);
}

fn destination(target: LogTarget, log_file: &Path) -> LogDestination {
    match target {
        LogTarget::Terminal => LogDestination::Terminal,
        LogTarget::File => LogDestination::File(log_file.to_path_buf()),
        LogTarget::Both => LogDestination::Both(log_file.to_path_buf()),
    }
}
