use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{AppConfig, DEFAULT_CONFIG_FILE};
use crate::logging::LogTarget;

#[derive(Parser, Debug)]
#[command(name = "syllabix", version, about = "Upload exam PDFs and watch them being processed")]
pub struct Cli {
    /// Job runner base URL, overriding the config file
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Path to the RON config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Log destination, overriding the config file
    #[arg(long, global = true, value_enum)]
    pub log: Option<LogTarget>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Watch an existing processing job
    Watch { job_id: String },
    /// Upload PDF files and watch the job they start
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Print the job id and exit without watching
        #[arg(long)]
        no_watch: bool,
    },
}

impl Cli {
    /// Applies command-line overrides on top of the file config.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        if let Some(log) = self.log {
            config.log = log;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_watch_with_global_flags() {
        let cli = Cli::try_parse_from([
            "syllabix",
            "watch",
            "job-7",
            "--server",
            "http://runner:8000",
            "--log",
            "terminal",
            "-v",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::Watch {
                job_id: "job-7".to_string()
            }
        );
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.server_url, "http://runner:8000");
        assert_eq!(config.log, LogTarget::Terminal);
    }

    #[test]
    fn upload_requires_files() {
        assert!(Cli::try_parse_from(["syllabix", "upload"]).is_err());

        let cli =
            Cli::try_parse_from(["syllabix", "upload", "a.pdf", "b.pdf", "--no-watch"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Upload {
                files: vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")],
                no_watch: true,
            }
        );
    }

    #[test]
    fn overrides_leave_config_alone_when_absent() {
        let cli = Cli::try_parse_from(["syllabix", "watch", "job"]).unwrap();
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config, AppConfig::default());
    }
}
